use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // The role is stored as a snapshot on the user row, not as a foreign key.
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Users::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Users::Username).string().not_null())
                    .col(ColumnDef::new(Users::Email).string().not_null().default(""))
                    .col(ColumnDef::new(Users::Password).blob().not_null())
                    .col(ColumnDef::new(Users::RoleId).string().not_null())
                    .col(ColumnDef::new(Users::RoleName).string().not_null())
                    .col(ColumnDef::new(Users::RolePermissions).big_integer().not_null().default(0))
                    .col(ColumnDef::new(Users::RoleCreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Users::RoleUpdatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Users::LoginAttempts).integer().not_null().default(0))
                    .col(ColumnDef::new(Users::LastLogin).big_integer().not_null())
                    .col(ColumnDef::new(Users::ForcePasswordReset).boolean().not_null().default(false))
                    .col(ColumnDef::new(Users::DisableAccount).boolean().not_null().default(false))
                    .col(ColumnDef::new(Users::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Users::UpdatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Users::DeletedAt).big_integer().null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_users_deleted_at")
                    .table(Users::Table)
                    .col(Users::DeletedAt)
                    .to_owned(),
            )
            .await?;

        // Unique among live rows only; deleted rows keep their key
        manager
            .create_index(
                Index::create()
                    .name("idx_users_username_live")
                    .table(Users::Table)
                    .col(Users::Username)
                    .unique()
                    .and_where(Expr::col(Users::DeletedAt).is_null())
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Username,
    Email,
    Password,
    RoleId,
    RoleName,
    RolePermissions,
    RoleCreatedAt,
    RoleUpdatedAt,
    LoginAttempts,
    LastLogin,
    ForcePasswordReset,
    DisableAccount,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}
