use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Roles::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Roles::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Roles::RoleName).string().not_null())
                    .col(ColumnDef::new(Roles::Permissions).big_integer().not_null().default(0))
                    .col(ColumnDef::new(Roles::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Roles::UpdatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Roles::DeletedAt).big_integer().null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_roles_deleted_at")
                    .table(Roles::Table)
                    .col(Roles::DeletedAt)
                    .to_owned(),
            )
            .await?;

        // Unique among live rows only; deleted rows keep their key
        manager
            .create_index(
                Index::create()
                    .name("idx_roles_role_name_live")
                    .table(Roles::Table)
                    .col(Roles::RoleName)
                    .unique()
                    .and_where(Expr::col(Roles::DeletedAt).is_null())
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Roles::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Roles {
    Table,
    Id,
    RoleName,
    Permissions,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}
