use chrono::Utc;
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, NotSet, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::errors::{DatabaseError, InternalError};
use crate::stores::UpsertStrategy;
use crate::types::db::role::{self, ActiveModel, Entity as RoleEntity};
use crate::types::internal::role::{ADMIN_ROLE, NO_PERMISSIONS_ROLE};
use crate::types::internal::{PermissionSet, Role};

/// RoleStore persists roles keyed by their unique name
pub struct RoleStore {
    strategy: UpsertStrategy,
}

impl RoleStore {
    pub fn new(strategy: UpsertStrategy) -> Self {
        Self { strategy }
    }

    /// Load a live (not soft-deleted) role by exact name
    ///
    /// # Returns
    /// * `Ok(Role)` - The role
    /// * `Err(InternalError::NotFound)` - No live role has that name
    /// * `Err(InternalError::Database)` - Query failed
    pub async fn load(&self, conn: &impl ConnectionTrait, name: &str) -> Result<Role, InternalError> {
        RoleEntity::find()
            .filter(role::Column::RoleName.eq(name))
            .filter(role::Column::DeletedAt.is_null())
            .one(conn)
            .await
            .map_err(|e| InternalError::database("load_role", e))?
            .map(Role::from)
            .ok_or_else(|| InternalError::not_found("role", name))
    }

    /// All live roles, ordered by name
    pub async fn list(&self, conn: &impl ConnectionTrait) -> Result<Vec<Role>, InternalError> {
        let roles = RoleEntity::find()
            .filter(role::Column::DeletedAt.is_null())
            .order_by_asc(role::Column::RoleName)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("list_roles", e))?;

        Ok(roles.into_iter().map(Role::from).collect())
    }

    /// Insert the role if no live row holds its name, otherwise overwrite that row
    ///
    /// The existing row keeps its id and `created_at`. A role carrying an id
    /// with no live row behind it is refused with `NotFound`; a soft-deleted
    /// row is left as it is.
    pub async fn save(
        &self,
        conn: &(impl ConnectionTrait + TransactionTrait),
        role: &Role,
    ) -> Result<(), InternalError> {
        self.upsert(conn, role).await.map(|_| ())
    }

    /// `save`, returning the row as stored
    pub(crate) async fn upsert(
        &self,
        conn: &(impl ConnectionTrait + TransactionTrait),
        role: &Role,
    ) -> Result<Role, InternalError> {
        match self.strategy {
            UpsertStrategy::ReadThenWrite => Self::read_then_write(conn, role, false).await,
            UpsertStrategy::Transactional => {
                let txn = conn
                    .begin()
                    .await
                    .map_err(|source| DatabaseError::TransactionBegin { source })?;
                let saved = Self::read_then_write(&txn, role, true).await?;
                txn.commit()
                    .await
                    .map_err(|source| DatabaseError::TransactionCommit { source })?;
                Ok(saved)
            }
            UpsertStrategy::OnConflict => Self::insert_on_conflict(conn, role).await,
        }
    }

    /// Soft-delete a role
    ///
    /// Refused with `ProtectedEntityError::Role` when either the given role or
    /// the stored row has a permission value of exactly ADMIN.
    pub async fn delete(&self, conn: &impl ConnectionTrait, role: &Role) -> Result<(), InternalError> {
        role.ensure_deletable()?;
        let stored = self.load(conn, &role.role_name).await?;
        stored.ensure_deletable()?;

        let now = Utc::now().timestamp();
        RoleEntity::update_many()
            .col_expr(role::Column::DeletedAt, Expr::value(now))
            .col_expr(role::Column::UpdatedAt, Expr::value(now))
            .filter(role::Column::Id.eq(stored.id.as_str()))
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("soft_delete_role", e))?;

        tracing::debug!(role_name = %role.role_name, "Role soft-deleted");
        Ok(())
    }

    /// Make sure `NO_PERMISSIONS` and `ADMIN` exist with their fixed values
    ///
    /// Safe to call on every startup.
    pub async fn initialize_defaults(
        &self,
        conn: &(impl ConnectionTrait + TransactionTrait),
    ) -> Result<(), InternalError> {
        self.save(conn, &Role::new(NO_PERMISSIONS_ROLE, PermissionSet::NO_PERMISSIONS))
            .await?;
        self.save(conn, &Role::new(ADMIN_ROLE, PermissionSet::ADMIN))
            .await?;

        tracing::info!("Default roles initialized");
        Ok(())
    }

    async fn read_then_write(
        conn: &impl ConnectionTrait,
        role: &Role,
        lock: bool,
    ) -> Result<Role, InternalError> {
        let mut query = RoleEntity::find()
            .filter(role::Column::RoleName.eq(role.role_name.as_str()))
            .filter(role::Column::DeletedAt.is_null());
        if lock {
            query = query.lock_exclusive();
        }
        let existing = query
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_role_for_save", e))?;

        let now = Utc::now().timestamp();
        match existing {
            Some(existing) if role.id.is_empty() || role.id == existing.id => {
                tracing::debug!(role_name = %role.role_name, "Saving existing role");
                let model = Self::active_model(role, existing.id, existing.created_at, now);
                let updated = model
                    .update(conn)
                    .await
                    .map_err(|e| InternalError::database("update_role", e))?;
                Ok(updated.into())
            }
            None if role.id.is_empty() => {
                tracing::debug!(role_name = %role.role_name, "Creating new role");
                let model = Self::active_model(role, Uuid::new_v4().to_string(), now, now);
                let inserted = model
                    .insert(conn)
                    .await
                    .map_err(|e| InternalError::database("insert_role", e))?;
                Ok(inserted.into())
            }
            _ => Err(Self::stale(role)),
        }
    }

    async fn insert_on_conflict(conn: &impl ConnectionTrait, role: &Role) -> Result<Role, InternalError> {
        if !role.id.is_empty() {
            let live = RoleEntity::find()
                .filter(role::Column::Id.eq(role.id.as_str()))
                .filter(role::Column::RoleName.eq(role.role_name.as_str()))
                .filter(role::Column::DeletedAt.is_null())
                .count(conn)
                .await
                .map_err(|e| InternalError::database("find_role_for_save", e))?;
            if live == 0 {
                return Err(Self::stale(role));
            }
        }

        let now = Utc::now().timestamp();
        let model = Self::active_model(role, Uuid::new_v4().to_string(), now, now);

        RoleEntity::insert(model)
            .on_conflict(
                OnConflict::column(role::Column::RoleName)
                    .target_and_where(Expr::col(role::Column::DeletedAt).is_null())
                    .update_columns([role::Column::Permissions, role::Column::UpdatedAt])
                    .to_owned(),
            )
            .exec_without_returning(conn)
            .await
            .map_err(|e| InternalError::database("upsert_role", e))?;

        RoleEntity::find()
            .filter(role::Column::RoleName.eq(role.role_name.as_str()))
            .filter(role::Column::DeletedAt.is_null())
            .one(conn)
            .await
            .map_err(|e| InternalError::database("reload_role", e))?
            .map(Role::from)
            .ok_or_else(|| {
                InternalError::database(
                    "reload_role",
                    DbErr::RecordNotFound(format!("role {} vanished after upsert", role.role_name)),
                )
            })
    }

    fn stale(role: &Role) -> InternalError {
        tracing::warn!(role_name = %role.role_name, role_id = %role.id, "Refusing to save a role with no live row");
        InternalError::not_found("role", &role.role_name)
    }

    fn active_model(role: &Role, id: String, created_at: i64, updated_at: i64) -> ActiveModel {
        ActiveModel {
            id: Set(id),
            role_name: Set(role.role_name.clone()),
            permissions: Set(role.permissions.into()),
            created_at: Set(created_at),
            updated_at: Set(updated_at),
            deleted_at: NotSet,
        }
    }
}

impl std::fmt::Debug for RoleStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoleStore")
            .field("strategy", &self.strategy)
            .finish()
    }
}
