use chrono::Utc;
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, NotSet, PaginatorTrait,
    QueryFilter, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::errors::{DatabaseError, InternalError};
use crate::stores::UpsertStrategy;
use crate::types::db::user::{self, ActiveModel, Entity as UserEntity};
use crate::types::internal::User;

/// UserStore persists accounts keyed by their unique username
pub struct UserStore {
    strategy: UpsertStrategy,
}

impl UserStore {
    pub fn new(strategy: UpsertStrategy) -> Self {
        Self { strategy }
    }

    /// Load a live (not soft-deleted) user by exact username
    ///
    /// # Returns
    /// * `Ok(User)` - The user with its stored role snapshot
    /// * `Err(InternalError::NotFound)` - No live user has that username
    /// * `Err(InternalError::Database)` - Query failed
    pub async fn load(&self, conn: &impl ConnectionTrait, username: &str) -> Result<User, InternalError> {
        UserEntity::find()
            .filter(user::Column::Username.eq(username))
            .filter(user::Column::DeletedAt.is_null())
            .one(conn)
            .await
            .map_err(|e| InternalError::database("load_user", e))?
            .map(User::from)
            .ok_or_else(|| InternalError::not_found("user", username))
    }

    /// Whether a live user holds `username` (case-sensitive)
    pub async fn exists(&self, conn: &impl ConnectionTrait, username: &str) -> Result<bool, InternalError> {
        let count = UserEntity::find()
            .filter(user::Column::Username.eq(username))
            .filter(user::Column::DeletedAt.is_null())
            .count(conn)
            .await
            .map_err(|e| InternalError::database("check_username_exists", e))?;

        Ok(count > 0)
    }

    /// Insert the user if no live row holds its username, otherwise overwrite that row
    ///
    /// The existing row keeps its id and `created_at`. Soft-deleted rows are
    /// never touched: a user carrying an id that no longer matches a live row
    /// is refused with `NotFound`, and a new user (empty id) whose username
    /// belonged to a deleted account gets a fresh row.
    pub async fn save(
        &self,
        conn: &(impl ConnectionTrait + TransactionTrait),
        user: &User,
    ) -> Result<(), InternalError> {
        self.upsert(conn, user).await.map(|_| ())
    }

    /// `save`, returning the row as stored
    pub(crate) async fn upsert(
        &self,
        conn: &(impl ConnectionTrait + TransactionTrait),
        user: &User,
    ) -> Result<User, InternalError> {
        match self.strategy {
            UpsertStrategy::ReadThenWrite => Self::read_then_write(conn, user, false).await,
            UpsertStrategy::Transactional => {
                let txn = conn
                    .begin()
                    .await
                    .map_err(|source| DatabaseError::TransactionBegin { source })?;
                let saved = Self::read_then_write(&txn, user, true).await?;
                txn.commit()
                    .await
                    .map_err(|source| DatabaseError::TransactionCommit { source })?;
                Ok(saved)
            }
            UpsertStrategy::OnConflict => Self::insert_on_conflict(conn, user).await,
        }
    }

    /// Soft-delete a user
    ///
    /// Refused with `ProtectedEntityError::User` when the embedded role of the
    /// given user, or of the stored row, has a permission value of exactly ADMIN.
    pub async fn delete(&self, conn: &impl ConnectionTrait, user: &User) -> Result<(), InternalError> {
        user.ensure_deletable()?;
        let stored = self.load(conn, &user.username).await?;
        stored.ensure_deletable()?;

        let now = Utc::now().timestamp();
        UserEntity::update_many()
            .col_expr(user::Column::DeletedAt, Expr::value(now))
            .col_expr(user::Column::UpdatedAt, Expr::value(now))
            .filter(user::Column::Id.eq(stored.id.as_str()))
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("soft_delete_user", e))?;

        tracing::debug!(username = %user.username, "User soft-deleted");
        Ok(())
    }

    async fn read_then_write(
        conn: &impl ConnectionTrait,
        user: &User,
        lock: bool,
    ) -> Result<User, InternalError> {
        let mut query = UserEntity::find()
            .filter(user::Column::Username.eq(user.username.as_str()))
            .filter(user::Column::DeletedAt.is_null());
        if lock {
            query = query.lock_exclusive();
        }
        let existing = query
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_user_for_save", e))?;

        let now = Utc::now().timestamp();
        match existing {
            Some(existing) if user.id.is_empty() || user.id == existing.id => {
                tracing::debug!(username = %user.username, "Saving existing user");
                let model = Self::active_model(user, existing.id, existing.created_at, now);
                let updated = model
                    .update(conn)
                    .await
                    .map_err(|e| InternalError::database("update_user", e))?;
                Ok(updated.into())
            }
            None if user.id.is_empty() => {
                tracing::debug!(username = %user.username, "Creating new user");
                let model = Self::active_model(user, Uuid::new_v4().to_string(), now, now);
                let inserted = model
                    .insert(conn)
                    .await
                    .map_err(|e| InternalError::database("insert_user", e))?;
                Ok(inserted.into())
            }
            _ => Err(Self::stale(user)),
        }
    }

    async fn insert_on_conflict(conn: &impl ConnectionTrait, user: &User) -> Result<User, InternalError> {
        if !user.id.is_empty() {
            let live = UserEntity::find()
                .filter(user::Column::Id.eq(user.id.as_str()))
                .filter(user::Column::Username.eq(user.username.as_str()))
                .filter(user::Column::DeletedAt.is_null())
                .count(conn)
                .await
                .map_err(|e| InternalError::database("find_user_for_save", e))?;
            if live == 0 {
                return Err(Self::stale(user));
            }
        }

        let now = Utc::now().timestamp();
        let model = Self::active_model(user, Uuid::new_v4().to_string(), now, now);

        // Targets the partial unique index, so deleted rows never conflict
        UserEntity::insert(model)
            .on_conflict(
                OnConflict::column(user::Column::Username)
                    .target_and_where(Expr::col(user::Column::DeletedAt).is_null())
                    .update_columns([
                        user::Column::Email,
                        user::Column::Password,
                        user::Column::RoleId,
                        user::Column::RoleName,
                        user::Column::RolePermissions,
                        user::Column::RoleCreatedAt,
                        user::Column::RoleUpdatedAt,
                        user::Column::LoginAttempts,
                        user::Column::LastLogin,
                        user::Column::ForcePasswordReset,
                        user::Column::DisableAccount,
                        user::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(conn)
            .await
            .map_err(|e| InternalError::database("upsert_user", e))?;

        UserEntity::find()
            .filter(user::Column::Username.eq(user.username.as_str()))
            .filter(user::Column::DeletedAt.is_null())
            .one(conn)
            .await
            .map_err(|e| InternalError::database("reload_user", e))?
            .map(User::from)
            .ok_or_else(|| {
                InternalError::database(
                    "reload_user",
                    DbErr::RecordNotFound(format!("user {} vanished after upsert", user.username)),
                )
            })
    }

    fn stale(user: &User) -> InternalError {
        tracing::warn!(username = %user.username, user_id = %user.id, "Refusing to save a user with no live row");
        InternalError::not_found("user", &user.username)
    }

    fn active_model(user: &User, id: String, created_at: i64, updated_at: i64) -> ActiveModel {
        ActiveModel {
            id: Set(id),
            username: Set(user.username.clone()),
            email: Set(user.email.clone()),
            password: Set(user.password.clone()),
            role_id: Set(user.role.id.clone()),
            role_name: Set(user.role.role_name.clone()),
            role_permissions: Set(user.role.permissions.into()),
            role_created_at: Set(user.role.created_at),
            role_updated_at: Set(user.role.updated_at),
            login_attempts: Set(i32::try_from(user.login_attempts).unwrap_or(i32::MAX)),
            last_login: Set(user.last_login),
            force_password_reset: Set(user.force_password_reset),
            disable_account: Set(user.disable_account),
            created_at: Set(created_at),
            updated_at: Set(updated_at),
            deleted_at: NotSet,
        }
    }
}

impl std::fmt::Debug for UserStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserStore")
            .field("strategy", &self.strategy)
            .finish()
    }
}
