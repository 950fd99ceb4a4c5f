use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub username: String,
    pub email: String,
    // Argon2 PHC string bytes
    pub password: Vec<u8>,

    // Role snapshot taken when the user was last saved
    pub role_id: String,
    pub role_name: String,
    pub role_permissions: i64,
    pub role_created_at: i64,
    pub role_updated_at: i64,

    // Logon tracking
    pub login_attempts: i32,
    pub last_login: i64,
    pub force_password_reset: bool,
    pub disable_account: bool,

    pub created_at: i64,
    pub updated_at: i64,
    pub deleted_at: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
