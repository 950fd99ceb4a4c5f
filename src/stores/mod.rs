// Stores layer - data access for roles and users
pub mod role_store;
pub mod upsert;
pub mod user_store;

pub use role_store::RoleStore;
pub use upsert::UpsertStrategy;
pub use user_store::UserStore;
