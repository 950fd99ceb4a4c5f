// Domain values passed between stores, providers and callers
pub mod logon;
pub mod permission;
pub mod role;
pub mod user;

pub use logon::LogonState;
pub use permission::PermissionSet;
pub use role::Role;
pub use user::User;
