// Providers layer - Work performers and business logic
//
// Providers contain the identity rules and compose store operations that
// the coordinator exposes. They never own a connection; every call takes one.

pub mod authentication_provider;
pub mod password_policy_provider;
pub mod user_provider;

pub use authentication_provider::AuthenticationProvider;
pub use password_policy_provider::{HashCost, PasswordPolicyProvider};
pub use user_provider::UserProvider;
