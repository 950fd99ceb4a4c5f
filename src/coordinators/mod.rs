// Coordinators layer - Workflow orchestration
//
// Coordinators expose the identity operations to callers and hand each one
// the shared connection. Rules live in the providers and stores below.

pub mod identity_coordinator;

pub use identity_coordinator::IdentityCoordinator;
