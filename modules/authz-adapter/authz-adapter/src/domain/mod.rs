//! Domain layer for the authz adapter.

pub mod credential;
pub mod debug_override;
pub mod error;
pub mod policy;
pub mod service;

pub use error::DomainError;
pub use service::AuthzAdapterService;
