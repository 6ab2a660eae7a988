//! Authz adapter SDK
//!
//! This crate provides the public contract of the `authz_adapter` module:
//!
//! - [`IdentityProviderClient`] - Trait for exchanging a credential for a user document
//! - [`UserAuthorizationDocument`] / [`GrantRecord`] - Identity service document models
//! - [`ResourceDescriptor`] - Optional Kubernetes-style request context
//! - [`GroupDecision`] - Ordered set of coarse group names
//! - [`IdentityError`] - Error taxonomy for the upstream exchange
//!
//! ## Usage
//!
//! ```ignore
//! use authz_adapter_sdk::IdentityProviderClient;
//!
//! let doc = client.fetch_user_document(&authorization).await?;
//! if doc.is_active() {
//!     // ...
//! }
//! ```
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod api;
pub mod error;
pub mod models;

// Re-export main types at crate root
pub use api::IdentityProviderClient;
pub use error::IdentityError;
pub use models::{
    ARGO_RUNNER_GROUP, ARGO_VIEWER_GROUP, GrantRecord, GroupDecision, ResourceDescriptor,
    UserAuthorizationDocument,
};
