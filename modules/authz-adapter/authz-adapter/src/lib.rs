//! Authz Adapter Module
//!
//! Answers nginx `auth_request` sub-requests. Each `/check` call exchanges the
//! caller's bearer credential with the identity service, maps the returned
//! authorization grants to coarse group names and reports the decision
//! through `X-Auth-Request-*` response headers.
//!
//! The crate holds no cross-request state: the configuration is threaded
//! into [`domain::service::AuthzAdapterService`] at startup and every request
//! fetches a fresh document.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod api;
pub mod config;
pub mod domain;
pub mod infra;
pub mod module;

pub use config::AuthzAdapterConfig;
pub use domain::policy::decide_groups;
pub use domain::service::{AuthzAdapterService, CheckOutcome, CheckRequest, DecisionSource};
pub use module::AuthzAdapterModule;
