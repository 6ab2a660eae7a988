//! Authz adapter module wiring.

use std::sync::Arc;

use anyhow::Context;
use authz_adapter_sdk::IdentityProviderClient;
use axum::Router;
use tracing::{info, warn};

use crate::config::AuthzAdapterConfig;
use crate::domain::service::AuthzAdapterService;
use crate::infra::HttpIdentityClient;

/// Authz adapter module.
///
/// This module:
/// 1. Validates its configuration
/// 2. Builds the HTTP identity client (one shared connection pool)
/// 3. Exposes the decision service and the `/check` + `/healthz` router
pub struct AuthzAdapterModule {
    service: Arc<AuthzAdapterService>,
}

impl AuthzAdapterModule {
    /// Wire the module against the real identity service.
    ///
    /// # Errors
    /// Fails if the configuration is invalid or the HTTP client cannot be
    /// built.
    #[tracing::instrument(skip_all, fields(fence_base = %cfg.fence_base))]
    pub fn from_config(cfg: &AuthzAdapterConfig) -> anyhow::Result<Self> {
        cfg.validate().context("invalid authz adapter configuration")?;

        let userinfo_url = cfg.userinfo_url()?;
        let timeout = cfg.timeout()?;
        let identity = HttpIdentityClient::new(&userinfo_url, timeout)
            .context("failed to build identity client")?;

        info!(
            userinfo_url = %userinfo_url,
            timeout_ms = timeout.as_millis(),
            service_token = cfg.service_token().is_some(),
            "Initializing authz_adapter"
        );

        Ok(Self::with_identity_client(cfg, Arc::new(identity)))
    }

    /// Wire the module against any identity client.
    #[must_use]
    pub fn with_identity_client(
        cfg: &AuthzAdapterConfig,
        identity: Arc<dyn IdentityProviderClient>,
    ) -> Self {
        let service = AuthzAdapterService::from_config(cfg, identity);
        if service.debug_override_enabled() {
            warn!(
                debug_email = cfg.debug_email().unwrap_or_default(),
                "debug override is enabled; do not run this configuration in production"
            );
        }

        Self {
            service: Arc::new(service),
        }
    }

    #[must_use]
    pub fn service(&self) -> Arc<AuthzAdapterService> {
        Arc::clone(&self.service)
    }

    #[must_use]
    pub fn router(&self) -> Router {
        crate::api::rest::router(self.service())
    }
}
