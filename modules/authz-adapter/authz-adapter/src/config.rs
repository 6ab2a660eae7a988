//! Configuration for the authz adapter.

use std::time::Duration;

use secrecy::SecretString;
use serde::{Deserialize, Deserializer, Serialize};
use url::Url;

use crate::domain::error::DomainError;

/// Identity service base used when none is configured.
pub const DEFAULT_FENCE_BASE: &str = "https://calypr-dev.ohsu.edu/user";

/// Upstream timeout used when none is configured, in seconds.
pub const DEFAULT_HTTP_TIMEOUT_SECS: f64 = 3.0;

/// Path appended to the identity service base.
const USERINFO_PATH: &str = "/user";

/// Adapter configuration.
///
/// Every key mirrors the environment variable of the same name in upper
/// case (`FENCE_BASE`, `HTTP_TIMEOUT`, ...). Empty strings are treated as
/// unset.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AuthzAdapterConfig {
    /// Identity service base URL. `/user` is appended to form the userinfo
    /// endpoint.
    pub fence_base: String,

    /// Upstream timeout in seconds.
    pub http_timeout: f64,

    /// Service credential used when the caller presents no bearer token.
    #[serde(
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub fence_service_token: Option<String>,

    /// Debug override switch and identity. Local and staging use only.
    #[serde(
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub debug_email: Option<String>,

    /// Comma-separated groups granted by the debug override.
    #[serde(
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub debug_groups: Option<String>,
}

impl Default for AuthzAdapterConfig {
    fn default() -> Self {
        Self {
            fence_base: DEFAULT_FENCE_BASE.to_owned(),
            http_timeout: DEFAULT_HTTP_TIMEOUT_SECS,
            fence_service_token: None,
            debug_email: None,
            debug_groups: None,
        }
    }
}

impl AuthzAdapterConfig {
    /// Check every derived setting once, so startup fails instead of the
    /// first request.
    ///
    /// # Errors
    /// Returns `DomainError::InvalidConfig` if the base URL or the timeout
    /// is unusable.
    pub fn validate(&self) -> Result<(), DomainError> {
        self.userinfo_url()?;
        self.timeout()?;
        Ok(())
    }

    /// The userinfo endpoint: the base with trailing slashes trimmed, plus
    /// `/user`.
    ///
    /// # Errors
    /// Returns `DomainError::InvalidConfig` if the result is not an absolute
    /// `http` or `https` URL.
    pub fn userinfo_url(&self) -> Result<Url, DomainError> {
        let base = self.fence_base.trim().trim_end_matches('/');
        let url = Url::parse(&format!("{base}{USERINFO_PATH}")).map_err(|e| {
            DomainError::invalid_config(format!("fence_base '{}': {e}", self.fence_base))
        })?;

        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(DomainError::invalid_config(format!(
                "fence_base '{}': unsupported scheme '{other}'",
                self.fence_base
            ))),
        }
    }

    /// # Errors
    /// Returns `DomainError::InvalidConfig` unless `http_timeout` is a
    /// finite, positive number of seconds.
    pub fn timeout(&self) -> Result<Duration, DomainError> {
        match Duration::try_from_secs_f64(self.http_timeout) {
            Ok(timeout) if !timeout.is_zero() => Ok(timeout),
            _ => Err(DomainError::invalid_config(format!(
                "http_timeout must be a positive number of seconds, got {}",
                self.http_timeout
            ))),
        }
    }

    #[must_use]
    pub fn service_token(&self) -> Option<SecretString> {
        non_empty(self.fence_service_token.as_deref())
            .map(|token| SecretString::from(token.to_owned()))
    }

    #[must_use]
    pub fn debug_email(&self) -> Option<&str> {
        non_empty(self.debug_email.as_deref())
    }

    #[must_use]
    pub fn debug_groups(&self) -> Option<&str> {
        non_empty(self.debug_groups.as_deref())
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Accept scalars for string settings. Environment providers may hand over
/// `12345` as a number rather than a string.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Scalar {
        Text(String),
        Int(i64),
        Float(f64),
        Bool(bool),
    }

    Ok(Option::<Scalar>::deserialize(deserializer)?.map(|value| match value {
        Scalar::Text(s) => s,
        Scalar::Int(n) => n.to_string(),
        Scalar::Float(n) => n.to_string(),
        Scalar::Bool(b) => b.to_string(),
    }))
}
