//! Domain errors for the authz adapter.
//!
//! Request-time failures are [`authz_adapter_sdk::IdentityError`] values and
//! always end up as HTTP responses; these errors only occur while wiring the
//! service at startup.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("invalid configuration: {message}")]
    InvalidConfig { message: String },

    #[error("failed to build identity client: {message}")]
    ClientInit { message: String },
}

impl DomainError {
    #[must_use]
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn client_init(message: impl Into<String>) -> Self {
        Self::ClientInit {
            message: message.into(),
        }
    }
}
