//! Error types for the upstream identity exchange.

use thiserror::Error;

/// Reasons a credential could not be exchanged for a user document.
///
/// The `Display` output is the short diagnostic placed in the 401 body.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IdentityError {
    /// Neither a bearer token nor a service token was available.
    #[error("no token")]
    MissingCredential,

    /// The identity service answered with a non-200 status.
    #[error("userinfo status {0}")]
    UpstreamStatus(u16),

    /// The exchange did not complete within the configured timeout.
    #[error("timeout")]
    Timeout,

    /// The identity service could not be reached.
    #[error("connection error")]
    Connection(String),

    /// The response body is not a valid authorization document.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// Any other transport failure.
    #[error("request error: {0}")]
    Request(String),
}
