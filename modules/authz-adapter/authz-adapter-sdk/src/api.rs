//! Client trait for the upstream identity service.
//!
//! The decision service only sees this trait, so the HTTP implementation
//! can be swapped for an in-process fake in tests.

use async_trait::async_trait;
use secrecy::SecretString;

use crate::error::IdentityError;
use crate::models::UserAuthorizationDocument;

/// Exchanges an outbound `Authorization` header value for the caller's
/// authorization document.
///
/// Implementations perform exactly one upstream call per invocation and
/// never retry.
#[async_trait]
pub trait IdentityProviderClient: Send + Sync {
    /// Fetch the user document for the given credential.
    ///
    /// # Arguments
    ///
    /// * `authorization` - The complete header value to send upstream,
    ///   including the `Bearer ` scheme.
    ///
    /// # Errors
    ///
    /// - `UpstreamStatus` if the identity service answers with anything but 200
    /// - `Timeout` if the exchange does not finish within the configured bound
    /// - `Connection` if the identity service cannot be reached
    /// - `MalformedResponse` if the body is not a valid document
    /// - `Request` for any other transport failure
    async fn fetch_user_document(
        &self,
        authorization: &SecretString,
    ) -> Result<UserAuthorizationDocument, IdentityError>;
}
