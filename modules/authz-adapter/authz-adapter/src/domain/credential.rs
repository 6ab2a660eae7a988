//! Outbound credential selection.

use authz_adapter_sdk::IdentityError;
use secrecy::{ExposeSecret, SecretString};

const BEARER_PREFIX: &str = "Bearer ";

/// Pick the `Authorization` value to send to the identity service.
///
/// A caller header starting with `Bearer ` (any case) is forwarded verbatim.
/// Anything else, including an absent header, falls back to the service
/// token when one is configured.
///
/// # Errors
/// Returns `IdentityError::MissingCredential` when neither is available.
pub fn resolve_credential(
    authorization: Option<&str>,
    service_token: Option<&SecretString>,
) -> Result<SecretString, IdentityError> {
    if let Some(header) = authorization.filter(|h| is_bearer(h)) {
        return Ok(SecretString::from(header.to_owned()));
    }

    match service_token {
        Some(token) => Ok(SecretString::from(format!(
            "{BEARER_PREFIX}{}",
            token.expose_secret()
        ))),
        None => Err(IdentityError::MissingCredential),
    }
}

fn is_bearer(header: &str) -> bool {
    header
        .get(..BEARER_PREFIX.len())
        .is_some_and(|scheme| scheme.eq_ignore_ascii_case(BEARER_PREFIX))
}
