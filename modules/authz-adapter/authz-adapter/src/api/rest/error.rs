use std::fmt::Display;

use authz_adapter_sdk::IdentityError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Reason reported when the subject cannot be placed in a response header.
pub const INVALID_SUBJECT_REASON: &str = "subject is not a valid header value";

/// 401 with a plain-text diagnostic.
#[must_use]
pub fn unauthorized(reason: &impl Display) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        format!("authz fetch failed: {reason}"),
    )
        .into_response()
}

/// Convert an identity exchange failure to its HTTP response.
#[must_use]
pub fn identity_error_to_response(err: &IdentityError) -> Response {
    unauthorized(err)
}

#[must_use]
pub fn forbidden() -> Response {
    (StatusCode::FORBIDDEN, "forbidden").into_response()
}
