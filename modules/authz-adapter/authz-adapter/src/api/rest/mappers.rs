//! Decision outcome to HTTP response mapping.

use authz_adapter_sdk::GroupDecision;
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::api::rest::error::{
    INVALID_SUBJECT_REASON, forbidden, identity_error_to_response, unauthorized,
};
use crate::domain::service::CheckOutcome;

pub const X_AUTH_REQUEST_USER: &str = "x-auth-request-user";
pub const X_AUTH_REQUEST_EMAIL: &str = "x-auth-request-email";
pub const X_AUTH_REQUEST_GROUPS: &str = "x-auth-request-groups";
pub const X_ALLOWED: &str = "x-allowed";

#[must_use]
pub fn outcome_to_response(outcome: &CheckOutcome) -> Response {
    match outcome {
        CheckOutcome::Allowed {
            subject, groups, ..
        } => allowed(subject, groups),
        CheckOutcome::Forbidden { .. } => forbidden(),
        CheckOutcome::Unauthenticated(err) => identity_error_to_response(err),
    }
}

fn allowed(subject: &str, groups: &GroupDecision) -> Response {
    // Group names come from a fixed vocabulary or from trusted configuration.
    let (Ok(subject), Ok(groups)) = (
        HeaderValue::from_bytes(subject.as_bytes()),
        HeaderValue::from_str(&groups.header_value()),
    ) else {
        tracing::warn!("decision could not be encoded as response headers");
        return unauthorized(&INVALID_SUBJECT_REASON);
    };

    let mut headers = HeaderMap::with_capacity(4);
    headers.insert(X_AUTH_REQUEST_USER, subject.clone());
    headers.insert(X_AUTH_REQUEST_EMAIL, subject);
    headers.insert(X_AUTH_REQUEST_GROUPS, groups);
    headers.insert(X_ALLOWED, HeaderValue::from_static("true"));

    (StatusCode::OK, headers).into_response()
}
