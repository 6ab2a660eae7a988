use std::sync::Arc;

use axum::extract::rejection::QueryRejection;
use axum::extract::{Extension, Query};
use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;
use axum::response::Response;
use tracing::debug;

use crate::api::rest::dto::CheckQuery;
use crate::api::rest::mappers::outcome_to_response;
use crate::domain::service::AuthzAdapterService;

/// nginx `auth_request` decision.
///
/// Never answers 400: an unparseable query string is treated as empty and a
/// non-UTF-8 `Authorization` header as absent.
#[tracing::instrument(skip_all)]
pub async fn check(
    Extension(svc): Extension<Arc<AuthzAdapterService>>,
    headers: HeaderMap,
    query: Result<Query<CheckQuery>, QueryRejection>,
) -> Response {
    let query = match query {
        Ok(Query(query)) => query,
        Err(rejection) => {
            debug!(error = %rejection, "ignoring unparseable query string");
            CheckQuery::default()
        }
    };

    let authorization = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);

    let outcome = svc.check(&query.into_check_request(authorization)).await;
    outcome_to_response(&outcome)
}
