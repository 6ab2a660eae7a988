//! HTTP client for the identity service `/user` endpoint.

use std::time::Duration;

use async_trait::async_trait;
use authz_adapter_sdk::{IdentityError, IdentityProviderClient, UserAuthorizationDocument};
use bytes::Bytes;
use http::header::{ACCEPT, AUTHORIZATION};
use http::{HeaderValue, Method, Request, StatusCode, Uri};
use http_body_util::{BodyExt, Empty};
use hyper_rustls::HttpsConnector;
use hyper_util::client::legacy::Client;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::rt::TokioExecutor;
use secrecy::{ExposeSecret, SecretString};
use url::Url;

use crate::domain::error::DomainError;

type HttpsClient = Client<HttpsConnector<HttpConnector>, Empty<Bytes>>;

/// Fetches user documents over HTTP(S).
///
/// Cheap to share: the underlying connection pool is reused across requests.
#[derive(Clone)]
pub struct HttpIdentityClient {
    client: HttpsClient,
    userinfo_uri: Uri,
    timeout: Duration,
}

impl std::fmt::Debug for HttpIdentityClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpIdentityClient")
            .field("userinfo_uri", &self.userinfo_uri)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl HttpIdentityClient {
    /// Build a client for `userinfo_url`, bounding each exchange by `timeout`.
    ///
    /// # Errors
    /// Returns `DomainError::ClientInit` if the URL cannot be used as a
    /// request URI or the TLS configuration cannot be built.
    pub fn new(userinfo_url: &Url, timeout: Duration) -> Result<Self, DomainError> {
        let userinfo_uri = Uri::try_from(userinfo_url.as_str())
            .map_err(|e| DomainError::client_init(format!("userinfo url: {e}")))?;

        let https = hyper_rustls::HttpsConnectorBuilder::new()
            .with_provider_and_webpki_roots(rustls::crypto::aws_lc_rs::default_provider())
            .map_err(|e| DomainError::client_init(format!("tls: {e}")))?
            .https_or_http()
            .enable_http1()
            .build();

        let client = Client::builder(TokioExecutor::new()).build(https);

        Ok(Self {
            client,
            userinfo_uri,
            timeout,
        })
    }

    #[must_use]
    pub fn userinfo_uri(&self) -> &Uri {
        &self.userinfo_uri
    }

    async fn exchange(
        &self,
        authorization: &SecretString,
    ) -> Result<UserAuthorizationDocument, IdentityError> {
        let mut credential = HeaderValue::from_str(authorization.expose_secret())
            .map_err(|_| IdentityError::Request("invalid authorization header".to_owned()))?;
        credential.set_sensitive(true);

        let request = Request::builder()
            .method(Method::GET)
            .uri(self.userinfo_uri.clone())
            .header(ACCEPT, "application/json")
            .header(AUTHORIZATION, credential)
            .body(Empty::<Bytes>::new())
            .map_err(|e| IdentityError::Request(e.to_string()))?;

        let response = self.client.request(request).await.map_err(|e| {
            if e.is_connect() {
                IdentityError::Connection(e.to_string())
            } else {
                IdentityError::Request(e.to_string())
            }
        })?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(IdentityError::UpstreamStatus(status.as_u16()));
        }

        let body = response
            .into_body()
            .collect()
            .await
            .map_err(|e| IdentityError::Request(e.to_string()))?
            .to_bytes();

        serde_json::from_slice(&body).map_err(|e| IdentityError::MalformedResponse(e.to_string()))
    }
}

#[async_trait]
impl IdentityProviderClient for HttpIdentityClient {
    #[tracing::instrument(skip_all, fields(uri = %self.userinfo_uri))]
    async fn fetch_user_document(
        &self,
        authorization: &SecretString,
    ) -> Result<UserAuthorizationDocument, IdentityError> {
        tokio::time::timeout(self.timeout, self.exchange(authorization))
            .await
            .map_err(|_| IdentityError::Timeout)?
    }
}
