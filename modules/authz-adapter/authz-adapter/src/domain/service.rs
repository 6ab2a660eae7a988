//! Authorization decision service.

use std::sync::Arc;

use authz_adapter_sdk::{
    GroupDecision, IdentityError, IdentityProviderClient, ResourceDescriptor,
    UserAuthorizationDocument,
};
use secrecy::SecretString;
use tracing::{debug, info, warn};

use crate::config::AuthzAdapterConfig;
use crate::domain::credential::resolve_credential;
use crate::domain::debug_override::DebugSettings;
use crate::domain::policy::decide_groups;

/// Inputs of one `/check` sub-request, already extracted from HTTP.
#[derive(Debug, Clone, Default)]
pub struct CheckRequest {
    /// Raw `Authorization` header value, if present and valid UTF-8.
    pub authorization: Option<String>,
    pub debug_email: Option<String>,
    pub debug_groups: Option<String>,
    pub resource: Option<ResourceDescriptor>,
}

/// Where an allow decision came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecisionSource {
    IdentityService,
    DebugOverride,
}

/// Result of a `/check` evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    /// Authenticated and granted at least one group.
    Allowed {
        subject: String,
        groups: GroupDecision,
        source: DecisionSource,
    },
    /// Authenticated, but the document yielded no groups.
    Forbidden { subject: String },
    /// The credential could not be exchanged for a document.
    Unauthenticated(IdentityError),
}

/// Turns `/check` inputs into a decision.
///
/// Holds only read-only settings and the shared identity client; one instance
/// serves every request concurrently.
pub struct AuthzAdapterService {
    identity: Arc<dyn IdentityProviderClient>,
    service_token: Option<SecretString>,
    debug: DebugSettings,
}

impl AuthzAdapterService {
    #[must_use]
    pub fn new(
        identity: Arc<dyn IdentityProviderClient>,
        service_token: Option<SecretString>,
        debug: DebugSettings,
    ) -> Self {
        Self {
            identity,
            service_token,
            debug,
        }
    }

    #[must_use]
    pub fn from_config(
        cfg: &AuthzAdapterConfig,
        identity: Arc<dyn IdentityProviderClient>,
    ) -> Self {
        Self::new(
            identity,
            cfg.service_token(),
            DebugSettings::new(cfg.debug_email(), cfg.debug_groups()),
        )
    }

    #[must_use]
    pub fn debug_override_enabled(&self) -> bool {
        self.debug.is_enabled()
    }

    /// Exchange the caller's `Authorization` header for a user document.
    ///
    /// # Errors
    /// Returns `IdentityError::MissingCredential` without contacting the
    /// identity service when no credential is available, otherwise whatever
    /// the identity client reports.
    pub async fn fetch_user_document(
        &self,
        authorization: Option<&str>,
    ) -> Result<UserAuthorizationDocument, IdentityError> {
        let credential = resolve_credential(authorization, self.service_token.as_ref())?;
        self.identity.fetch_user_document(&credential).await
    }

    /// Evaluate one sub-request.
    pub async fn check(&self, request: &CheckRequest) -> CheckOutcome {
        if let Some(overridden) = self
            .debug
            .resolve(request.debug_email.as_deref(), request.debug_groups.as_deref())
        {
            warn!(
                subject = %overridden.email,
                groups = %overridden.groups.header_value(),
                "debug override bypassed identity service"
            );
            return CheckOutcome::Allowed {
                subject: overridden.email,
                groups: overridden.groups,
                source: DecisionSource::DebugOverride,
            };
        }

        let doc = match self
            .fetch_user_document(request.authorization.as_deref())
            .await
        {
            Ok(doc) => doc,
            Err(err) => {
                warn!(error = %err, "identity fetch failed");
                return CheckOutcome::Unauthenticated(err);
            }
        };

        let groups = decide_groups(&doc, request.resource.as_ref());
        let subject = doc.subject().to_owned();
        let resource = request.resource.as_ref();

        if groups.is_empty() {
            info!(
                %subject,
                active = ?doc.active,
                verb = ?resource.and_then(|r| r.verb.as_deref()),
                resource = ?resource.and_then(|r| r.resource.as_deref()),
                "access forbidden"
            );
            return CheckOutcome::Forbidden { subject };
        }

        debug!(
            %subject,
            groups = %groups.header_value(),
            namespace = ?resource.and_then(|r| r.namespace.as_deref()),
            "access allowed"
        );
        CheckOutcome::Allowed {
            subject,
            groups,
            source: DecisionSource::IdentityService,
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use authz_adapter_sdk::GrantRecord;
    use secrecy::ExposeSecret;
    use tracing_test::traced_test;

    use super::*;
    use crate::domain::policy::WORKFLOW_RESOURCE_PATH;

    /// Identity client returning a canned result and recording credentials.
    struct FakeIdentity {
        result: Result<UserAuthorizationDocument, IdentityError>,
        seen: Mutex<Vec<String>>,
    }

    impl FakeIdentity {
        fn returning(result: Result<UserAuthorizationDocument, IdentityError>) -> Arc<Self> {
            Arc::new(Self {
                result,
                seen: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> Vec<String> {
            self.seen.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl IdentityProviderClient for FakeIdentity {
        async fn fetch_user_document(
            &self,
            authorization: &SecretString,
        ) -> Result<UserAuthorizationDocument, IdentityError> {
            self.seen
                .lock()
                .unwrap()
                .push(authorization.expose_secret().to_owned());
            self.result.clone()
        }
    }

    fn runner_document() -> UserAuthorizationDocument {
        UserAuthorizationDocument {
            active: Some(true),
            email: Some("test@example.com".to_owned()),
            authz: Some(HashMap::from([(
                WORKFLOW_RESOURCE_PATH.to_owned(),
                vec![GrantRecord::new("create", "gen3-workflow")],
            )])),
            ..UserAuthorizationDocument::default()
        }
    }

    fn service(identity: Arc<FakeIdentity>, cfg: &AuthzAdapterConfig) -> AuthzAdapterService {
        AuthzAdapterService::from_config(cfg, identity)
    }

    fn bearer(token: &str) -> CheckRequest {
        CheckRequest {
            authorization: Some(format!("Bearer {token}")),
            ..CheckRequest::default()
        }
    }

    fn debug_config() -> AuthzAdapterConfig {
        AuthzAdapterConfig {
            debug_email: Some("debug@example.com".to_owned()),
            debug_groups: Some("argo-runner,argo-viewer".to_owned()),
            ..AuthzAdapterConfig::default()
        }
    }

    #[tokio::test]
    async fn allows_runner_with_identity_service_source() {
        let identity = FakeIdentity::returning(Ok(runner_document()));
        let svc = service(identity.clone(), &AuthzAdapterConfig::default());

        let outcome = svc.check(&bearer("test-token")).await;

        let CheckOutcome::Allowed {
            subject,
            groups,
            source,
        } = outcome
        else {
            panic!("expected allow");
        };
        assert_eq!(subject, "test@example.com");
        assert_eq!(groups.header_value(), "argo-runner,argo-viewer");
        assert_eq!(source, DecisionSource::IdentityService);
        assert_eq!(identity.calls(), vec!["Bearer test-token".to_owned()]);
    }

    #[tokio::test]
    async fn inactive_document_is_forbidden() {
        let doc = UserAuthorizationDocument {
            active: Some(false),
            ..runner_document()
        };
        let svc = service(FakeIdentity::returning(Ok(doc)), &AuthzAdapterConfig::default());

        assert_eq!(
            svc.check(&bearer("t")).await,
            CheckOutcome::Forbidden {
                subject: "test@example.com".to_owned()
            }
        );
    }

    #[tokio::test]
    async fn empty_document_is_forbidden() {
        let svc = service(
            FakeIdentity::returning(Ok(UserAuthorizationDocument::default())),
            &AuthzAdapterConfig::default(),
        );

        assert_eq!(
            svc.check(&bearer("t")).await,
            CheckOutcome::Forbidden {
                subject: "unknown".to_owned()
            }
        );
    }

    #[tokio::test]
    async fn upstream_errors_are_unauthenticated() {
        for err in [
            IdentityError::UpstreamStatus(404),
            IdentityError::Timeout,
            IdentityError::Connection("refused".to_owned()),
            IdentityError::MalformedResponse("expected value".to_owned()),
        ] {
            let svc = service(
                FakeIdentity::returning(Err(err.clone())),
                &AuthzAdapterConfig::default(),
            );
            assert_eq!(
                svc.check(&bearer("t")).await,
                CheckOutcome::Unauthenticated(err)
            );
        }
    }

    #[tokio::test]
    async fn missing_credential_skips_the_network() {
        let identity = FakeIdentity::returning(Ok(runner_document()));
        let svc = service(identity.clone(), &AuthzAdapterConfig::default());

        let outcome = svc.check(&CheckRequest::default()).await;

        assert_eq!(
            outcome,
            CheckOutcome::Unauthenticated(IdentityError::MissingCredential)
        );
        assert!(identity.calls().is_empty());
    }

    #[tokio::test]
    async fn service_token_is_used_without_bearer_header() {
        let identity = FakeIdentity::returning(Ok(runner_document()));
        let cfg = AuthzAdapterConfig {
            fence_service_token: Some("service-token-123".to_owned()),
            ..AuthzAdapterConfig::default()
        };
        let svc = service(identity.clone(), &cfg);

        let request = CheckRequest {
            authorization: Some("Basic dXNlcjpwYXNz".to_owned()),
            ..CheckRequest::default()
        };
        assert!(matches!(
            svc.check(&request).await,
            CheckOutcome::Allowed { .. }
        ));
        assert_eq!(identity.calls(), vec!["Bearer service-token-123".to_owned()]);
    }

    #[tokio::test]
    async fn resource_descriptor_reaches_the_policy() {
        let doc = UserAuthorizationDocument {
            authz: None,
            ..runner_document()
        };
        let svc = service(FakeIdentity::returning(Ok(doc)), &AuthzAdapterConfig::default());
        let request = CheckRequest {
            resource: Some(ResourceDescriptor::new("argoproj.io", "workflows")),
            ..bearer("t")
        };

        let CheckOutcome::Allowed { groups, .. } = svc.check(&request).await else {
            panic!("expected allow");
        };
        assert_eq!(groups.header_value(), "argo-viewer");
    }

    #[tokio::test]
    async fn debug_override_skips_the_identity_service() {
        let identity = FakeIdentity::returning(Err(IdentityError::Timeout));
        let svc = service(identity.clone(), &debug_config());
        assert!(svc.debug_override_enabled());

        let outcome = svc.check(&CheckRequest::default()).await;

        assert_eq!(
            outcome,
            CheckOutcome::Allowed {
                subject: "debug@example.com".to_owned(),
                groups: ["argo-runner", "argo-viewer"].into_iter().collect(),
                source: DecisionSource::DebugOverride,
            }
        );
        assert!(identity.calls().is_empty());
    }

    #[tokio::test]
    async fn debug_query_values_are_ignored_when_switch_is_off() {
        let identity = FakeIdentity::returning(Ok(UserAuthorizationDocument::default()));
        let svc = service(identity.clone(), &AuthzAdapterConfig::default());
        let request = CheckRequest {
            debug_email: Some("someone@example.com".to_owned()),
            debug_groups: Some("argo-runner".to_owned()),
            ..bearer("t")
        };

        assert!(matches!(
            svc.check(&request).await,
            CheckOutcome::Forbidden { .. }
        ));
        assert_eq!(identity.calls().len(), 1);
    }

    #[tokio::test]
    async fn fetch_user_document_passes_document_through() {
        let svc = service(
            FakeIdentity::returning(Ok(runner_document())),
            &AuthzAdapterConfig::default(),
        );

        let doc = svc.fetch_user_document(Some("Bearer t")).await.unwrap();
        assert_eq!(doc, runner_document());
        assert_eq!(
            svc.fetch_user_document(None).await.unwrap_err(),
            IdentityError::MissingCredential
        );
    }

    #[tokio::test]
    #[traced_test]
    async fn logs_failures_and_overrides_without_tokens() {
        let svc = service(
            FakeIdentity::returning(Err(IdentityError::UpstreamStatus(401))),
            &AuthzAdapterConfig::default(),
        );
        svc.check(&bearer("super-secret-token")).await;

        assert!(logs_contain("identity fetch failed"));
        assert!(logs_contain("userinfo status 401"));
        assert!(!logs_contain("super-secret-token"));

        let svc = service(
            FakeIdentity::returning(Err(IdentityError::Timeout)),
            &debug_config(),
        );
        svc.check(&CheckRequest::default()).await;

        assert!(logs_contain("debug override bypassed identity service"));
    }
}
