//! Domain models for the authz adapter.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Group granted to callers allowed to submit workflows.
pub const ARGO_RUNNER_GROUP: &str = "argo-runner";

/// Group granted to every active caller.
pub const ARGO_VIEWER_GROUP: &str = "argo-viewer";

/// Subject reported when the document carries no usable identity.
const UNKNOWN_SUBJECT: &str = "unknown";

/// The identity service's `/user` response.
///
/// Only the fields the adapter reads are modelled; anything else the
/// identity service sends is ignored. The document is request-scoped and
/// never cached.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAuthorizationDocument {
    /// Whether the account is enabled. Missing or `null` means inactive.
    #[serde(default)]
    pub active: Option<bool>,

    #[serde(default)]
    pub email: Option<String>,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub username: Option<String>,

    /// Resource path to the grants held on it.
    #[serde(default)]
    pub authz: Option<HashMap<String, Vec<GrantRecord>>>,
}

impl UserAuthorizationDocument {
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active == Some(true)
    }

    /// The subject identity: first non-empty of `email`, `name`, `username`.
    #[must_use]
    pub fn subject(&self) -> &str {
        [&self.email, &self.name, &self.username]
            .into_iter()
            .filter_map(Option::as_deref)
            .find(|s| !s.is_empty())
            .unwrap_or(UNKNOWN_SUBJECT)
    }

    /// Grants stored under exactly `path`. No prefix matching.
    #[must_use]
    pub fn grants_at(&self, path: &str) -> &[GrantRecord] {
        self.authz
            .as_ref()
            .and_then(|authz| authz.get(path))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

/// One permitted operation on one resource path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrantRecord {
    #[serde(default)]
    pub method: Option<String>,

    /// Descriptive only, never consulted by the policy.
    #[serde(default)]
    pub service: Option<String>,
}

impl GrantRecord {
    #[must_use]
    pub fn new(method: impl Into<String>, service: impl Into<String>) -> Self {
        Self {
            method: Some(method.into()),
            service: Some(service.into()),
        }
    }
}

/// Kubernetes-style description of the operation being gated.
///
/// Only `group` and `resource` influence the decision; the remaining fields
/// are carried for logging.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceDescriptor {
    #[serde(default)]
    pub verb: Option<String>,
    #[serde(default)]
    pub group: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub resource: Option<String>,
    #[serde(default)]
    pub namespace: Option<String>,
}

impl ResourceDescriptor {
    #[must_use]
    pub fn new(group: impl Into<String>, resource: impl Into<String>) -> Self {
        Self {
            group: Some(group.into()),
            resource: Some(resource.into()),
            ..Self::default()
        }
    }
}

/// Ordered set of coarse group names derived for one request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupDecision {
    groups: Vec<String>,
}

impl GroupDecision {
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Append a group unless it is already present.
    pub fn grant(&mut self, group: impl Into<String>) {
        let group = group.into();
        if !self.contains(&group) {
            self.groups.push(group);
        }
    }

    #[must_use]
    pub fn contains(&self, group: &str) -> bool {
        self.groups.iter().any(|g| g == group)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.groups
    }

    /// Comma-joined form used for the `X-Auth-Request-Groups` header.
    #[must_use]
    pub fn header_value(&self) -> String {
        self.groups.join(",")
    }
}

impl<S: Into<String>> FromIterator<S> for GroupDecision {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut decision = Self::empty();
        for group in iter {
            decision.grant(group);
        }
        decision
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_identity_service_document() {
        let doc: UserAuthorizationDocument = serde_json::from_value(json!({
            "active": true,
            "email": "test@example.com",
            "name": "Test User",
            "username": "testuser",
            "project_access": {},
            "authz": {
                "/services/workflow/gen3-workflow": [
                    {"method": "create", "service": "gen3-workflow"}
                ]
            }
        }))
        .unwrap();

        assert!(doc.is_active());
        assert_eq!(doc.subject(), "test@example.com");
        assert_eq!(
            doc.grants_at("/services/workflow/gen3-workflow"),
            &[GrantRecord::new("create", "gen3-workflow")]
        );
    }

    #[test]
    fn missing_or_null_active_is_inactive() {
        let missing: UserAuthorizationDocument =
            serde_json::from_value(json!({"email": "a@b.c"})).unwrap();
        let null: UserAuthorizationDocument =
            serde_json::from_value(json!({"active": null})).unwrap();

        assert!(!missing.is_active());
        assert!(!null.is_active());
    }

    #[test]
    fn null_authz_and_grant_fields_are_tolerated() {
        let doc: UserAuthorizationDocument = serde_json::from_value(json!({
            "active": true,
            "authz": null
        }))
        .unwrap();
        assert!(doc.grants_at("/anything").is_empty());

        let doc: UserAuthorizationDocument = serde_json::from_value(json!({
            "active": true,
            "authz": {"/p": [{"service": "svc"}]}
        }))
        .unwrap();
        assert_eq!(doc.grants_at("/p")[0].method, None);
    }

    #[test]
    fn non_object_document_is_rejected() {
        assert!(serde_json::from_value::<UserAuthorizationDocument>(json!([1, 2])).is_err());
        assert!(
            serde_json::from_value::<UserAuthorizationDocument>(json!({"active": "yes"})).is_err()
        );
    }

    #[test]
    fn subject_falls_back_through_name_and_username() {
        let doc = UserAuthorizationDocument {
            email: Some(String::new()),
            name: Some("Test User".to_owned()),
            username: Some("testuser".to_owned()),
            ..UserAuthorizationDocument::default()
        };
        assert_eq!(doc.subject(), "Test User");

        let doc = UserAuthorizationDocument {
            username: Some("testuser".to_owned()),
            ..UserAuthorizationDocument::default()
        };
        assert_eq!(doc.subject(), "testuser");

        assert_eq!(UserAuthorizationDocument::default().subject(), "unknown");
    }

    #[test]
    fn grants_at_requires_exact_path() {
        let doc = UserAuthorizationDocument {
            authz: Some(HashMap::from([(
                "/services/workflow".to_owned(),
                vec![GrantRecord::new("create", "gen3-workflow")],
            )])),
            ..UserAuthorizationDocument::default()
        };

        assert_eq!(doc.grants_at("/services/workflow").len(), 1);
        assert!(doc.grants_at("/services/workflow/gen3-workflow").is_empty());
        assert!(doc.grants_at("/services").is_empty());
    }

    #[test]
    fn group_decision_keeps_order_and_dedups() {
        let decision: GroupDecision = ["argo-runner", "argo-viewer", "argo-runner"]
            .into_iter()
            .collect();

        assert_eq!(decision.as_slice(), &["argo-runner", "argo-viewer"]);
        assert_eq!(decision.header_value(), "argo-runner,argo-viewer");
        assert!(GroupDecision::empty().is_empty());
        assert_eq!(GroupDecision::empty().header_value(), "");
    }
}
