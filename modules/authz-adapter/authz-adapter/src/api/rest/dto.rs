use authz_adapter_sdk::ResourceDescriptor;
use serde::Deserialize;

use crate::domain::service::CheckRequest;

/// Query parameters accepted by `GET /check`.
///
/// Everything is optional; unknown parameters are ignored so nginx can pass
/// the original query string through untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CheckQuery {
    #[serde(default)]
    pub debug_email: Option<String>,
    #[serde(default)]
    pub debug_groups: Option<String>,

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

impl CheckQuery {
    /// The resource context, present when `group` or `resource` is given.
    #[must_use]
    pub fn resource_descriptor(&self) -> Option<ResourceDescriptor> {
        let group = non_empty(self.group.as_deref());
        let resource = non_empty(self.resource.as_deref());
        if group.is_none() && resource.is_none() {
            return None;
        }

        Some(ResourceDescriptor {
            verb: non_empty(self.verb.as_deref()),
            group,
            version: non_empty(self.version.as_deref()),
            resource,
            namespace: non_empty(self.namespace.as_deref()),
        })
    }

    #[must_use]
    pub fn into_check_request(self, authorization: Option<String>) -> CheckRequest {
        let resource = self.resource_descriptor();
        CheckRequest {
            authorization,
            debug_email: self.debug_email,
            debug_groups: self.debug_groups,
            resource,
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(str::to_owned)
}
