//! Group decision policy.
//!
//! Maps an identity-service document to the coarse groups Argo and Argo CD
//! understand. Pure: the result depends only on the inputs.

use authz_adapter_sdk::{
    ARGO_RUNNER_GROUP, ARGO_VIEWER_GROUP, GroupDecision, ResourceDescriptor,
    UserAuthorizationDocument,
};
use tracing::trace;

/// Resource path whose grants decide the runner group. Exact match only.
pub const WORKFLOW_RESOURCE_PATH: &str = "/services/workflow/gen3-workflow";

/// Grant methods that qualify for the runner group. Matched case-sensitively:
/// `"CREATE"` does not qualify.
const RUNNER_METHODS: [&str; 2] = ["create", "*"];

const ARGO_API_GROUP: &str = "argoproj.io";
const ARGO_WORKFLOW_RESOURCES: [&str; 2] = ["workflows", "workflowtemplates"];

/// How the request context scoped the runner decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunnerScope {
    /// No resource context was supplied.
    Unscoped,
    /// The request targets Argo workflows or workflow templates.
    ArgoWorkflows,
    /// Some other resource family; handled like `Unscoped`.
    Fallback,
}

impl RunnerScope {
    #[must_use]
    pub fn of(resource: Option<&ResourceDescriptor>) -> Self {
        match resource {
            None => Self::Unscoped,
            Some(r) if targets_argo_workflows(r) => Self::ArgoWorkflows,
            Some(_) => Self::Fallback,
        }
    }
}

/// Derive the groups for `doc`.
///
/// Inactive documents get no groups at all. Active documents always get
/// `argo-viewer`, preceded by `argo-runner` when they hold a `create` or `*`
/// grant on [`WORKFLOW_RESOURCE_PATH`]. A resource descriptor only narrows the
/// decision for the Argo workflow family; any other descriptor falls back to
/// the same rule as no descriptor.
#[must_use]
pub fn decide_groups(
    doc: &UserAuthorizationDocument,
    resource: Option<&ResourceDescriptor>,
) -> GroupDecision {
    let mut groups = GroupDecision::empty();
    if !doc.is_active() {
        return groups;
    }

    let can_create_workflows = has_runner_grant(doc);
    let scope = RunnerScope::of(resource);
    trace!(?scope, can_create_workflows, "evaluating runner group");

    if can_create_workflows {
        groups.grant(ARGO_RUNNER_GROUP);
    }

    groups.grant(ARGO_VIEWER_GROUP);
    groups
}

fn has_runner_grant(doc: &UserAuthorizationDocument) -> bool {
    doc.grants_at(WORKFLOW_RESOURCE_PATH).iter().any(|grant| {
        grant
            .method
            .as_deref()
            .is_some_and(|method| RUNNER_METHODS.contains(&method))
    })
}

fn targets_argo_workflows(resource: &ResourceDescriptor) -> bool {
    resource.group.as_deref() == Some(ARGO_API_GROUP)
        && resource
            .resource
            .as_deref()
            .is_some_and(|kind| ARGO_WORKFLOW_RESOURCES.contains(&kind))
}
