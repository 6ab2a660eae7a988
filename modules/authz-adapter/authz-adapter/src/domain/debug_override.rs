//! Debug identity override for local and staging testing.
//!
//! The override is off unless `debug_email` is configured. While it is on,
//! the `debug_email` / `debug_groups` query parameters may replace the
//! configured values; while it is off they are ignored entirely.

use authz_adapter_sdk::GroupDecision;

/// Process-wide override settings, normalized at startup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DebugSettings {
    email: Option<String>,
    groups: Option<String>,
}

impl DebugSettings {
    #[must_use]
    pub fn new(email: Option<&str>, groups: Option<&str>) -> Self {
        Self {
            email: non_empty(email).map(str::to_owned),
            groups: non_empty(groups).map(str::to_owned),
        }
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.email.is_some()
    }

    /// Resolve the override for one request.
    ///
    /// Returns `None` when the switch is off or when no groups result, in
    /// which case the request goes through the normal fetch.
    #[must_use]
    pub fn resolve(
        &self,
        query_email: Option<&str>,
        query_groups: Option<&str>,
    ) -> Option<DebugOverride> {
        let configured_email = self.email.as_deref()?;
        let email = non_empty(query_email).unwrap_or(configured_email);
        let groups = parse_groups(non_empty(query_groups).or(self.groups.as_deref())?);
        if groups.is_empty() {
            return None;
        }

        Some(DebugOverride {
            email: email.to_owned(),
            groups,
        })
    }
}

/// Identity and groups synthesized without contacting the identity service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DebugOverride {
    pub email: String,
    pub groups: GroupDecision,
}

/// Split a comma-separated group list, dropping blanks.
#[must_use]
pub fn parse_groups(raw: &str) -> GroupDecision {
    raw.split(',')
        .map(str::trim)
        .filter(|g| !g.is_empty())
        .collect()
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
