//! Layered process configuration.
//!
//! Precedence, lowest first: built-in defaults, the optional YAML file, the
//! environment, then command-line overrides.

use std::net::SocketAddr;
use std::path::Path;

use anyhow::Context;
use authz_adapter::AuthzAdapterConfig;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::value::{Uncased, UncasedStr};
use serde::{Deserialize, Serialize};

use crate::cli::Cli;

/// Environment variables read at startup. Anything else is ignored.
const ENV_KEYS: [&str; 6] = [
    "FENCE_BASE",
    "HTTP_TIMEOUT",
    "FENCE_SERVICE_TOKEN",
    "DEBUG_EMAIL",
    "DEBUG_GROUPS",
    "BIND_ADDR",
];

const BIND_ADDR_ENV: &str = "BIND_ADDR";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub server: ServerConfig,
    pub authz_adapter: AuthzAdapterConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
        }
    }
}

impl Settings {
    /// Defaults, then `config_path` if given, then the environment.
    #[must_use]
    pub fn figment(config_path: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(path) = config_path {
            figment = figment.merge(Yaml::file_exact(path));
        }
        figment.merge(Env::raw().only(&ENV_KEYS).map(env_key_path))
    }

    /// Load and validate the settings for `cli`.
    ///
    /// # Errors
    /// Fails if a source cannot be read or parsed, or if the resulting
    /// adapter configuration is invalid.
    pub fn load(cli: &Cli) -> anyhow::Result<Self> {
        Self::from_figment(&Self::figment(cli.config.as_deref()), cli.bind)
    }

    /// # Errors
    /// See [`Settings::load`].
    pub fn from_figment(figment: &Figment, bind: Option<SocketAddr>) -> anyhow::Result<Self> {
        let mut settings: Self = figment
            .extract()
            .context("failed to load configuration")?;

        if let Some(bind) = bind {
            settings.server.bind_addr = bind;
        }

        settings.authz_adapter.validate()?;
        Ok(settings)
    }
}

/// `BIND_ADDR` belongs to the server section; every other variable is an
/// adapter key of the same name in lower case.
fn env_key_path(key: &UncasedStr) -> Uncased<'_> {
    if key.as_str().eq_ignore_ascii_case(BIND_ADDR_ENV) {
        Uncased::from("server.bind_addr")
    } else {
        Uncased::from(format!(
            "authz_adapter.{}",
            key.as_str().to_ascii_lowercase()
        ))
    }
}
