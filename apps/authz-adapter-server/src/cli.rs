use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// nginx `auth_request` backend mapping identity-service grants to Argo groups.
#[derive(Debug, Parser)]
#[command(name = "authz-adapter-server", version, about)]
pub struct Cli {
    /// YAML configuration file. Environment variables override its values.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Listen address, overriding `BIND_ADDR` and the configuration file.
    #[arg(long, value_name = "ADDR")]
    pub bind: Option<SocketAddr>,

    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}
