//! Runtime configuration.
//!
//! A [`Config`] is built once from the command line at process start and passed
//! by reference to the collaborators that need it.

use crate::cli::Cli;
use crate::error::SyncError;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Published Zscaler egress ranges (JSON object with a `prefixes` array).
pub const ZSCALER_API_URL: &str = "https://config.zscaler.com/api/zscaler.net/future/json";
pub const DEFAULT_DESCRIPTION: &str = "Zscaler IP ranges - Auto-updated";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
/// log4rs config file picked up from the working directory when present.
pub const LOG4RS_FILE: &str = "log4rs.yml";

/// Connection settings for the Illumio PCE.
#[derive(Clone)]
pub struct PceConfig {
    pub host: String,
    pub port: u16,
    pub org_id: u32,
    pub api_key: String,
    pub api_secret: String,
    pub verify_tls: bool,
    pub timeout: Duration,
}

impl PceConfig {
    /// REST API v2 root, e.g. `https://pce.company.com:443/api/v2`.
    pub fn base_url(&self) -> String {
        format!("https://{}:{}/api/v2", self.host, self.port)
    }
}

impl fmt::Debug for PceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PceConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("org_id", &self.org_id)
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .field("verify_tls", &self.verify_tls)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Where the remote ranges come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceConfig {
    Http { url: String, timeout: Duration },
    File(PathBuf),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub pce: PceConfig,
    pub source: SourceConfig,
    pub iplist_name: String,
    pub description: String,
    pub dry_run: bool,
}

impl Config {
    /// Build and validate the configuration from parsed arguments.
    pub fn from_cli(cli: &Cli) -> Result<Config, SyncError> {
        let host = normalize_host(&cli.pce_host);
        if host.is_empty() {
            return Err(SyncError::Config(
                "--pce-host or ILLUMIO_PCE_HOST environment variable is required".into(),
            ));
        }
        if cli.api_key.trim().is_empty() {
            return Err(SyncError::Config(
                "--api-key or ILLUMIO_API_KEY environment variable is required".into(),
            ));
        }
        if cli.api_secret.trim().is_empty() {
            return Err(SyncError::Config(
                "--api-secret or ILLUMIO_API_SECRET environment variable is required".into(),
            ));
        }
        if cli.port == 0 {
            return Err(SyncError::Config("PCE port must be non-zero".into()));
        }
        if cli.iplist_name.trim().is_empty() {
            return Err(SyncError::Config("--iplist-name must not be empty".into()));
        }
        if cli.timeout_secs == 0 {
            return Err(SyncError::Config("--timeout-secs must be non-zero".into()));
        }

        let timeout = Duration::from_secs(cli.timeout_secs);
        let source = match &cli.source_file {
            Some(path) => SourceConfig::File(path.clone()),
            None => SourceConfig::Http {
                url: cli.source_url.clone(),
                timeout,
            },
        };

        Ok(Config {
            pce: PceConfig {
                host,
                port: cli.port,
                org_id: cli.org_id,
                api_key: cli.api_key.trim().to_string(),
                api_secret: cli.api_secret.trim().to_string(),
                verify_tls: !cli.no_verify_ssl,
                timeout,
            },
            source,
            iplist_name: cli.iplist_name.clone(),
            description: cli.description.clone(),
            dry_run: cli.dry_run,
        })
    }
}

/// Accept `pce.company.com`, `https://pce.company.com/` and the like.
fn normalize_host(raw: &str) -> String {
    let host = raw.trim();
    let host = host
        .strip_prefix("https://")
        .or_else(|| host.strip_prefix("http://"))
        .unwrap_or(host);
    host.trim_end_matches('/').to_string()
}
