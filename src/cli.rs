use crate::config::{DEFAULT_DESCRIPTION, DEFAULT_TIMEOUT_SECS, ZSCALER_API_URL};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "zscaler-iplist-sync")]
#[command(version)]
#[command(about = "Fetch Zscaler IPs and update an Illumio Core IPList", long_about = None)]
#[command(after_help = "Values may also be set in a .env file in the working directory.")]
pub struct Cli {
    /// Illumio PCE hostname (e.g. pce.company.com)
    #[arg(long, env = "ILLUMIO_PCE_HOST")]
    pub pce_host: String,

    /// Illumio API key
    #[arg(long, env = "ILLUMIO_API_KEY", hide_env_values = true)]
    pub api_key: String,

    /// Illumio API secret
    #[arg(long, env = "ILLUMIO_API_SECRET", hide_env_values = true)]
    pub api_secret: String,

    /// Illumio organization ID (typically 1 for a single-org PCE)
    #[arg(long, env = "ILLUMIO_ORG_ID", default_value_t = 1)]
    pub org_id: u32,

    /// Illumio PCE port
    #[arg(long, env = "ILLUMIO_PORT", default_value_t = 443)]
    pub port: u16,

    /// Name of the Illumio IPList to create or update
    #[arg(long)]
    pub iplist_name: String,

    /// Description set on a newly created IPList
    #[arg(long, default_value = DEFAULT_DESCRIPTION)]
    pub description: String,

    /// URL of the published Zscaler range list
    #[arg(long, default_value = ZSCALER_API_URL)]
    pub source_url: String,

    /// Read the published range list from a local JSON file instead of --source-url
    #[arg(long)]
    pub source_file: Option<PathBuf>,

    /// HTTP timeout in seconds for both the range source and the PCE
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_secs: u64,

    /// Disable SSL certificate verification (not recommended for production)
    #[arg(long)]
    pub no_verify_ssl: bool,

    /// Show what would change without writing or provisioning
    #[arg(long)]
    pub dry_run: bool,

    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}
