// cargo watch -x 'fmt' -x 'run -- --iplist-name "Zscaler IPs" --dry-run'

//! Keep an Illumio Core IPList in sync with the published Zscaler egress ranges.
//!
//! Each run fetches the remote list, diffs it against the IPList and only
//! writes (and then provisions) when something actually changed.

pub mod cli;
pub mod config;
pub mod error;
mod json;
pub mod logging;
pub mod models;
pub mod output;
pub mod pce;
pub mod processing;
pub mod zscaler;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

use cli::Cli;
use config::Config;
use error::SyncError;
use pce::PceClient;
use processing::{ReconcileOptions, ReconciliationResult, Reconciler};
use zscaler::RangeSource;

/// Build the collaborators from `cli` and run one reconciliation.
pub async fn run(cli: &Cli) -> Result<ReconciliationResult, SyncError> {
    let config = Config::from_cli(cli)?;
    log::debug!("config={:?}", config);

    let source = RangeSource::from_config(&config.source)?;
    let pce = PceClient::new(&config.pce, &config.description)?;
    let options = ReconcileOptions {
        description: config.description.clone(),
        dry_run: config.dry_run,
    };

    let mut reconciler = Reconciler::new(&source, &pce, options);
    reconciler.reconcile(&config.iplist_name).await
}
