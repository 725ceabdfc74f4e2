//! Reconciler: fetch → normalize → resolve → diff → write → provision.
//!
//! The decision logic lives in the pure [`diff`]; this module only sequences the
//! effectful calls around it. Each call to [`Reconciler::reconcile`] is a complete,
//! independent run; nothing but the failure state survives between runs.

use super::diff::{diff, DiffResult};
use super::normalize::normalize;
use super::resolver::resolve;
use crate::error::SyncError;
use crate::models::{Href, ProvisioningOutcome};
use crate::output;
use crate::pce::PolicyController;
use crate::zscaler::RemoteRangeSource;
use colored::Colorize;
use std::collections::HashSet;
use std::fmt;

/// Process exit code for up-to-date, dry-run and fully updated runs.
pub const EXIT_OK: u8 = 0;
/// Process exit code for any fatal failure.
pub const EXIT_FAILURE: u8 = 1;
/// Process exit code when the IPList was written but provisioning failed.
pub const EXIT_PARTIAL: u8 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileState {
    Idle,
    Fetching,
    Resolving,
    Diffing,
    UpToDate,
    Writing,
    Provisioning,
    Done,
    /// Absorbing: a failed reconciler never runs again.
    Failed,
}

impl fmt::Display for ReconcileState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ReconcileState::Idle => "IDLE",
            ReconcileState::Fetching => "FETCHING",
            ReconcileState::Resolving => "RESOLVING",
            ReconcileState::Diffing => "DIFFING",
            ReconcileState::UpToDate => "UP_TO_DATE",
            ReconcileState::Writing => "WRITING",
            ReconcileState::Provisioning => "PROVISIONING",
            ReconcileState::Done => "DONE",
            ReconcileState::Failed => "FAILED",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    UpToDate,
    Updated,
    UpdatedNotProvisioned,
    DryRun,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconciliationResult {
    /// A create or update call succeeded.
    pub updated: bool,
    /// The list had no ranges before this run (absent or empty).
    pub is_new: bool,
    /// Nothing was written because of dry-run mode.
    pub dry_run: bool,
    /// Handle of the list after the run; `None` when a dry run would have created it.
    pub href: Option<Href>,
    pub diff: DiffResult,
    pub diff_summary: String,
    pub provisioning_outcome: Option<ProvisioningOutcome>,
    /// Set when the write succeeded but provisioning did not.
    pub provision_error: Option<SyncError>,
}

impl ReconciliationResult {
    pub fn outcome(&self) -> Outcome {
        if self.updated {
            if self.provision_error.is_some() {
                Outcome::UpdatedNotProvisioned
            } else {
                Outcome::Updated
            }
        } else if self.dry_run && self.diff.has_changes() {
            Outcome::DryRun
        } else {
            Outcome::UpToDate
        }
    }

    pub fn exit_code(&self) -> u8 {
        match self.outcome() {
            Outcome::UpdatedNotProvisioned => EXIT_PARTIAL,
            Outcome::UpToDate | Outcome::Updated | Outcome::DryRun => EXIT_OK,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ReconcileOptions {
    /// Description used when the IPList has to be created.
    pub description: String,
    /// Stop after diffing; never write or provision.
    pub dry_run: bool,
}

pub struct Reconciler<'a, S, C> {
    source: &'a S,
    controller: &'a C,
    options: ReconcileOptions,
    state: ReconcileState,
    failure: Option<SyncError>,
}

impl<'a, S: RemoteRangeSource, C: PolicyController> Reconciler<'a, S, C> {
    pub fn new(source: &'a S, controller: &'a C, options: ReconcileOptions) -> Self {
        Reconciler {
            source,
            controller,
            options,
            state: ReconcileState::Idle,
            failure: None,
        }
    }

    pub fn state(&self) -> ReconcileState {
        self.state
    }

    /// The error that moved this reconciler to [`ReconcileState::Failed`].
    pub fn failure(&self) -> Option<&SyncError> {
        self.failure.as_ref()
    }

    /// Bring the IPList called `list_name` in line with the remote source.
    pub async fn reconcile(&mut self, list_name: &str) -> Result<ReconciliationResult, SyncError> {
        if let Some(err) = &self.failure {
            return Err(err.clone());
        }
        match self.run(list_name).await {
            Ok(result) => Ok(result),
            Err(err) => {
                log::error!(
                    "{} in {}: [{}] {err}",
                    "FAILED".on_red(),
                    self.state,
                    err.kind()
                );
                self.transition(ReconcileState::Failed);
                self.failure = Some(err.clone());
                Err(err)
            }
        }
    }

    fn transition(&mut self, next: ReconcileState) {
        log::debug!("reconcile state {} -> {}", self.state, next);
        self.state = next;
    }

    async fn run(&mut self, list_name: &str) -> Result<ReconciliationResult, SyncError> {
        self.transition(ReconcileState::Fetching);
        let raw = self.source.fetch().await?;
        let new = normalize(&raw)?;
        if new.is_empty() {
            return Err(SyncError::Fetch(
                "remote source returned no ranges; refusing to empty the IPList".into(),
            ));
        }
        log::info!(
            "Fetched {} (from {} entries)",
            output::ranges_label(new.len()),
            raw.len()
        );

        self.transition(ReconcileState::Resolving);
        let existing = resolve(self.controller, list_name).await?;
        match &existing {
            Some(list) => log::info!("Found existing IPList (href: {})", list.href),
            None => log::info!("IPList '{list_name}' not found, it will be created"),
        }
        let old = existing
            .as_ref()
            .map(|list| list.ranges.clone())
            .unwrap_or_default();

        self.transition(ReconcileState::Diffing);
        let diff = diff(&old, &new);
        let diff_summary = output::format(&diff);
        let mut result = ReconciliationResult {
            updated: false,
            is_new: diff.is_new,
            dry_run: self.options.dry_run,
            href: existing.as_ref().map(|list| list.href.clone()),
            diff,
            diff_summary,
            provisioning_outcome: None,
            provision_error: None,
        };

        if !result.diff.has_changes() {
            log::info!("IPList '{list_name}' is up to date, nothing to write");
            self.transition(ReconcileState::UpToDate);
            return Ok(result);
        }
        if self.options.dry_run {
            log::info!("Dry run: skipping write and provisioning of '{list_name}'");
            self.transition(ReconcileState::Done);
            return Ok(result);
        }

        self.transition(ReconcileState::Writing);
        // Always the full new collection; the controller replaces list contents wholesale
        let written = match &existing {
            Some(list) => self.controller.update(&list.href, &new).await?,
            None => {
                self.controller
                    .create(list_name, &new, &self.options.description)
                    .await?
            }
        };
        result.updated = true;
        result.href = Some(written.href.clone());

        self.transition(ReconcileState::Provisioning);
        let scope = HashSet::from([written.href.clone()]);
        match self.controller.provision(&scope).await {
            Ok(outcome) => result.provisioning_outcome = Some(outcome),
            Err(err) => {
                log::error!(
                    "IPList {} was written but provisioning failed: {err}",
                    written.href
                );
                result.provision_error = Some(err);
            }
        }

        self.transition(ReconcileState::Done);
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::IpList;
    use crate::processing::normalize;
    use crate::test_utils::{ControllerCall, MockController, MockSource};

    fn options() -> ReconcileOptions {
        ReconcileOptions {
            description: "auto".into(),
            dry_run: false,
        }
    }

    fn existing(href: &str, name: &str, ranges: &[&str]) -> IpList {
        IpList {
            href: Href::new(href),
            name: name.into(),
            description: None,
            ranges: normalize(ranges.iter().copied()).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_state_after_up_to_date() {
        let source = MockSource::new(&["10.0.0.0/8"]);
        let pce = MockController::with_lists(vec![existing("/l/1", "L", &["10.0.0.0/8"])]);
        let mut reconciler = Reconciler::new(&source, &pce, options());
        assert_eq!(reconciler.state(), ReconcileState::Idle);
        let result = reconciler.reconcile("L").await.unwrap();
        assert_eq!(reconciler.state(), ReconcileState::UpToDate);
        assert_eq!(result.outcome(), Outcome::UpToDate);
        assert_eq!(result.exit_code(), EXIT_OK);
    }

    #[tokio::test]
    async fn test_failed_state_is_absorbing() {
        let source = MockSource::failing(SyncError::Fetch("connection refused".into()));
        let pce = MockController::new();
        let mut reconciler = Reconciler::new(&source, &pce, options());

        let err = reconciler.reconcile("L").await.unwrap_err();
        assert_eq!(err, SyncError::Fetch("connection refused".into()));
        assert_eq!(reconciler.state(), ReconcileState::Failed);

        let again = reconciler.reconcile("L").await.unwrap_err();
        assert_eq!(again, err);
        assert_eq!(source.fetch_count(), 1);
        assert!(pce.calls().is_empty());
    }

    #[tokio::test]
    async fn test_empty_remote_list_is_fetch_error() {
        let source = MockSource::new(&[]);
        let pce = MockController::with_lists(vec![existing("/l/1", "L", &["10.0.0.0/8"])]);
        let mut reconciler = Reconciler::new(&source, &pce, options());
        let err = reconciler.reconcile("L").await.unwrap_err();
        assert!(matches!(err, SyncError::Fetch(_)));
        assert!(pce.calls().is_empty());
    }

    #[tokio::test]
    async fn test_dry_run_never_writes() {
        let source = MockSource::new(&["10.0.0.0/8", "192.0.2.0/24"]);
        let pce = MockController::with_lists(vec![existing("/l/1", "L", &["10.0.0.0/8"])]);
        let mut reconciler = Reconciler::new(
            &source,
            &pce,
            ReconcileOptions {
                description: "auto".into(),
                dry_run: true,
            },
        );
        let result = reconciler.reconcile("L").await.unwrap();
        assert!(!result.updated);
        assert_eq!(result.outcome(), Outcome::DryRun);
        assert_eq!(result.diff.added.to_strings(), vec!["192.0.2.0/24"]);
        assert_eq!(pce.calls(), vec![ControllerCall::Find("L".into())]);
    }

    #[tokio::test]
    async fn test_write_error_is_fatal_without_provisioning() {
        let source = MockSource::new(&["10.0.0.0/8"]);
        let pce = MockController::new().fail_writes("HTTP 500");
        let mut reconciler = Reconciler::new(&source, &pce, options());
        let err = reconciler.reconcile("L").await.unwrap_err();
        assert!(matches!(err, SyncError::Write(_)));
        assert_eq!(reconciler.state(), ReconcileState::Failed);
        assert!(!pce
            .calls()
            .iter()
            .any(|c| matches!(c, ControllerCall::Provision(_))));
    }

    #[test]
    fn test_state_display() {
        assert_eq!(ReconcileState::UpToDate.to_string(), "UP_TO_DATE");
        assert_eq!(ReconcileState::Failed.to_string(), "FAILED");
    }
}
