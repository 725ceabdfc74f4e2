//! Error types for the IPList synchronizer.
//!
//! Every variant is fatal to the current run. [`SyncError::Provision`] is the one
//! exception callers treat differently: it is only raised after a successful write.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SyncError {
    #[error("Malformed range: {0}")]
    MalformedRange(String),

    #[error("Ambiguous resource: {0}")]
    AmbiguousResource(String),

    #[error("Fetch failed: {0}")]
    Fetch(String),

    #[error("Write failed: {0}")]
    Write(String),

    #[error("Provisioning failed: {0}")]
    Provision(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl SyncError {
    /// Stable short name of the error kind, used in log lines and the final report.
    pub fn kind(&self) -> &'static str {
        match self {
            SyncError::MalformedRange(_) => "malformed_range",
            SyncError::AmbiguousResource(_) => "ambiguous_resource",
            SyncError::Fetch(_) => "fetch",
            SyncError::Write(_) => "write",
            SyncError::Provision(_) => "provision",
            SyncError::Config(_) => "config",
        }
    }

    /// True when the IPList was already written before this error happened.
    pub fn is_partial_success(&self) -> bool {
        matches!(self, SyncError::Provision(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_kind_prefix() {
        let err = SyncError::MalformedRange("1.2.3.4/99".to_string());
        assert_eq!(err.to_string(), "Malformed range: 1.2.3.4/99");
        assert_eq!(err.kind(), "malformed_range");
    }

    #[test]
    fn test_only_provision_is_partial_success() {
        assert!(SyncError::Provision("boom".into()).is_partial_success());
        assert!(!SyncError::Write("boom".into()).is_partial_success());
        assert!(!SyncError::Fetch("boom".into()).is_partial_success());
        assert!(!SyncError::AmbiguousResource("x".into()).is_partial_success());
    }
}
