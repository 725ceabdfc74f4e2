//! Reconciliation logic.
//!
//! This module contains the core of the synchronizer:
//! - [`normalize`] - raw strings to canonical ranges
//! - [`diff`] - added/removed/unchanged partition (pure)
//! - [`resolver`] - exact-name IPList lookup
//! - [`reconcile`] - the state machine tying them together

mod diff;
mod normalize;
mod reconcile;
mod resolver;

// Re-export public functions
pub use diff::{diff, DiffResult};
pub use normalize::normalize;
pub use reconcile::{
    Outcome, ReconcileOptions, ReconcileState, ReconciliationResult, Reconciler, EXIT_FAILURE,
    EXIT_OK, EXIT_PARTIAL,
};
pub use resolver::resolve;
