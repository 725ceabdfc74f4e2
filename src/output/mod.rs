//! Output formatting for reconciliation results.
//!
//! This module handles formatting and outputting results:
//! - [`report`] - diff summaries and the final status lines
//! - [`terminal`] - terminal helpers with colors

mod report;
mod terminal;

pub use report::{format, print_result, MAX_LISTED};
pub use terminal::ranges_label;
