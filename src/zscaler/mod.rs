//! Remote range source: the published Zscaler egress list.
//!
//! - [`source`] - the [`RemoteRangeSource`] contract and the published document format
//! - [`http`] - fetching the list over HTTPS
//! - [`file`] - reading a saved copy of the list from disk

mod file;
mod http;
mod source;

pub use file::FileRangeSource;
pub use http::HttpRangeSource;
pub use source::{parse_published, PublishedRanges, RangeSource, RemoteRangeSource};
