use super::{FileRangeSource, HttpRangeSource};
use crate::config::SourceConfig;
use crate::error::SyncError;
use crate::json;
use serde::Deserialize;

/// Supplies the raw range strings to reconcile against.
///
/// Any transport or parse failure surfaces as [`SyncError::Fetch`].
#[allow(async_fn_in_trait)]
pub trait RemoteRangeSource {
    async fn fetch(&self) -> Result<Vec<String>, SyncError>;
}

/// Published document shape. Only `prefixes` is read; other keys are ignored.
#[derive(Deserialize, Debug)]
pub struct PublishedRanges {
    pub prefixes: Vec<String>,
}

/// Decode a published range document.
pub fn parse_published(body: &str, origin: &str) -> Result<Vec<String>, SyncError> {
    let doc: PublishedRanges = json::decode(body, &format!("range list from {origin}"))
        .map_err(SyncError::Fetch)?;
    Ok(doc.prefixes)
}

/// The source selected by configuration.
pub enum RangeSource {
    Http(HttpRangeSource),
    File(FileRangeSource),
}

impl RangeSource {
    pub fn from_config(config: &SourceConfig) -> Result<RangeSource, SyncError> {
        match config {
            SourceConfig::Http { url, timeout } => {
                Ok(RangeSource::Http(HttpRangeSource::new(url, *timeout)?))
            }
            SourceConfig::File(path) => Ok(RangeSource::File(FileRangeSource::new(path))),
        }
    }
}

impl RemoteRangeSource for RangeSource {
    async fn fetch(&self) -> Result<Vec<String>, SyncError> {
        match self {
            RangeSource::Http(source) => source.fetch().await,
            RangeSource::File(source) => source.fetch().await,
        }
    }
}
