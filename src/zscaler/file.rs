use super::source::{parse_published, RemoteRangeSource};
use crate::error::SyncError;
use std::path::{Path, PathBuf};

/// Reads a saved copy of the published range list.
pub struct FileRangeSource {
    path: PathBuf,
}

impl FileRangeSource {
    pub fn new(path: &Path) -> FileRangeSource {
        FileRangeSource {
            path: path.to_path_buf(),
        }
    }
}

impl RemoteRangeSource for FileRangeSource {
    async fn fetch(&self) -> Result<Vec<String>, SyncError> {
        let origin = self.path.display().to_string();
        log::info!("Reading IP addresses from file: {origin}");
        let body = std::fs::read_to_string(&self.path)
            .map_err(|e| SyncError::Fetch(format!("Error reading {origin}: {e}")))?;
        let prefixes = parse_published(&body, &origin)?;
        log::info!("Read {} IP ranges from {origin}", prefixes.len());
        Ok(prefixes)
    }
}
