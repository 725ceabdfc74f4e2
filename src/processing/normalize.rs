//! Range normalization.
//!
//! Turns raw range strings into a [`RangeCollection`] of canonical ranges.

use crate::error::SyncError;
use crate::models::{AddressRange, RangeCollection};

/// Normalize a sequence of CIDR or bare-address strings.
///
/// The first malformed entry aborts the whole batch; a partial allow-list is
/// never returned. Duplicates (after normalization) are collapsed, keeping the
/// position of the first occurrence.
pub fn normalize<I, S>(raw: I) -> Result<RangeCollection, SyncError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut collection = RangeCollection::new();
    let mut duplicates = 0usize;
    for entry in raw {
        let range: AddressRange = entry.as_ref().parse()?;
        if !collection.insert(range) {
            duplicates += 1;
        }
    }
    if duplicates > 0 {
        log::debug!("normalize: collapsed {duplicates} duplicate range(s)");
    }
    Ok(collection)
}
