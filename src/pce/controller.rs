use crate::error::SyncError;
use crate::models::{Href, IpList, ProvisioningOutcome, RangeCollection};
use std::collections::HashSet;

/// Operations the reconciler needs from the policy controller.
///
/// Authentication is expected to be set up when the implementation is built.
#[allow(async_fn_in_trait)]
pub trait PolicyController {
    /// Every IPList the controller returns for a name query. This may include
    /// partial matches; exact matching is done by the caller.
    async fn find_by_name(&self, name: &str) -> Result<Vec<IpList>, SyncError>;

    /// Create a new IPList holding `ranges`.
    async fn create(
        &self,
        name: &str,
        ranges: &RangeCollection,
        description: &str,
    ) -> Result<IpList, SyncError>;

    /// Replace the full range contents of an existing IPList. The href is kept.
    async fn update(&self, href: &Href, ranges: &RangeCollection) -> Result<IpList, SyncError>;

    /// Make the draft changes of exactly these resources live.
    async fn provision(&self, hrefs: &HashSet<Href>) -> Result<ProvisioningOutcome, SyncError>;
}
