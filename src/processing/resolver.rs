//! IPList lookup by exact name.

use crate::error::SyncError;
use crate::models::IpList;
use crate::pce::PolicyController;

/// Find the IPList called exactly `name` (case-sensitive).
///
/// Returns `Ok(None)` when nothing matches, which is the normal first run.
/// More than one exact match is an [`SyncError::AmbiguousResource`]; we never pick one.
pub async fn resolve<C: PolicyController>(
    controller: &C,
    name: &str,
) -> Result<Option<IpList>, SyncError> {
    let candidates = controller.find_by_name(name).await?;
    let total = candidates.len();
    let mut matches: Vec<IpList> = candidates.into_iter().filter(|l| l.name == name).collect();
    log::debug!(
        "resolve({name}): {total} candidate(s), {} exact match(es)",
        matches.len()
    );

    match matches.len() {
        0 => Ok(None),
        1 => Ok(matches.pop()),
        n => {
            let hrefs: Vec<String> = matches.iter().map(|l| l.href.to_string()).collect();
            Err(SyncError::AmbiguousResource(format!(
                "{n} IPLists named '{name}': {}",
                hrefs.join(", ")
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Href, RangeCollection};
    use crate::test_utils::MockController;

    fn list(href: &str, name: &str) -> IpList {
        IpList {
            href: Href::new(href),
            name: name.to_string(),
            description: None,
            ranges: RangeCollection::new(),
        }
    }

    #[tokio::test]
    async fn test_resolve_none() {
        let pce = MockController::new();
        assert_eq!(resolve(&pce, "Zscaler IPs").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_resolve_single_exact_match() {
        let pce = MockController::with_lists(vec![
            list("/orgs/1/sec_policy/draft/ip_lists/1", "Zscaler IPs"),
            list("/orgs/1/sec_policy/draft/ip_lists/2", "Zscaler IPs old"),
            list("/orgs/1/sec_policy/draft/ip_lists/3", "zscaler ips"),
        ]);
        let found = resolve(&pce, "Zscaler IPs").await.unwrap().unwrap();
        assert_eq!(found.href.as_str(), "/orgs/1/sec_policy/draft/ip_lists/1");
    }

    #[tokio::test]
    async fn test_resolve_is_case_sensitive() {
        let pce = MockController::with_lists(vec![list("/ip_lists/3", "zscaler ips")]);
        assert_eq!(resolve(&pce, "Zscaler IPs").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_resolve_ambiguous() {
        let pce = MockController::with_lists(vec![
            list("/ip_lists/1", "Zscaler IPs"),
            list("/ip_lists/2", "Zscaler IPs"),
        ]);
        let err = resolve(&pce, "Zscaler IPs").await.unwrap_err();
        match err {
            SyncError::AmbiguousResource(msg) => {
                assert!(msg.contains("/ip_lists/1"));
                assert!(msg.contains("/ip_lists/2"));
            }
            other => panic!("expected AmbiguousResource, got {other:?}"),
        }
    }
}
