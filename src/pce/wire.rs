//! PCE JSON shapes.
//!
//! Records are mapped into [`crate::models`] types as soon as they are decoded.

use crate::error::SyncError;
use crate::models::{AddressRange, Href, IpList, ProvisioningOutcome, RangeCollection};
use serde::{Deserialize, Serialize};

fn is_false(value: &bool) -> bool {
    !*value
}

/// One `ip_ranges` entry of an IPList.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct IpRangeRecord {
    pub from_ip: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_ip: Option<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub exclusion: bool,
}

impl IpRangeRecord {
    pub fn cidr(range: &AddressRange) -> IpRangeRecord {
        IpRangeRecord {
            from_ip: range.to_string(),
            to_ip: None,
            exclusion: false,
        }
    }
}

/// IPList as returned by `GET .../sec_policy/draft/ip_lists`.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct IpListRecord {
    pub href: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub ip_ranges: Option<Vec<IpRangeRecord>>,
}

impl IpListRecord {
    /// Convert to the domain model.
    ///
    /// Entries that are explicit from/to ranges or exclusions have no CIDR form;
    /// they are skipped with a warning. An unparsable `from_ip` is an error.
    pub fn into_model(self) -> Result<IpList, SyncError> {
        let mut ranges = RangeCollection::new();
        for entry in self.ip_ranges.unwrap_or_default() {
            if entry.exclusion || entry.to_ip.is_some() {
                log::warn!(
                    "IPList {}: skipping non-CIDR entry from_ip={} to_ip={} exclusion={}",
                    self.href,
                    entry.from_ip,
                    entry.to_ip.as_deref().unwrap_or("-"),
                    entry.exclusion
                );
                continue;
            }
            let range: AddressRange = entry.from_ip.parse().map_err(|e| match e {
                SyncError::MalformedRange(m) => {
                    SyncError::MalformedRange(format!("IPList {}: {m}", self.href))
                }
                other => other,
            })?;
            ranges.insert(range);
        }
        Ok(IpList {
            href: Href::new(self.href),
            name: self.name,
            description: self.description.filter(|d| !d.is_empty()),
            ranges,
        })
    }
}

/// Body of `POST .../sec_policy/draft/ip_lists`.
#[derive(Serialize, Debug)]
pub struct CreateIpListRequest<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub ip_ranges: Vec<IpRangeRecord>,
}

/// Body of `PUT {href}`.
#[derive(Serialize, Debug)]
pub struct UpdateIpListRequest<'a> {
    pub description: &'a str,
    pub ip_ranges: Vec<IpRangeRecord>,
}

#[derive(Serialize, Debug)]
pub struct HrefRef<'a> {
    pub href: &'a str,
}

#[derive(Serialize, Debug)]
pub struct ChangeSubset<'a> {
    pub ip_lists: Vec<HrefRef<'a>>,
}

/// Body of `POST .../sec_policy`.
#[derive(Serialize, Debug)]
pub struct ProvisionRequest<'a> {
    pub update_description: String,
    pub change_subset: ChangeSubset<'a>,
}

/// Response of `POST .../sec_policy`.
#[derive(Deserialize, Debug)]
pub struct ProvisionResponse {
    pub version: u64,
    #[serde(default)]
    pub workloads_affected: u64,
}

impl From<ProvisionResponse> for ProvisioningOutcome {
    fn from(response: ProvisionResponse) -> ProvisioningOutcome {
        ProvisioningOutcome {
            version: response.version,
            workloads_affected: response.workloads_affected,
        }
    }
}

pub fn range_records(ranges: &RangeCollection) -> Vec<IpRangeRecord> {
    ranges.iter().map(IpRangeRecord::cidr).collect()
}

/// Convert the records named exactly `name`.
///
/// The PCE `name` query also returns partial matches. Those are dropped before
/// conversion, so a broken entry in an unrelated list cannot fail the lookup.
pub fn exact_matches(records: Vec<IpListRecord>, name: &str) -> Result<Vec<IpList>, SyncError> {
    records
        .into_iter()
        .filter(|record| {
            let keep = record.name == name;
            if !keep {
                log::debug!("ignoring IPList '{}' ({})", record.name, record.href);
            }
            keep
        })
        .map(IpListRecord::into_model)
        .collect()
}
