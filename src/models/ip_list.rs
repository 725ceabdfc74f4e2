//! Controller-side IPList data model.

use super::RangeCollection;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable handle ("href") the controller assigns to a created resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Href(pub String);

impl Href {
    pub fn new(href: impl Into<String>) -> Href {
        Href(href.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Href {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Named allow-list resource on the policy controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IpList {
    /// Handle assigned by the controller at creation.
    pub href: Href,
    /// Exact, case-sensitive name.
    pub name: String,
    /// Optional human description.
    pub description: Option<String>,
    /// Ranges currently stored in the list.
    pub ranges: RangeCollection,
}

impl fmt::Display for IpList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (href: {}, {} ranges)",
            self.name,
            self.href,
            self.ranges.len()
        )
    }
}

/// Result of a provisioning call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvisioningOutcome {
    /// Policy version created by the provisioning call.
    pub version: u64,
    /// Number of workloads the change reached.
    pub workloads_affected: u64,
}
