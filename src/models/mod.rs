//! Domain models for the IPList synchronizer.
//!
//! This module contains the core data structures used throughout the application:
//! - [`AddressRange`] - canonical IPv4/IPv6 CIDR range
//! - [`RangeCollection`] - ordered, duplicate-free set of ranges
//! - [`IpList`], [`Href`] and [`ProvisioningOutcome`] - controller resources

mod collection;
mod ip_list;
mod ip_range;

// Re-export public types
pub use collection::RangeCollection;
pub use ip_list::{Href, IpList, ProvisioningOutcome};
pub use ip_range::AddressRange;
