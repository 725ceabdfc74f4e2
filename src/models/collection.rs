//! Ordered, duplicate-free collection of address ranges.

use super::AddressRange;
use std::collections::HashSet;
use std::fmt;

/// A set of [`AddressRange`]s that remembers insertion order.
///
/// Membership and equality ignore order; iteration and display follow it.
#[derive(Debug, Clone, Default)]
pub struct RangeCollection {
    ranges: Vec<AddressRange>,
    index: HashSet<AddressRange>,
}

impl RangeCollection {
    pub fn new() -> RangeCollection {
        RangeCollection::default()
    }

    /// Add a range. Returns false (and keeps the first position) if it was already present.
    pub fn insert(&mut self, range: AddressRange) -> bool {
        if self.index.insert(range) {
            self.ranges.push(range);
            true
        } else {
            false
        }
    }

    pub fn contains(&self, range: &AddressRange) -> bool {
        self.index.contains(range)
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AddressRange> {
        self.ranges.iter()
    }

    /// Canonical CIDR strings in insertion order.
    pub fn to_strings(&self) -> Vec<String> {
        self.ranges.iter().map(|r| r.to_string()).collect()
    }

    pub fn is_disjoint(&self, other: &RangeCollection) -> bool {
        self.iter().all(|r| !other.contains(r))
    }
}

impl PartialEq for RangeCollection {
    fn eq(&self, other: &RangeCollection) -> bool {
        self.index == other.index
    }
}

impl Eq for RangeCollection {}

impl FromIterator<AddressRange> for RangeCollection {
    fn from_iter<I: IntoIterator<Item = AddressRange>>(iter: I) -> Self {
        let mut collection = RangeCollection::new();
        for range in iter {
            collection.insert(range);
        }
        collection
    }
}

impl<'a> IntoIterator for &'a RangeCollection {
    type Item = &'a AddressRange;
    type IntoIter = std::slice::Iter<'a, AddressRange>;

    fn into_iter(self) -> Self::IntoIter {
        self.ranges.iter()
    }
}

impl fmt::Display for RangeCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.to_strings().join(", "))
    }
}
