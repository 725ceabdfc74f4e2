//! Range set comparison.
//!
//! [`diff`] is a pure function: no I/O, deterministic output order.

use crate::models::RangeCollection;

/// Partition of an old and a new [`RangeCollection`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffResult {
    /// In `new` but not in `old`, in `new` order.
    pub added: RangeCollection,
    /// In `old` but not in `new`, in `old` order.
    pub removed: RangeCollection,
    /// In both, in `new` order.
    pub unchanged: RangeCollection,
    /// True when `old` was empty (list absent or freshly created).
    pub is_new: bool,
}

impl DiffResult {
    pub fn has_changes(&self) -> bool {
        !self.added.is_empty() || !self.removed.is_empty()
    }

    /// Size of the new collection.
    pub fn new_len(&self) -> usize {
        self.added.len() + self.unchanged.len()
    }

    /// Size of the old collection.
    pub fn old_len(&self) -> usize {
        self.removed.len() + self.unchanged.len()
    }
}

/// Compare `old` against `new` by canonical form.
pub fn diff(old: &RangeCollection, new: &RangeCollection) -> DiffResult {
    let mut added = RangeCollection::new();
    let mut unchanged = RangeCollection::new();
    for range in new {
        if old.contains(range) {
            unchanged.insert(*range);
        } else {
            added.insert(*range);
        }
    }
    let removed = old.iter().filter(|r| !new.contains(r)).copied().collect();

    DiffResult {
        added,
        removed,
        unchanged,
        is_new: old.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::normalize;

    fn coll(items: &[&str]) -> RangeCollection {
        normalize(items.iter().copied()).unwrap()
    }

    /// Check the partition invariants between `old`, `new` and their diff.
    fn assert_partition(old: &RangeCollection, new: &RangeCollection, d: &DiffResult) {
        assert!(d.added.is_disjoint(&d.removed));
        let added_unchanged: RangeCollection =
            d.added.iter().chain(d.unchanged.iter()).copied().collect();
        assert_eq!(&added_unchanged, new);
        let removed_unchanged: RangeCollection =
            d.removed.iter().chain(d.unchanged.iter()).copied().collect();
        assert_eq!(&removed_unchanged, old);
        assert_eq!(d.new_len(), new.len());
        assert_eq!(d.old_len(), old.len());
    }

    #[test]
    fn test_diff_identical() {
        let x = coll(&["1.2.3.0/24", "10.0.0.0/8", "2001:db8::/32"]);
        let d = diff(&x, &x);
        assert!(d.added.is_empty());
        assert!(d.removed.is_empty());
        assert_eq!(d.unchanged, x);
        assert!(!d.has_changes());
        assert!(!d.is_new);
    }

    #[test]
    fn test_diff_from_empty() {
        let x = coll(&["2001:db8::/32", "1.2.3.0/24"]);
        let d = diff(&RangeCollection::new(), &x);
        assert_eq!(d.added, x);
        assert_eq!(d.added.to_strings(), x.to_strings());
        assert!(d.is_new);
        assert!(d.has_changes());
    }

    #[test]
    fn test_diff_both_empty() {
        let d = diff(&RangeCollection::new(), &RangeCollection::new());
        assert!(d.is_new);
        assert!(!d.has_changes());
    }

    #[test]
    fn test_diff_ordering_follows_inputs() {
        let old = coll(&["9.9.9.0/24", "1.2.3.0/24", "8.8.8.0/24"]);
        let new = coll(&["203.0.113.0/24", "8.8.8.0/24", "198.51.100.0/24", "1.2.3.0/24"]);
        let d = diff(&old, &new);
        assert_eq!(d.added.to_strings(), vec!["203.0.113.0/24", "198.51.100.0/24"]);
        assert_eq!(d.unchanged.to_strings(), vec!["8.8.8.0/24", "1.2.3.0/24"]);
        assert_eq!(d.removed.to_strings(), vec!["9.9.9.0/24"]);
        assert_partition(&old, &new, &d);
    }

    #[test]
    fn test_diff_partition_invariants_generated() {
        // Deterministic pseudo-random membership over a fixed pool
        let pool: Vec<String> = (0..64u32)
            .map(|i| {
                if i % 5 == 0 {
                    format!("2001:db8:{:x}::/48", i)
                } else {
                    format!("10.{}.{}.0/24", i / 8, i % 8)
                }
            })
            .collect();
        let mut seed: u64 = 0x5eed_1234;
        let mut next = || {
            seed ^= seed << 13;
            seed ^= seed >> 7;
            seed ^= seed << 17;
            seed
        };
        for _ in 0..50 {
            let old: RangeCollection = normalize(pool.iter().filter(|_| next() % 3 == 0)).unwrap();
            let new: RangeCollection = normalize(pool.iter().filter(|_| next() % 2 == 0)).unwrap();
            let d = diff(&old, &new);
            assert_partition(&old, &new, &d);
            assert_eq!(d.is_new, old.is_empty());
            assert_eq!(d.has_changes(), old != new);
        }
    }

    #[test]
    fn test_diff_family_mismatch_is_change() {
        let old = coll(&["0.0.0.0/0"]);
        let new = coll(&["::/0"]);
        let d = diff(&old, &new);
        assert_eq!(d.added.len(), 1);
        assert_eq!(d.removed.len(), 1);
        assert!(d.unchanged.is_empty());
    }
}
