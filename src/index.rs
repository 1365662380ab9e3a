//! The in-memory prefix index.
//!
//! Prefixes are stored in 32 buckets keyed by `offset = 32 - prefix_len`,
//! each bucket an ordered set of shifted keys. A lookup probes at most 32
//! sets, one per populated prefix length, so it stays O(length-classes ×
//! log n) without any tree machinery and the whole structure serializes
//! as a flat record stream.

use std::collections::BTreeSet;
use std::net::Ipv4Addr;

use crate::addr::Cidr;

/// A set of IPv4 prefixes supporting insert, remove, membership and
/// covering-prefix lookup.
pub struct PrefixIndex {
    /// Bucket `i` holds the shifted keys of all prefixes with offset `i`
    /// (prefix length `32 - i`). An empty set stands for an absent bucket.
    buckets: [BTreeSet<u32>; 32],
}

impl PrefixIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self {
            buckets: std::array::from_fn(|_| BTreeSet::new()),
        }
    }

    /// Insert a prefix. Idempotent; returns whether the key was newly
    /// inserted. Does not persist.
    pub fn put(&mut self, cidr: Cidr) -> bool {
        self.buckets[cidr.offset() as usize].insert(cidr.shifted_key())
    }

    /// Remove a prefix. Silent no-op when absent; returns whether a key
    /// was removed.
    pub fn del(&mut self, cidr: Cidr) -> bool {
        self.buckets[cidr.offset() as usize].remove(&cidr.shifted_key())
    }

    /// True iff the exact prefix is present.
    pub fn has(&self, cidr: Cidr) -> bool {
        let key = cidr.shifted_key();
        let present = self.buckets[cidr.offset() as usize].contains(&key);
        log::debug!(
            "has: {}/{} [{:032b}] -> {}",
            key,
            cidr.offset(),
            key,
            present
        );
        present
    }

    /// Every stored prefix covering `addr`, most-specific first.
    ///
    /// Results are emitted in ascending bucket-offset order, i.e. from
    /// the largest prefix length down. This ordering is a stable
    /// contract.
    pub fn lookup(&self, addr: Ipv4Addr) -> Vec<Cidr> {
        let bits = u32::from(addr);
        let mut results = Vec::new();

        for (offset, bucket) in self.buckets.iter().enumerate() {
            if bucket.is_empty() {
                continue;
            }

            let key = bits >> offset;
            if bucket.contains(&key) {
                log::debug!("found: {}/{}", key, offset);
                results.push(Cidr::from_shifted(offset as u8, key));
            }
        }

        results
    }

    /// Total number of stored prefixes.
    pub fn len(&self) -> usize {
        self.buckets.iter().map(|b| b.len()).sum()
    }

    /// True iff no prefix is stored.
    pub fn is_empty(&self) -> bool {
        self.buckets.iter().all(|b| b.is_empty())
    }

    /// All `(offset, key)` pairs, ascending by offset then key. This is
    /// the order records are committed in.
    pub(crate) fn entries(&self) -> impl Iterator<Item = (u8, u32)> + '_ {
        self.buckets
            .iter()
            .enumerate()
            .flat_map(|(offset, bucket)| bucket.iter().map(move |&key| (offset as u8, key)))
    }

    /// Insert a raw storage entry. The caller guarantees `offset < 32`.
    pub(crate) fn insert_entry(&mut self, offset: u8, key: u32) {
        debug_assert!(offset < 32);
        self.buckets[offset as usize].insert(key);
    }
}

impl Default for PrefixIndex {
    fn default() -> Self {
        Self::new()
    }
}
