// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! The ordered key index.
//!
//! The backing item store is a plain hash map with no ordering of its own;
//! this flat sorted sequence is the sole mechanism behind prefix and range
//! queries. Insert and remove splice the sequence in place, so it is sorted
//! at all times and never needs a full re-sort.

/// A sorted sequence of the live keys in one hot-storage instance.
///
/// Invariant: the sequence is sorted by lexicographic string comparison and
/// contains exactly the key set of the item map — no duplicates, no stale
/// entries. Callers mutate the index and the item map under one exclusive
/// lock acquisition to keep the two in agreement.
#[derive(Debug, Clone, Default)]
pub struct KeyIndex {
    keys: Vec<String>,
}

impl KeyIndex {
    /// Creates an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty index with room for `capacity` keys.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            keys: Vec::with_capacity(capacity),
        }
    }

    /// Splices `key` into its sorted position. No-op when already present.
    pub fn insert(&mut self, key: &str) {
        if let Err(position) = self.keys.binary_search_by(|existing| existing.as_str().cmp(key)) {
            self.keys.insert(position, key.to_owned());
        }
    }

    /// Drops `key` from the sequence. No-op when absent.
    pub fn remove(&mut self, key: &str) {
        if let Ok(position) = self.keys.binary_search_by(|existing| existing.as_str().cmp(key)) {
            self.keys.remove(position);
        }
    }

    /// Returns `true` when `key` is indexed.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.keys
            .binary_search_by(|existing| existing.as_str().cmp(key))
            .is_ok()
    }

    /// Returns the keys matching `pattern`, in sorted order.
    ///
    /// `"*"` returns the entire index; a trailing `*` matches by literal
    /// prefix; a pattern without a wildcard is an exact-match probe.
    #[must_use]
    pub fn matching(&self, pattern: &str) -> Vec<String> {
        if pattern == "*" {
            return self.keys.clone();
        }
        match pattern.strip_suffix('*') {
            Some(prefix) => {
                let start = self.keys.partition_point(|k| k.as_str() < prefix);
                self.keys[start..]
                    .iter()
                    .take_while(|k| k.starts_with(prefix))
                    .cloned()
                    .collect()
            }
            None if self.contains(pattern) => vec![pattern.to_owned()],
            None => Vec::new(),
        }
    }

    /// Returns every key `k` with `from <= k <= to`, in sorted order.
    ///
    /// Bounds are inclusive and compared lexicographically; semantic numeric
    /// ranges only behave as expected for fixed-width zero-padded keys.
    #[must_use]
    pub fn range(&self, from: &str, to: &str) -> Vec<String> {
        let start = self.keys.partition_point(|k| k.as_str() < from);
        let end = self.keys.partition_point(|k| k.as_str() <= to);
        if start >= end {
            return Vec::new();
        }
        self.keys[start..end].to_vec()
    }

    /// Number of indexed keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns `true` when no key is indexed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
