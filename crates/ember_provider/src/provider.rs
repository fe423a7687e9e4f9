// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! The contract between the cache engine and a hot-storage tier.
//!
//! [`Provider`] defines the interface that all hot-storage backends must
//! implement. The engine layers expiry evaluation, read-through, write-back,
//! and background reconciliation on top of these primitives.

use crate::{ItemOptions, Result, WriteOptions};

/// Trait for hot-storage tier implementations.
///
/// A provider owns an item map and the ordered key index over it. Any
/// backing implementation (an in-process map, a remote cache) is acceptable
/// as long as it honors read-after-write visibility within the process and
/// the not-found signaling contract:
///
/// - [`get`](Provider::get) must fail with [`Error::NotFound`] for an absent
///   key so the engine can distinguish a miss from a backend failure.
/// - [`keys`](Provider::keys) and [`key_range`](Provider::key_range) must
///   return keys in sorted (lexicographic) order and must never report a key
///   whose item is not readable.
/// - Index and item-map mutation must be atomic with respect to concurrent
///   operations on the same instance: no observer may see an index entry
///   without its item or vice versa.
///
/// The provider stores and reports expiry policy; it never evaluates it.
///
/// [`Error::NotFound`]: crate::Error::NotFound
pub trait Provider<V>: Send + Sync {
    /// Stores `value` under `key`, deriving fresh [`ItemOptions`] from
    /// `opts` and inserting the key into the ordered index (a no-op if the
    /// key is already indexed).
    fn set(&self, key: &str, value: V, opts: &WriteOptions) -> impl Future<Output = Result<()>> + Send;

    /// Returns the stored value and its metadata.
    ///
    /// The metadata comes back so the engine can evaluate expiry and
    /// extension policy itself.
    fn get(&self, key: &str) -> impl Future<Output = Result<(V, ItemOptions)>> + Send;

    /// Removes the item and its index entry. Deleting an absent key is not
    /// an error.
    fn delete(&self, key: &str) -> impl Future<Output = Result<()>> + Send;

    /// Returns the keys matching `pattern`, in sorted order.
    ///
    /// `"*"` matches every key, a trailing `*` matches by literal prefix,
    /// and a pattern without a wildcard is an exact-match probe.
    fn keys(&self, pattern: &str) -> impl Future<Output = Result<Vec<String>>> + Send;

    /// Returns every key `k` with `from <= k <= to` under lexicographic
    /// comparison, in sorted order. Both bounds are inclusive.
    fn key_range(&self, from: &str, to: &str) -> impl Future<Output = Result<Vec<String>>> + Send;

    /// Pushes the item's expiry deadline forward to `now +`
    /// [`extend_by`](ItemOptions::extend_by).
    fn renew_expiry(&self, key: &str) -> impl Future<Output = Result<()>> + Send;

    /// Overwrites the item's synchronization fields (kind and direction)
    /// with those of `opts`, leaving expiry untouched.
    fn change_sync(&self, key: &str, opts: &ItemOptions) -> impl Future<Output = Result<()>> + Send;

    /// Records a successful push to the persistent source: sets `last_sync`
    /// to now and flips the direction to
    /// [`SyncDirection::UpdateHotStorage`](crate::SyncDirection::UpdateHotStorage).
    fn mark_synced(&self, key: &str) -> impl Future<Output = Result<()>> + Send;
}
