// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Per-write policy and per-item synchronization metadata.

use std::time::{Duration, Instant};

/// How an item's expiry deadline behaves over its lifetime.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ExpiryKind {
    /// The deadline is fixed at write time: `write instant + TTL`.
    #[default]
    Absolute,
    /// Each successful read pushes the deadline forward by the item's
    /// [`extend_by`](ItemOptions::extend_by) duration.
    Extended,
}

/// Whether and when a write is pushed to the persistent source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SyncKind {
    /// The item is never reconciled automatically.
    #[default]
    None,
    /// The write is committed synchronously as part of `set`.
    Now,
    /// The write is left for the background scheduler to commit.
    Batch,
}

/// Per-item reconciliation state.
///
/// This is a two-state convergence protocol: a dirty item
/// ([`UpdatePersistent`](SyncDirection::UpdatePersistent)) transitions to
/// clean ([`UpdateHotStorage`](SyncDirection::UpdateHotStorage)) when its
/// pending write reaches the persistent source; a clean item is refreshed
/// from that source opportunistically without changing state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SyncDirection {
    /// The item takes no part in reconciliation.
    #[default]
    None,
    /// The item carries a pending write that must reach the persistent source.
    UpdatePersistent,
    /// The item should be refreshed from the persistent source.
    UpdateHotStorage,
}

/// Policy applied to a write (or carried as the engine-wide default).
///
/// # Examples
///
/// ```
/// use ember_provider::{SyncKind, WriteOptions};
/// use std::time::Duration;
///
/// let write = WriteOptions {
///     ttl: Duration::from_secs(60),
///     sync: SyncKind::Batch,
///     ..WriteOptions::default()
/// };
/// assert_eq!(write.ttl, Duration::from_secs(60));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteOptions {
    /// Time-to-live: how long the item stays fresh after the write.
    pub ttl: Duration,
    /// Expiry behavior derived from this write.
    pub expiry: ExpiryKind,
    /// Synchronization policy for this write.
    pub sync: SyncKind,
    /// Batch reconciliation interval. Used as the engine-wide default when
    /// the cache builder does not set one; zero disables batch sync.
    pub sync_every: Duration,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(15 * 60),
            expiry: ExpiryKind::Absolute,
            sync: SyncKind::None,
            sync_every: Duration::ZERO,
        }
    }
}

impl WriteOptions {
    /// Returns the default options with the given TTL.
    #[must_use]
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            ttl,
            ..Self::default()
        }
    }
}

/// Metadata stored alongside every item in hot storage.
///
/// Providers store and report these fields verbatim; evaluating them (expiry
/// checks, renewal, reconciliation) is the cache engine's job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemOptions {
    /// Absolute expiry deadline.
    pub expires_at: Instant,
    /// How the deadline behaves on reads.
    pub expiry: ExpiryKind,
    /// Step by which an [`ExpiryKind::Extended`] deadline is pushed forward
    /// on each read. Derived from the write TTL.
    pub extend_by: Duration,
    /// Synchronization policy inherited from the write.
    pub sync: SyncKind,
    /// Current reconciliation state.
    pub direction: SyncDirection,
    /// When the item last reached the persistent source, if ever.
    pub last_sync: Option<Instant>,
}

impl ItemOptions {
    /// Builds the metadata recorded for a fresh write.
    ///
    /// A fresh write is born dirty
    /// ([`SyncDirection::UpdatePersistent`]) — it has not reached the
    /// persistent source yet. Whether it ever does is governed by its
    /// [`SyncKind`].
    #[must_use]
    pub fn for_write(write: &WriteOptions, now: Instant) -> Self {
        Self {
            expires_at: now + write.ttl,
            expiry: write.expiry,
            extend_by: write.ttl,
            sync: write.sync,
            direction: SyncDirection::UpdatePersistent,
            last_sync: None,
        }
    }

    /// Records a successful push to the persistent source: the item becomes
    /// clean and eligible for future refreshes.
    pub fn mark_synced(&mut self, now: Instant) {
        self.last_sync = Some(now);
        self.direction = SyncDirection::UpdateHotStorage;
    }

    /// Returns `true` when the deadline has passed as of `now`.
    #[must_use]
    pub fn is_expired_at(&self, now: Instant) -> bool {
        self.expires_at <= now
    }
}
