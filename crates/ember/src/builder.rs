// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Cache builder for composing a provider with its collaborators.

use std::{marker::PhantomData, sync::Arc, time::Duration};

use ember_provider::{Provider, WriteOptions};

use crate::{
    Cache,
    cache::Inner,
    source::{Committer, Getter},
    sync::SyncHandle,
};

#[cfg(feature = "memory")]
use ember_memory::MemoryProvider;

/// Builder for constructing a [`Cache`].
///
/// Created by [`Cache::builder`]. A cache is composed from a hot-storage
/// provider plus optional getter and committer collaborators; operations
/// that need an absent collaborator fail with
/// [`Error::NoGetter`](crate::Error::NoGetter) or silently skip the commit.
///
/// # Examples
///
/// ```
/// use ember::Cache;
/// use ember_provider::WriteOptions;
/// use std::time::Duration;
///
/// let cache = Cache::builder::<String>()
///     .memory()
///     .default_write(WriteOptions::with_ttl(Duration::from_secs(60)))
///     .build();
/// assert!(format!("{cache:?}").contains("Cache"));
/// ```
#[derive(Debug)]
#[must_use]
pub struct CacheBuilder<V, P = (), G = (), C = ()> {
    provider: P,
    getter: Option<G>,
    committer: Option<C>,
    default_write: WriteOptions,
    sync_every: Option<Duration>,
    _value: PhantomData<fn() -> V>,
}

impl<V> CacheBuilder<V> {
    pub(crate) fn new() -> Self {
        Self {
            provider: (),
            getter: None,
            committer: None,
            default_write: WriteOptions::default(),
            sync_every: None,
            _value: PhantomData,
        }
    }
}

impl<V, G, C> CacheBuilder<V, (), G, C> {
    /// Sets a custom hot-storage provider.
    pub fn provider<P>(self, provider: P) -> CacheBuilder<V, P, G, C>
    where
        P: Provider<V>,
    {
        CacheBuilder {
            provider,
            getter: self.getter,
            committer: self.committer,
            default_write: self.default_write,
            sync_every: self.sync_every,
            _value: PhantomData,
        }
    }

    /// Uses the built-in in-memory provider as hot storage.
    #[cfg(feature = "memory")]
    pub fn memory(self) -> CacheBuilder<V, MemoryProvider<V>, G, C>
    where
        V: Clone + Send + Sync,
    {
        self.provider(MemoryProvider::new())
    }
}

impl<V, P, G, C> CacheBuilder<V, P, G, C> {
    /// Sets the cold-read collaborator.
    pub fn getter<G2>(self, getter: G2) -> CacheBuilder<V, P, G2, C>
    where
        G2: Getter<V>,
    {
        CacheBuilder {
            provider: self.provider,
            getter: Some(getter),
            committer: self.committer,
            default_write: self.default_write,
            sync_every: self.sync_every,
            _value: PhantomData,
        }
    }

    /// Sets the cold-write collaborator.
    pub fn committer<C2>(self, committer: C2) -> CacheBuilder<V, P, G, C2>
    where
        C2: Committer<V>,
    {
        CacheBuilder {
            provider: self.provider,
            getter: self.getter,
            committer: Some(committer),
            default_write: self.default_write,
            sync_every: self.sync_every,
            _value: PhantomData,
        }
    }

    /// Sets the write options applied when an operation does not supply its
    /// own, including read-through repopulation.
    pub fn default_write(mut self, write: WriteOptions) -> Self {
        self.default_write = write;
        self
    }

    /// Sets the batch reconciliation interval, overriding the
    /// [`sync_every`](WriteOptions::sync_every) carried by the default
    /// write options. Zero disables the scheduler.
    pub fn sync_every(mut self, every: Duration) -> Self {
        self.sync_every = Some(every);
        self
    }
}

impl<V, P, G, C> CacheBuilder<V, P, G, C>
where
    V: Clone + Send + Sync + 'static,
    P: Provider<V> + 'static,
    G: Getter<V> + 'static,
    C: Committer<V> + 'static,
{
    /// Builds the cache, spawning the background scheduler when a positive
    /// batch interval is configured.
    ///
    /// # Panics
    ///
    /// Spawning requires a running Tokio runtime, so with batch sync
    /// enabled this must be called from within one.
    #[must_use]
    pub fn build(self) -> Cache<V, P, G, C> {
        let every = self.sync_every.unwrap_or(self.default_write.sync_every);
        let inner = Arc::new(Inner {
            provider: self.provider,
            getter: self.getter,
            committer: self.committer,
            default_write: self.default_write,
            _value: PhantomData,
        });

        let sync = (every > Duration::ZERO).then(|| SyncHandle::spawn(Arc::clone(&inner), every));
        Cache::new(inner, sync)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_without_interval_spawns_no_scheduler() {
        let cache = Cache::builder::<i32>().memory().build();
        assert!(format!("{cache:?}").contains("sync_running: false"));
    }

    #[test]
    fn default_write_is_carried() {
        let write = WriteOptions::with_ttl(Duration::from_secs(5));
        let cache = Cache::builder::<i32>().memory().default_write(write).build();
        assert!(format!("{cache:?}").contains("5s"));
    }
}
