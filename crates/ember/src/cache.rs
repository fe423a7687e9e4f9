// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! The cache engine: read-through, write-back, and bulk operations.

use std::{marker::PhantomData, sync::Arc, time::Instant};

use ember_provider::{ExpiryKind, ItemOptions, Key, Provider, SyncDirection, SyncKind, WriteOptions};

use crate::{
    Error, Result,
    builder::CacheBuilder,
    source::{Committer, Getter, Query, SourceError},
    sync::SyncHandle,
};

/// Everything the foreground operations and the background scheduler share.
pub(crate) struct Inner<V, P, G, C> {
    pub(crate) provider: P,
    pub(crate) getter: Option<G>,
    pub(crate) committer: Option<C>,
    pub(crate) default_write: WriteOptions,
    pub(crate) _value: PhantomData<fn() -> V>,
}

/// A read/write-through cache over a hot-storage provider.
///
/// Reads consult hot storage first and fall back to the [`Getter`]
/// collaborator on a miss, repopulating hot storage on the way out. Writes
/// land in hot storage and reach the persistent source either synchronously
/// ([`SyncKind::Now`]) or through the background scheduler
/// ([`SyncKind::Batch`]).
///
/// A cache owns its scheduler task: dropping the cache aborts it, and
/// [`close`](Cache::close) shuts it down cleanly. Multiple independent
/// caches can coexist in one process.
///
/// # Examples
///
/// ```
/// use ember::Cache;
/// # futures::executor::block_on(async {
///
/// let cache = Cache::builder::<String>().memory().build();
///
/// cache.set("users:1", "alice".to_owned(), false).await?;
/// assert_eq!(cache.get("users:1").await?, "alice");
/// # Ok::<(), ember::Error>(())
/// # });
/// ```
pub struct Cache<V, P, G = (), C = ()> {
    inner: Arc<Inner<V, P, G, C>>,
    sync: Option<SyncHandle>,
}

impl<V, P, G, C> std::fmt::Debug for Cache<V, P, G, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cache")
            .field("sync_running", &self.sync.is_some())
            .field("default_write", &self.inner.default_write)
            .finish_non_exhaustive()
    }
}

impl Cache<(), ()> {
    /// Creates a new cache builder.
    ///
    /// # Examples
    ///
    /// ```
    /// use ember::Cache;
    ///
    /// let cache = Cache::builder::<i32>().memory().build();
    /// assert!(format!("{cache:?}").contains("Cache"));
    /// ```
    #[must_use]
    pub fn builder<V>() -> CacheBuilder<V> {
        CacheBuilder::new()
    }
}

impl<V, P, G, C> Cache<V, P, G, C>
where
    V: Clone + Send + Sync,
    P: Provider<V>,
    G: Getter<V>,
    C: Committer<V>,
{
    pub(crate) fn new(inner: Arc<Inner<V, P, G, C>>, sync: Option<SyncHandle>) -> Self {
        Self { inner, sync }
    }

    /// Reads the value stored under `key`.
    ///
    /// A hot-storage hit first has its expiry policy evaluated: an
    /// [`ExpiryKind::Extended`] item gets its deadline pushed forward by its
    /// extension duration, and an item whose (possibly renewed) deadline has
    /// passed is evicted and reported as [expired](Error::is_expired). On a
    /// miss the getter is consulted with an `Eq` query and a hit repopulates
    /// hot storage with the default write options.
    ///
    /// # Errors
    ///
    /// Fails with a malformed-key error before touching storage, with
    /// [`Error::NotFound`] when both tiers miss, with [`Error::NoGetter`]
    /// when a miss has no collaborator to fall back to, and with
    /// [`Error::Repopulate`] when the write-back of a fetched value fails —
    /// in that case the fetched value is withheld, because hot storage no
    /// longer reflects what the next read will see.
    pub async fn get(&self, key: &str) -> Result<V> {
        self.inner.get(key).await
    }

    /// Reads every value whose key matches `pattern`, in key order.
    ///
    /// Candidate keys come from the ordered index (`"p*"` is a literal
    /// prefix, `"*"` matches everything); the first per-key read failure
    /// aborts the whole call with no partial results. When the hot result is
    /// empty and `run_getter_if_empty` is set, the getter is consulted once
    /// with a `Pattern` query and its rows are returned without being cached
    /// (no per-item TTL can be derived for a bulk pull).
    pub async fn get_by_pattern(&self, pattern: &str, run_getter_if_empty: bool) -> Result<Vec<V>> {
        let keys = self.inner.provider.keys(pattern).await?;
        let values = self.inner.collect(&keys).await?;
        if values.is_empty() && run_getter_if_empty {
            return self.inner.fetch_bulk(&Query::Pattern(pattern)).await;
        }
        Ok(values)
    }

    /// Reads every value whose key falls in `from..=to` under lexicographic
    /// comparison, in key order.
    ///
    /// Semantics match [`get_by_pattern`](Cache::get_by_pattern), with the
    /// getter fallback using a `Between` query. Numeric-looking ranges only
    /// behave numerically when keys are fixed-width zero-padded.
    pub async fn get_range(&self, from: &str, to: &str, run_getter_if_empty: bool) -> Result<Vec<V>> {
        let keys = self.inner.provider.key_range(from, to).await?;
        let values = self.inner.collect(&keys).await?;
        if values.is_empty() && run_getter_if_empty {
            return self.inner.fetch_bulk(&Query::Between { from, to }).await;
        }
        Ok(values)
    }

    /// Stores `value` under `key` with the cache's default write options.
    ///
    /// See [`set_with`](Cache::set_with).
    pub async fn set(&self, key: &str, value: V, sync_to_db: bool) -> Result<()> {
        let opts = self.inner.default_write;
        self.inner.set_with(key, value, &opts, sync_to_db).await
    }

    /// Stores `value` under `key` with explicit write options.
    ///
    /// The hot-storage write always happens. When `sync_to_db` is set and
    /// the options ask for [`SyncKind::Now`], the committer is invoked
    /// synchronously; a commit failure is surfaced as [`Error::Committer`]
    /// but the hot write is not rolled back — hot storage stays the source
    /// of truth for reads regardless of commit outcome. A
    /// [`SyncKind::Batch`] write is left dirty for the scheduler.
    pub async fn set_with(&self, key: &str, value: V, opts: &WriteOptions, sync_to_db: bool) -> Result<()> {
        self.inner.set_with(key, value, opts, sync_to_db).await
    }

    /// Deletes the given keys from hot storage, in the order given.
    ///
    /// With `sync_to_db`, the committer's delete is also invoked per key,
    /// best effort: one failed commit is logged and does not stop the rest
    /// of the batch, and never undoes the hot deletion.
    pub async fn delete(&self, sync_to_db: bool, keys: &[&str]) -> Result<()> {
        for key in keys {
            self.inner.delete_one(key, sync_to_db).await?;
        }
        Ok(())
    }

    /// Deletes every key matching `pattern`, resolved through the ordered
    /// index, with the same per-key semantics as [`delete`](Cache::delete).
    pub async fn delete_by_pattern(&self, pattern: &str, sync_to_db: bool) -> Result<()> {
        let keys = self.inner.provider.keys(pattern).await?;
        for key in &keys {
            self.inner.delete_one(key, sync_to_db).await?;
        }
        Ok(())
    }

    /// Deletes every key in `from..=to`, with the same per-key semantics as
    /// [`delete`](Cache::delete).
    pub async fn delete_range(&self, from: &str, to: &str, sync_to_db: bool) -> Result<()> {
        let keys = self.inner.provider.key_range(from, to).await?;
        for key in &keys {
            self.inner.delete_one(key, sync_to_db).await?;
        }
        Ok(())
    }

    /// Lists the hot-storage keys matching `pattern`, in sorted order.
    pub async fn keys(&self, pattern: &str) -> Result<Vec<String>> {
        Ok(self.inner.provider.keys(pattern).await?)
    }

    /// Lists the hot-storage keys in `from..=to`, in sorted order.
    pub async fn key_range(&self, from: &str, to: &str) -> Result<Vec<String>> {
        Ok(self.inner.provider.key_range(from, to).await?)
    }

    /// Shuts the background scheduler down and waits for it to finish.
    ///
    /// A cache that is simply dropped aborts the scheduler instead, which
    /// is safe (each key's reconciliation is self-contained) but may cut a
    /// tick short.
    pub async fn close(mut self) {
        if let Some(sync) = self.sync.take() {
            sync.shutdown().await;
        }
    }
}

impl<V, P, G, C> Inner<V, P, G, C>
where
    V: Clone + Send + Sync,
    P: Provider<V>,
    G: Getter<V>,
    C: Committer<V>,
{
    async fn get(&self, key: &str) -> Result<V> {
        Key::parse(key)?;

        match self.provider.get(key).await {
            Ok((value, opts)) => self.evaluate_hit(key, value, &opts).await,
            Err(err) if err.is_not_found() => self.read_through(key).await,
            Err(err) => Err(err.into()),
        }
    }

    /// Applies expiry policy to a hot-storage hit.
    async fn evaluate_hit(&self, key: &str, value: V, opts: &ItemOptions) -> Result<V> {
        let now = Instant::now();
        let deadline = match opts.expiry {
            ExpiryKind::Extended => {
                self.provider.renew_expiry(key).await?;
                now + opts.extend_by
            }
            ExpiryKind::Absolute => opts.expires_at,
        };
        if deadline <= now {
            self.provider.delete(key).await?;
            return Err(ember_provider::Error::Expired.into());
        }
        Ok(value)
    }

    /// Falls back to the getter on a hot-storage miss and repopulates.
    async fn read_through(&self, key: &str) -> Result<V> {
        let getter = self.getter.as_ref().ok_or(Error::NoGetter)?;
        let rows = match getter.fetch(&Query::Eq(key)).await {
            Ok(rows) => rows,
            Err(SourceError::NotFound) => return Err(Error::NotFound),
            Err(err) => return Err(Error::Getter(err)),
        };
        let Some(value) = rows.into_iter().next() else {
            return Err(Error::NotFound);
        };

        self.provider
            .set(key, value.clone(), &self.default_write)
            .await
            .map_err(Error::Repopulate)?;
        self.mark_refreshed(key, self.default_write.sync).await;

        Ok(value)
    }

    /// Flips an entry just written from the persistent source to the clean
    /// direction, so the scheduler does not push it straight back.
    async fn mark_refreshed(&self, key: &str, sync: SyncKind) {
        let mut opts = ItemOptions::for_write(&self.default_write, Instant::now());
        opts.sync = sync;
        opts.direction = SyncDirection::UpdateHotStorage;
        if let Err(err) = self.provider.change_sync(key, &opts).await {
            tracing::debug!(key, error = %err, "could not mark refreshed entry clean");
        }
    }

    async fn collect(&self, keys: &[String]) -> Result<Vec<V>> {
        let mut values = Vec::with_capacity(keys.len());
        for key in keys {
            let (value, _) = self.provider.get(key).await?;
            values.push(value);
        }
        Ok(values)
    }

    async fn fetch_bulk(&self, query: &Query<'_>) -> Result<Vec<V>> {
        let getter = self.getter.as_ref().ok_or(Error::NoGetter)?;
        match getter.fetch(query).await {
            Ok(rows) => Ok(rows),
            Err(SourceError::NotFound) => Ok(Vec::new()),
            Err(err) => Err(Error::Getter(err)),
        }
    }

    async fn set_with(&self, key: &str, value: V, opts: &WriteOptions, sync_to_db: bool) -> Result<()> {
        Key::parse(key)?;
        self.provider.set(key, value.clone(), opts).await?;

        if sync_to_db
            && opts.sync == SyncKind::Now
            && let Some(committer) = &self.committer
        {
            committer.save(key, &value).await.map_err(Error::Committer)?;
            self.provider.mark_synced(key).await?;
        }
        Ok(())
    }

    async fn delete_one(&self, key: &str, sync_to_db: bool) -> Result<()> {
        self.provider.delete(key).await?;
        if sync_to_db && let Some(committer) = &self.committer {
            if let Err(err) = committer.delete(key).await {
                tracing::warn!(key, error = %err, "delete commit failed; continuing with batch");
            }
        }
        Ok(())
    }

    /// One scheduler pass over every live key.
    pub(crate) async fn reconcile_tick(&self) {
        let keys = match self.provider.keys("*").await {
            Ok(keys) => keys,
            Err(err) => {
                tracing::warn!(error = %err, "reconciliation skipped: key listing failed");
                return;
            }
        };
        tracing::debug!(keys = keys.len(), "reconciliation tick");
        for key in keys {
            self.reconcile(&key).await;
        }
    }

    /// Reconciles one key; self-contained so a cancelled tick never leaves
    /// an item half-applied.
    async fn reconcile(&self, key: &str) {
        let (value, opts) = match self.provider.get(key).await {
            Ok(pair) => pair,
            // Unreadable items are orphans; hot storage must not retain them.
            Err(_) => {
                let _ = self.provider.delete(key).await;
                return;
            }
        };

        if opts.sync == SyncKind::None {
            return;
        }

        match opts.direction {
            SyncDirection::None => {}
            SyncDirection::UpdateHotStorage => self.refresh_from_source(key, &opts).await,
            SyncDirection::UpdatePersistent => self.push_to_source(key, &value).await,
        }
    }

    async fn refresh_from_source(&self, key: &str, opts: &ItemOptions) {
        let Some(getter) = &self.getter else { return };
        match getter.fetch(&Query::Eq(key)).await {
            Ok(rows) => match rows.into_iter().next() {
                Some(value) => {
                    if self.provider.set(key, value, &self.default_write).await.is_ok() {
                        // Keep the item's own sync policy; the default write
                        // options are only a TTL source here.
                        self.mark_refreshed(key, opts.sync).await;
                    }
                }
                None => {
                    let _ = self.provider.delete(key).await;
                }
            },
            // The upstream truth no longer has this key.
            Err(SourceError::NotFound) => {
                let _ = self.provider.delete(key).await;
            }
            Err(err) => {
                tracing::warn!(key, error = %err, "refresh failed; will retry next tick");
            }
        }
    }

    async fn push_to_source(&self, key: &str, value: &V) {
        let Some(committer) = &self.committer else { return };
        match committer.save(key, value).await {
            Ok(()) => {
                if let Err(err) = self.provider.mark_synced(key).await {
                    tracing::debug!(key, error = %err, "synced item vanished before metadata update");
                }
            }
            Err(err) => {
                tracing::warn!(key, error = %err, "save commit failed; will retry next tick");
            }
        }
    }
}
