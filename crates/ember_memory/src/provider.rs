// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! The in-memory hot-storage provider.

use std::{collections::HashMap, sync::Arc, time::Instant};

use parking_lot::RwLock;

use ember_provider::{Error, ItemOptions, Provider, Result, WriteOptions};

use crate::{KeyIndex, builder::MemoryProviderBuilder};

/// A stored value and its metadata.
#[derive(Debug, Clone)]
struct Item<V> {
    value: V,
    opts: ItemOptions,
}

/// Item map plus ordered index; every mutation touches both under one
/// exclusive lock acquisition so no observer sees them disagree.
#[derive(Debug)]
struct State<V> {
    items: HashMap<String, Item<V>>,
    index: KeyIndex,
}

/// An in-memory hot-storage provider.
///
/// Cloning yields another handle to the same instance, so a caller can keep
/// one handle for inspection while the cache engine owns the other. Reads
/// take the instance's shared lock; mutations take the exclusive lock.
///
/// # Examples
///
/// ```
/// use ember_memory::MemoryProvider;
/// use ember_provider::{Provider, WriteOptions};
/// # futures::executor::block_on(async {
///
/// let provider = MemoryProvider::<i32>::new();
///
/// provider.set("users:1", 42, &WriteOptions::default()).await?;
/// let (value, _opts) = provider.get("users:1").await?;
/// assert_eq!(value, 42);
/// # Ok::<(), ember_provider::Error>(())
/// # });
/// ```
pub struct MemoryProvider<V> {
    state: Arc<RwLock<State<V>>>,
}

impl<V> std::fmt::Debug for MemoryProvider<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryProvider")
            .field("len", &self.state.read().index.len())
            .finish_non_exhaustive()
    }
}

impl<V> Clone for MemoryProvider<V> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

impl<V> Default for MemoryProvider<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> MemoryProvider<V> {
    /// Creates a new empty provider.
    #[must_use]
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Creates a new builder for configuring a provider.
    #[must_use]
    pub fn builder() -> MemoryProviderBuilder<V> {
        MemoryProviderBuilder::new()
    }

    pub(crate) fn from_builder(builder: &MemoryProviderBuilder<V>) -> Self {
        let capacity = builder.initial_capacity.unwrap_or(0);
        Self {
            state: Arc::new(RwLock::new(State {
                items: HashMap::with_capacity(capacity),
                index: KeyIndex::with_capacity(capacity),
            })),
        }
    }

    /// Number of live items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.state.read().index.len()
    }

    /// Returns `true` when the provider holds no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.state.read().index.is_empty()
    }

    fn update_opts(&self, key: &str, apply: impl FnOnce(&mut ItemOptions)) -> Result<()> {
        let mut state = self.state.write();
        let item = state.items.get_mut(key).ok_or(Error::NotFound)?;
        apply(&mut item.opts);
        Ok(())
    }
}

impl<V> Provider<V> for MemoryProvider<V>
where
    V: Clone + Send + Sync,
{
    async fn set(&self, key: &str, value: V, opts: &WriteOptions) -> Result<()> {
        let item = Item {
            value,
            opts: ItemOptions::for_write(opts, Instant::now()),
        };
        let mut state = self.state.write();
        state.items.insert(key.to_owned(), item);
        state.index.insert(key);
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<(V, ItemOptions)> {
        let state = self.state.read();
        let item = state.items.get(key).ok_or(Error::NotFound)?;
        Ok((item.value.clone(), item.opts))
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let mut state = self.state.write();
        if state.items.remove(key).is_some() {
            state.index.remove(key);
        }
        Ok(())
    }

    async fn keys(&self, pattern: &str) -> Result<Vec<String>> {
        Ok(self.state.read().index.matching(pattern))
    }

    async fn key_range(&self, from: &str, to: &str) -> Result<Vec<String>> {
        Ok(self.state.read().index.range(from, to))
    }

    async fn renew_expiry(&self, key: &str) -> Result<()> {
        self.update_opts(key, |opts| {
            opts.expires_at = Instant::now() + opts.extend_by;
        })
    }

    async fn change_sync(&self, key: &str, new: &ItemOptions) -> Result<()> {
        self.update_opts(key, |opts| {
            opts.sync = new.sync;
            opts.direction = new.direction;
        })
    }

    async fn mark_synced(&self, key: &str) -> Result<()> {
        self.update_opts(key, |opts| opts.mark_synced(Instant::now()))
    }
}
