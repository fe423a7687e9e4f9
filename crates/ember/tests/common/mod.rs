// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Shared test doubles: a recording persistent-source fake and a provider
//! wrapper with failure injection.

#![allow(dead_code, reason = "not every test binary exercises every helper")]

use std::{
    collections::BTreeMap,
    sync::{
        Arc,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    },
    time::Duration,
};

use parking_lot::Mutex;

use ember::{Committer, Getter, Query, SourceError, StorageError};
use ember_memory::MemoryProvider;
use ember_provider::{ItemOptions, Provider, WriteOptions};

/// An in-memory stand-in for the persistent source. Records every commit
/// and counts fetches; failure flags make any phase fail on demand.
#[derive(Default)]
pub struct FakeSource {
    rows: Mutex<BTreeMap<String, String>>,
    saves: Mutex<Vec<(String, String)>>,
    deletes: Mutex<Vec<String>>,
    fetches: AtomicUsize,
    fail_fetches: AtomicBool,
    fail_saves: AtomicBool,
    fail_deletes: AtomicBool,
}

impl FakeSource {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn insert_row(&self, key: &str, value: &str) {
        self.rows.lock().insert(key.to_owned(), value.to_owned());
    }

    pub fn remove_row(&self, key: &str) {
        self.rows.lock().remove(key);
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    pub fn saves(&self) -> Vec<(String, String)> {
        self.saves.lock().clone()
    }

    pub fn deletes(&self) -> Vec<String> {
        self.deletes.lock().clone()
    }

    pub fn fail_fetches(&self, fail: bool) {
        self.fail_fetches.store(fail, Ordering::SeqCst);
    }

    pub fn fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    pub fn fail_deletes(&self, fail: bool) {
        self.fail_deletes.store(fail, Ordering::SeqCst);
    }
}

impl Getter<String> for FakeSource {
    async fn fetch(&self, query: &Query<'_>) -> Result<Vec<String>, SourceError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if self.fail_fetches.load(Ordering::SeqCst) {
            return Err(SourceError::other(std::io::Error::other("source down")));
        }
        let rows = self.rows.lock();
        match *query {
            Query::Eq(key) => match rows.get(key) {
                Some(value) => Ok(vec![value.clone()]),
                None => Err(SourceError::NotFound),
            },
            Query::Pattern(pattern) => {
                let prefix = pattern.strip_suffix('*').unwrap_or(pattern);
                Ok(rows
                    .iter()
                    .filter(|(k, _)| k.starts_with(prefix))
                    .map(|(_, v)| v.clone())
                    .collect())
            }
            Query::Between { from, to } => Ok(rows
                .range(from.to_owned()..=to.to_owned())
                .map(|(_, v)| v.clone())
                .collect()),
        }
    }
}

impl Committer<String> for FakeSource {
    async fn save(&self, key: &str, value: &String) -> Result<(), SourceError> {
        self.saves.lock().push((key.to_owned(), value.clone()));
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(SourceError::other(std::io::Error::other("save failed")));
        }
        self.rows.lock().insert(key.to_owned(), value.clone());
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), SourceError> {
        self.deletes.lock().push(key.to_owned());
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(SourceError::other(std::io::Error::other("delete failed")));
        }
        self.rows.lock().remove(key);
        Ok(())
    }
}

/// Wraps the in-memory provider so tests can make writes fail.
#[derive(Debug, Clone)]
pub struct FlakyProvider {
    inner: MemoryProvider<String>,
    fail_sets: Arc<AtomicBool>,
}

impl FlakyProvider {
    pub fn new() -> Self {
        Self {
            inner: MemoryProvider::new(),
            fail_sets: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn fail_sets(&self, fail: bool) {
        self.fail_sets.store(fail, Ordering::SeqCst);
    }
}

impl Provider<String> for FlakyProvider {
    async fn set(&self, key: &str, value: String, opts: &WriteOptions) -> Result<(), StorageError> {
        if self.fail_sets.load(Ordering::SeqCst) {
            return Err(StorageError::backend(std::io::Error::other("write refused")));
        }
        self.inner.set(key, value, opts).await
    }

    async fn get(&self, key: &str) -> Result<(String, ItemOptions), StorageError> {
        self.inner.get(key).await
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        self.inner.delete(key).await
    }

    async fn keys(&self, pattern: &str) -> Result<Vec<String>, StorageError> {
        self.inner.keys(pattern).await
    }

    async fn key_range(&self, from: &str, to: &str) -> Result<Vec<String>, StorageError> {
        self.inner.key_range(from, to).await
    }

    async fn renew_expiry(&self, key: &str) -> Result<(), StorageError> {
        self.inner.renew_expiry(key).await
    }

    async fn change_sync(&self, key: &str, opts: &ItemOptions) -> Result<(), StorageError> {
        self.inner.change_sync(key, opts).await
    }

    async fn mark_synced(&self, key: &str) -> Result<(), StorageError> {
        self.inner.mark_synced(key).await
    }
}

/// Polls `cond` until it holds or `deadline` elapses.
pub async fn wait_until(deadline: Duration, mut cond: impl FnMut() -> bool) -> bool {
    let start = std::time::Instant::now();
    while start.elapsed() < deadline {
        if cond() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    cond()
}
