// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! A read/write-through caching layer for slow persistent data sources.
//!
//! `ember` sits between application code and a database or external API. It
//! exposes a uniform key/value surface backed by a fast in-memory hot tier,
//! falls back to a pluggable cold-read [`Getter`] when data is absent or
//! expired, and pushes writes back through a pluggable [`Committer`] either
//! synchronously or via a background reconciliation scheduler.
//!
//! Keys are composite `table:id` strings; an ordered index over the hot
//! tier makes prefix ([`Cache::get_by_pattern`]) and lexicographic range
//! ([`Cache::get_range`]) queries possible over an otherwise unordered key
//! space.
//!
//! # Examples
//!
//! Read-through with a getter backing an in-memory hot tier:
//!
//! ```
//! use ember::{Cache, Getter, Query, SourceError};
//!
//! struct Fixed;
//!
//! impl Getter<String> for Fixed {
//!     async fn fetch(&self, query: &Query<'_>) -> Result<Vec<String>, SourceError> {
//!         match query {
//!             Query::Eq("users:1") => Ok(vec!["alice".to_owned()]),
//!             Query::Eq(_) => Err(SourceError::NotFound),
//!             _ => Ok(Vec::new()),
//!         }
//!     }
//! }
//!
//! # futures::executor::block_on(async {
//! let cache = Cache::builder::<String>().memory().getter(Fixed).build();
//!
//! // Miss in hot storage, hit via the getter; the value is now cached.
//! assert_eq!(cache.get("users:1").await?, "alice");
//! assert_eq!(cache.keys("*").await?, vec!["users:1"]);
//! # Ok::<(), ember::Error>(())
//! # });
//! ```

mod builder;
mod cache;
mod error;
mod source;
mod sync;

pub use builder::CacheBuilder;
pub use cache::Cache;
pub use error::{Error, Result};
pub use source::{Committer, Getter, Query, SourceError};

pub use ember_provider::{
    Error as StorageError, ExpiryKind, ItemOptions, Key, Provider, SyncDirection, SyncKind, WriteOptions,
};

#[cfg(feature = "memory")]
pub use ember_memory::MemoryProvider;
