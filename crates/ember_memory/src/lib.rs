// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! An in-memory hot-storage provider for the embercache engine.
//!
//! [`MemoryProvider`] keeps items in a process-local hash map guarded by a
//! reader/writer lock and maintains a flat sorted [`KeyIndex`] beside it, so
//! prefix and range queries come back in lexicographic order without any
//! ordering in the map itself.
//!
//! This provider is the natural hot tier for a single-process cache and is
//! what the engine constructs by default. It stores expiry and
//! synchronization metadata verbatim; all policy evaluation lives in the
//! engine.
//!
//! # Examples
//!
//! ```
//! use ember_memory::MemoryProvider;
//! use ember_provider::{Provider, WriteOptions};
//! # futures::executor::block_on(async {
//!
//! let provider = MemoryProvider::<String>::new();
//! let opts = WriteOptions::default();
//!
//! provider.set("users:1", "alice".to_owned(), &opts).await?;
//! provider.set("users:2", "bob".to_owned(), &opts).await?;
//!
//! let keys = provider.keys("users:*").await?;
//! assert_eq!(keys, vec!["users:1", "users:2"]);
//! # Ok::<(), ember_provider::Error>(())
//! # });
//! ```

mod builder;
mod index;
mod provider;

pub use builder::MemoryProviderBuilder;
pub use index::KeyIndex;
pub use provider::MemoryProvider;
