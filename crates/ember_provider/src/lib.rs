// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Core contracts for embercache hot-storage tiers.
//!
//! This crate defines the [`Provider`] trait that every hot-storage
//! implementation must satisfy, along with the item metadata model
//! ([`WriteOptions`], [`ItemOptions`]), the composite [`Key`] codec, and the
//! [`Error`] taxonomy shared across the system.
//!
//! # Overview
//!
//! The provider abstraction separates storage concerns from caching policy.
//! A provider stores values together with their synchronization and expiry
//! metadata and answers prefix/range key queries; it never *evaluates*
//! expiry policy. Policy decisions (renewal, eviction on expiry,
//! reconciliation with a persistent source) belong to the `ember` cache
//! engine sitting on top.
//!
//! # Implementing a Provider
//!
//! ```
//! use ember_provider::{ItemOptions, Provider, Error, Result, WriteOptions};
//! use std::collections::HashMap;
//! use std::sync::RwLock;
//! use std::time::Instant;
//!
//! struct TinyProvider(RwLock<HashMap<String, (i32, ItemOptions)>>);
//!
//! impl Provider<i32> for TinyProvider {
//!     async fn set(&self, key: &str, value: i32, opts: &WriteOptions) -> Result<()> {
//!         let item = (value, ItemOptions::for_write(opts, Instant::now()));
//!         self.0.write().expect("lock poisoned").insert(key.to_owned(), item);
//!         Ok(())
//!     }
//!
//!     async fn get(&self, key: &str) -> Result<(i32, ItemOptions)> {
//!         self.0.read().expect("lock poisoned").get(key).copied().ok_or(Error::NotFound)
//!     }
//!
//!     async fn delete(&self, key: &str) -> Result<()> {
//!         self.0.write().expect("lock poisoned").remove(key);
//!         Ok(())
//!     }
//!
//!     async fn keys(&self, _pattern: &str) -> Result<Vec<String>> {
//!         let mut keys: Vec<_> = self.0.read().expect("lock poisoned").keys().cloned().collect();
//!         keys.sort();
//!         Ok(keys)
//!     }
//!
//!     async fn key_range(&self, from: &str, to: &str) -> Result<Vec<String>> {
//!         Ok(self.keys("*").await?.into_iter().filter(|k| from <= k.as_str() && k.as_str() <= to).collect())
//!     }
//!
//!     async fn renew_expiry(&self, key: &str) -> Result<()> {
//!         let mut items = self.0.write().expect("lock poisoned");
//!         let (_, opts) = items.get_mut(key).ok_or(Error::NotFound)?;
//!         opts.expires_at = Instant::now() + opts.extend_by;
//!         Ok(())
//!     }
//!
//!     async fn change_sync(&self, key: &str, new: &ItemOptions) -> Result<()> {
//!         let mut items = self.0.write().expect("lock poisoned");
//!         let (_, opts) = items.get_mut(key).ok_or(Error::NotFound)?;
//!         opts.sync = new.sync;
//!         opts.direction = new.direction;
//!         Ok(())
//!     }
//!
//!     async fn mark_synced(&self, key: &str) -> Result<()> {
//!         let mut items = self.0.write().expect("lock poisoned");
//!         let (_, opts) = items.get_mut(key).ok_or(Error::NotFound)?;
//!         opts.mark_synced(Instant::now());
//!         Ok(())
//!     }
//! }
//! ```

pub mod error;
mod key;
mod options;
pub(crate) mod provider;

#[doc(inline)]
pub use error::{BoxError, Error, Result};
#[doc(inline)]
pub use key::{KEY_SEPARATOR, Key};
#[doc(inline)]
pub use options::{ExpiryKind, ItemOptions, SyncDirection, SyncKind, WriteOptions};
#[doc(inline)]
pub use provider::Provider;
