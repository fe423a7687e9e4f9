// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! The persistent-source collaborator contracts.
//!
//! The engine never talks to a database or remote API directly. Cold reads
//! go through a [`Getter`] and cold writes through a [`Committer`]; both are
//! caller-supplied strategies, so a cache is composed from independently
//! testable parts.

use ember_provider::BoxError;

/// A cold-read request handed to a [`Getter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Query<'a> {
    /// Fetch the single record addressed by this key.
    Eq(&'a str),
    /// Fetch every record whose key matches this pattern (`"p*"` prefix,
    /// `"*"` all).
    Pattern(&'a str),
    /// Fetch every record whose key falls in this inclusive lexicographic
    /// range.
    Between {
        /// Lower bound, inclusive.
        from: &'a str,
        /// Upper bound, inclusive.
        to: &'a str,
    },
}

/// An error reported by a [`Getter`] or [`Committer`].
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// The persistent source has no record for the requested key.
    ///
    /// For an [`Query::Eq`] fetch this is how the engine tells a genuine
    /// miss from a failure; do not report transient faults this way.
    #[error("not found in the persistent source")]
    NotFound,

    /// Any other failure, carrying the underlying cause.
    #[error(transparent)]
    Other(BoxError),
}

impl SourceError {
    /// Wraps an arbitrary failure.
    pub fn other(source: impl Into<BoxError>) -> Self {
        Self::Other(source.into())
    }
}

/// Cold-read strategy: fetches records from the persistent source.
///
/// An `Eq` query for an absent key must yield [`SourceError::NotFound`];
/// `Pattern` and `Between` queries may return an empty set instead.
pub trait Getter<V>: Send + Sync {
    /// Fetches the records selected by `query`, in source order.
    fn fetch(&self, query: &Query<'_>) -> impl Future<Output = Result<Vec<V>, SourceError>> + Send;
}

/// Cold-write strategy: pushes hot-storage changes to the persistent source.
///
/// Both operations must be idempotent; the background scheduler may re-send
/// a save for a key whose persistent record already matches.
pub trait Committer<V>: Send + Sync {
    /// Persists `value` under `key`.
    fn save(&self, key: &str, value: &V) -> impl Future<Output = Result<(), SourceError>> + Send;

    /// Removes the persistent record for `key`.
    fn delete(&self, key: &str) -> impl Future<Output = Result<(), SourceError>> + Send;
}

// A shared handle delegates to the collaborator it points at, so callers can
// keep a clone of the handle after giving one to the builder.
impl<V, T: Getter<V>> Getter<V> for std::sync::Arc<T> {
    fn fetch(&self, query: &Query<'_>) -> impl Future<Output = Result<Vec<V>, SourceError>> + Send {
        (**self).fetch(query)
    }
}

impl<V, T: Committer<V>> Committer<V> for std::sync::Arc<T> {
    fn save(&self, key: &str, value: &V) -> impl Future<Output = Result<(), SourceError>> + Send {
        (**self).save(key, value)
    }

    fn delete(&self, key: &str) -> impl Future<Output = Result<(), SourceError>> + Send {
        (**self).delete(key)
    }
}

// The unit type stands in when a cache is built without a collaborator; the
// engine checks for presence before calling, so these bodies are unreachable
// in practice.
impl<V> Getter<V> for () {
    async fn fetch(&self, _query: &Query<'_>) -> Result<Vec<V>, SourceError> {
        Err(SourceError::NotFound)
    }
}

impl<V: Sync> Committer<V> for () {
    async fn save(&self, _key: &str, _value: &V) -> Result<(), SourceError> {
        Ok(())
    }

    async fn delete(&self, _key: &str) -> Result<(), SourceError> {
        Ok(())
    }
}
