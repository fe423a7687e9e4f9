// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Error types for hot-storage operations.

/// Boxed error type used for wrapping backend failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// An error from a hot-storage operation.
///
/// [`Error::NotFound`] is the sentinel used throughout the system for "key
/// absent in this tier". Callers branch on it to implement read-through
/// fallback, so providers must report a clean miss with this variant rather
/// than a backend error.
///
/// # Example
///
/// ```
/// use ember_provider::Error;
///
/// let error = Error::NotFound;
/// assert!(error.is_not_found());
/// ```
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The key is not present in this tier.
    #[error("key not found")]
    NotFound,

    /// The item existed but its policy-evaluated freshness window has closed.
    #[error("item is expired")]
    Expired,

    /// The key does not parse into two non-empty `table:id` segments.
    #[error("malformed key {0:?}: expected `table:id`")]
    MalformedKey(String),

    /// The provider backend failed.
    #[error("provider backend: {0}")]
    Backend(#[source] BoxError),
}

impl Error {
    /// Wraps an arbitrary backend failure.
    ///
    /// This is the public API for creating provider errors from remote or
    /// otherwise fallible backends.
    pub fn backend(cause: impl Into<BoxError>) -> Self {
        Self::Backend(cause.into())
    }

    /// Returns `true` for the "key absent" sentinel.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }

    /// Returns `true` when the item existed but was past its expiry.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        matches!(self, Self::Expired)
    }
}

/// A specialized [`Result`] type for hot-storage operations.
pub type Result<T> = std::result::Result<T, Error>;
