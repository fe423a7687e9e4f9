// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::source::SourceError;

/// An error returned by cache-engine operations.
///
/// The variants identify the failing phase so callers can react to a miss
/// or an expired hit differently from a collaborator outage.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A hot-storage failure, including expired hits and malformed keys.
    #[error(transparent)]
    Storage(#[from] ember_provider::Error),

    /// The key is absent from hot storage and the persistent source alike.
    #[error("key not found in hot storage or the persistent source")]
    NotFound,

    /// The operation needs a cold-read collaborator and none was configured.
    #[error("no getter configured")]
    NoGetter,

    /// The getter collaborator failed.
    #[error("getter: {0}")]
    Getter(#[source] SourceError),

    /// The committer collaborator failed; the hot-storage write it followed
    /// is not rolled back.
    #[error("commit: {0}")]
    Committer(#[source] SourceError),

    /// Writing a freshly fetched value back into hot storage failed. The
    /// fetched value is withheld because the next read is no longer
    /// guaranteed to agree with it.
    #[error("repopulating hot storage: {0}")]
    Repopulate(#[source] ember_provider::Error),
}

impl Error {
    /// Returns `true` when the key was absent, in whichever tier was asked.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::NotFound => true,
            Self::Storage(err) => err.is_not_found(),
            _ => false,
        }
    }

    /// Returns `true` for an expired hot-storage hit.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        matches!(self, Self::Storage(err) if err.is_expired())
    }
}

/// A `Result` specialized to cache-engine [`Error`]s.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_predicate_spans_both_tiers() {
        assert!(Error::NotFound.is_not_found());
        assert!(Error::Storage(ember_provider::Error::NotFound).is_not_found());
        assert!(!Error::NoGetter.is_not_found());
    }

    #[test]
    fn expired_predicate_only_matches_storage_expiry() {
        assert!(Error::Storage(ember_provider::Error::Expired).is_expired());
        assert!(!Error::NotFound.is_expired());
    }

    #[test]
    fn getter_errors_name_their_phase() {
        let err = Error::Getter(SourceError::other(std::io::Error::other("down")));
        assert!(err.to_string().starts_with("getter:"));
    }
}
