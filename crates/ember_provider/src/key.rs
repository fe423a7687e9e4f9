// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Composite `table:id` key parsing.
//!
//! Every addressable unit in the system is a string key made of a table
//! segment and an identifier segment joined by [`KEY_SEPARATOR`]. There is
//! no separate "table" concept at the storage level; the convention exists
//! so cold-tier collaborators can route a key to the right backing table.

use std::fmt;

use crate::{Error, Result};

/// Separator between the table and identifier segments of a key.
pub const KEY_SEPARATOR: char = ':';

/// A parsed, validated view of a composite key.
///
/// `Key` borrows from the input text; it is a validation and routing aid,
/// not an owned handle. Parsing fails unless the text is exactly two
/// non-empty segments.
///
/// # Examples
///
/// ```
/// use ember_provider::Key;
///
/// let key = Key::parse("users:42")?;
/// assert_eq!(key.table(), "users");
/// assert_eq!(key.id(), "42");
///
/// assert!(Key::parse("users:").is_err());
/// assert!(Key::parse(":42").is_err());
/// assert!(Key::parse("a:b:c").is_err());
/// # Ok::<(), ember_provider::Error>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Key<'a> {
    table: &'a str,
    id: &'a str,
}

impl<'a> Key<'a> {
    /// Parses `text` as a `table:id` key.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedKey`] when the separator count is wrong or
    /// either segment is empty.
    pub fn parse(text: &'a str) -> Result<Self> {
        let mut segments = text.split(KEY_SEPARATOR);
        match (segments.next(), segments.next(), segments.next()) {
            (Some(table), Some(id), None) if !table.is_empty() && !id.is_empty() => {
                Ok(Self { table, id })
            }
            _ => Err(Error::MalformedKey(text.to_owned())),
        }
    }

    /// Joins a table and identifier into key text.
    ///
    /// ```
    /// use ember_provider::Key;
    ///
    /// assert_eq!(Key::join("users", "42"), "users:42");
    /// ```
    #[must_use]
    pub fn join(table: &str, id: &str) -> String {
        format!("{table}{KEY_SEPARATOR}{id}")
    }

    /// Returns the table segment.
    #[must_use]
    pub fn table(&self) -> &'a str {
        self.table
    }

    /// Returns the identifier segment.
    #[must_use]
    pub fn id(&self) -> &'a str {
        self.id
    }
}

impl fmt::Display for Key<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{KEY_SEPARATOR}{}", self.table, self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_two_segments() {
        let key = Key::parse("orders:2024-001").expect("valid key");
        assert_eq!(key.table(), "orders");
        assert_eq!(key.id(), "2024-001");
        assert_eq!(key.to_string(), "orders:2024-001");
    }

    #[test]
    fn rejects_empty_input() {
        assert!(matches!(Key::parse(""), Err(Error::MalformedKey(_))));
    }

    #[test]
    fn rejects_missing_separator() {
        assert!(matches!(Key::parse("users"), Err(Error::MalformedKey(_))));
    }

    #[test]
    fn rejects_empty_segments() {
        assert!(Key::parse(":42").is_err());
        assert!(Key::parse("users:").is_err());
        assert!(Key::parse(":").is_err());
    }

    #[test]
    fn rejects_extra_segments() {
        assert!(Key::parse("a:b:c").is_err());
    }

    #[test]
    fn join_round_trips() {
        let text = Key::join("users", "42");
        let key = Key::parse(&text).expect("joined key parses");
        assert_eq!(key.table(), "users");
        assert_eq!(key.id(), "42");
    }
}
