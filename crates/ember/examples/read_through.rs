// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Read-through caching over a slow source.
//!
//! The cache consults hot storage first; on a miss it falls back to the
//! getter and repopulates, so the second read for the same key is served
//! without touching the source.

use ember::{Cache, Getter, Query, SourceError};

/// Pretends to be a database of user names.
struct UserTable;

impl Getter<String> for UserTable {
    async fn fetch(&self, query: &Query<'_>) -> Result<Vec<String>, SourceError> {
        match *query {
            Query::Eq("users:1") => Ok(vec!["alice".to_owned()]),
            Query::Eq("users:2") => Ok(vec!["bob".to_owned()]),
            Query::Eq(_) => Err(SourceError::NotFound),
            Query::Pattern(_) | Query::Between { .. } => {
                Ok(vec!["alice".to_owned(), "bob".to_owned()])
            }
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), ember::Error> {
    let cache = Cache::builder::<String>().memory().getter(UserTable).build();

    // Cold read: served by the getter, then cached.
    println!("users:1 = {}", cache.get("users:1").await?);

    // Warm read: served from hot storage.
    println!("users:1 = {}", cache.get("users:1").await?);

    // An empty prefix scan can opt in to one bulk cold read.
    let everyone = cache.get_by_pattern("groups:*", true).await?;
    println!("bulk fallback returned {} rows", everyone.len());

    match cache.get("users:404").await {
        Err(err) if err.is_not_found() => println!("users:404 is nowhere"),
        other => println!("unexpected: {other:?}"),
    }

    Ok(())
}
