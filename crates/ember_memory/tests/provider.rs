// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::time::Duration;

use futures::executor::block_on;

use ember_memory::MemoryProvider;
use ember_provider::{Error, Provider, SyncDirection, SyncKind, WriteOptions};

fn provider() -> MemoryProvider<String> {
    MemoryProvider::new()
}

#[test]
fn set_then_get_returns_the_value_and_metadata() {
    block_on(async {
        let provider = provider();
        let opts = WriteOptions::with_ttl(Duration::from_secs(60));

        provider.set("users:1", "alice".to_owned(), &opts).await.unwrap();

        let (value, item) = provider.get("users:1").await.unwrap();
        assert_eq!(value, "alice");
        assert_eq!(item.extend_by, Duration::from_secs(60));
        assert_eq!(item.direction, SyncDirection::UpdatePersistent);
        assert!(item.last_sync.is_none());
    });
}

#[test]
fn get_of_an_absent_key_is_not_found() {
    block_on(async {
        let provider = provider();
        let err = provider.get("users:404").await.unwrap_err();
        assert!(err.is_not_found());
    });
}

#[test]
fn overwrite_replaces_value_and_resets_metadata() {
    block_on(async {
        let provider = provider();
        let opts = WriteOptions::default();

        provider.set("users:1", "alice".to_owned(), &opts).await.unwrap();
        provider.mark_synced("users:1").await.unwrap();
        provider.set("users:1", "alice2".to_owned(), &opts).await.unwrap();

        let (value, item) = provider.get("users:1").await.unwrap();
        assert_eq!(value, "alice2");
        assert_eq!(item.direction, SyncDirection::UpdatePersistent);
        assert!(item.last_sync.is_none());
        assert_eq!(provider.len(), 1);
    });
}

#[test]
fn delete_removes_item_and_index_entry() {
    block_on(async {
        let provider = provider();
        let opts = WriteOptions::default();

        provider.set("users:1", "alice".to_owned(), &opts).await.unwrap();
        provider.set("users:2", "bob".to_owned(), &opts).await.unwrap();

        provider.delete("users:1").await.unwrap();

        assert!(provider.get("users:1").await.unwrap_err().is_not_found());
        assert_eq!(provider.keys("users:*").await.unwrap(), vec!["users:2"]);
    });
}

#[test]
fn delete_of_an_absent_key_succeeds() {
    block_on(async {
        let provider = provider();
        provider.delete("users:404").await.unwrap();
    });
}

#[test]
fn index_tracks_the_item_map_exactly() {
    block_on(async {
        let provider = provider();
        let opts = WriteOptions::default();

        for id in 0..1000 {
            let key = format!("items:{id:04}");
            provider.set(&key, format!("v{id}"), &opts).await.unwrap();
        }
        for id in (0..1000).step_by(2) {
            provider.delete(&format!("items:{id:04}")).await.unwrap();
        }

        let keys = provider.keys("*").await.unwrap();
        assert_eq!(keys.len(), 500);
        assert!(keys.windows(2).all(|pair| pair[0] < pair[1]));
        for key in &keys {
            provider.get(key).await.unwrap();
        }
    });
}

#[test]
fn prefix_and_range_scans_agree_with_lexicographic_order() {
    block_on(async {
        let provider = provider();
        let opts = WriteOptions::default();

        provider.set("orders:10", "a".to_owned(), &opts).await.unwrap();
        provider.set("orders:11", "b".to_owned(), &opts).await.unwrap();
        provider.set("orders:12", "c".to_owned(), &opts).await.unwrap();
        provider.set("users:1", "d".to_owned(), &opts).await.unwrap();

        assert_eq!(
            provider.keys("orders:*").await.unwrap(),
            vec!["orders:10", "orders:11", "orders:12"]
        );
        assert_eq!(
            provider.key_range("orders:10", "orders:11").await.unwrap(),
            vec!["orders:10", "orders:11"]
        );
        assert!(provider.key_range("users:2", "users:9").await.unwrap().is_empty());
    });
}

#[test]
fn renew_expiry_pushes_the_deadline_forward() {
    block_on(async {
        let provider = provider();
        let opts = WriteOptions::with_ttl(Duration::from_secs(300));

        provider.set("users:1", "alice".to_owned(), &opts).await.unwrap();
        let (_, before) = provider.get("users:1").await.unwrap();

        provider.renew_expiry("users:1").await.unwrap();
        let (_, after) = provider.get("users:1").await.unwrap();

        assert!(after.expires_at >= before.expires_at);
        assert!(matches!(
            provider.renew_expiry("users:404").await.unwrap_err(),
            Error::NotFound
        ));
    });
}

#[test]
fn change_sync_rewrites_only_the_sync_fields() {
    block_on(async {
        let provider = provider();
        let opts = WriteOptions {
            sync: SyncKind::Batch,
            ..WriteOptions::default()
        };

        provider.set("users:1", "alice".to_owned(), &opts).await.unwrap();
        let (_, mut item) = provider.get("users:1").await.unwrap();
        item.sync = SyncKind::None;
        item.direction = SyncDirection::None;

        provider.change_sync("users:1", &item).await.unwrap();

        let (_, updated) = provider.get("users:1").await.unwrap();
        assert_eq!(updated.sync, SyncKind::None);
        assert_eq!(updated.direction, SyncDirection::None);
        assert_eq!(updated.expires_at, item.expires_at);
    });
}

#[test]
fn mark_synced_flips_a_dirty_item_clean() {
    block_on(async {
        let provider = provider();
        let opts = WriteOptions {
            sync: SyncKind::Batch,
            ..WriteOptions::default()
        };

        provider.set("users:1", "alice".to_owned(), &opts).await.unwrap();
        provider.mark_synced("users:1").await.unwrap();

        let (_, item) = provider.get("users:1").await.unwrap();
        assert_eq!(item.direction, SyncDirection::UpdateHotStorage);
        assert!(item.last_sync.is_some());
    });
}

#[test]
fn clones_share_one_instance() {
    block_on(async {
        let provider = provider();
        let alias = provider.clone();

        provider
            .set("users:1", "alice".to_owned(), &WriteOptions::default())
            .await
            .unwrap();

        let (value, _) = alias.get("users:1").await.unwrap();
        assert_eq!(value, "alice");
    });
}
