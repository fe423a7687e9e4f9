// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Write-back with background reconciliation.
//!
//! Batch-synced writes land in hot storage immediately and are pushed to
//! the committer by the scheduler on its next tick.

use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use ember::{Cache, Committer, SourceError, SyncKind, WriteOptions};

/// Records every commit it receives.
#[derive(Default)]
struct Ledger {
    saved: Mutex<Vec<(String, String)>>,
}

impl Committer<String> for Ledger {
    async fn save(&self, key: &str, value: &String) -> Result<(), SourceError> {
        self.saved.lock().unwrap().push((key.to_owned(), value.clone()));
        Ok(())
    }

    async fn delete(&self, _key: &str) -> Result<(), SourceError> {
        Ok(())
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), ember::Error> {
    let ledger = Arc::new(Ledger::default());
    let cache = Cache::builder::<String>()
        .memory()
        .committer(Arc::clone(&ledger))
        .sync_every(Duration::from_millis(100))
        .build();

    let write = WriteOptions {
        sync: SyncKind::Batch,
        ..WriteOptions::default()
    };
    cache.set_with("orders:1", "pending".to_owned(), &write, true).await?;
    println!("committed immediately: {:?}", ledger.saved.lock().unwrap());

    tokio::time::sleep(Duration::from_millis(250)).await;
    println!("committed after a tick: {:?}", ledger.saved.lock().unwrap());

    cache.close().await;
    Ok(())
}
