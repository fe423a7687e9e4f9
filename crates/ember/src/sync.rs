// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! The background reconciliation scheduler.
//!
//! One task per cache, started at construction when a positive batch
//! interval is configured. Each tick walks every live key and converges it
//! with the persistent source: dirty items are pushed through the committer
//! and flip clean on success, clean items are refreshed through the getter,
//! and items the upstream no longer knows are evicted. Transient failures
//! leave an item untouched for the next tick.

use std::{sync::Arc, time::Duration};

use ember_provider::Provider;
use tokio::{sync::watch, task::JoinHandle};

use crate::{
    cache::Inner,
    source::{Committer, Getter},
};

/// Owns the scheduler task and its shutdown signal.
pub(crate) struct SyncHandle {
    stop: watch::Sender<bool>,
    task: Option<JoinHandle<()>>,
}

impl SyncHandle {
    /// Spawns the reconciliation loop onto the current Tokio runtime.
    pub(crate) fn spawn<V, P, G, C>(inner: Arc<Inner<V, P, G, C>>, every: Duration) -> Self
    where
        V: Clone + Send + Sync + 'static,
        P: Provider<V> + 'static,
        G: Getter<V> + 'static,
        C: Committer<V> + 'static,
    {
        let (stop, stopped) = watch::channel(false);
        let task = tokio::spawn(run(inner, every, stopped));
        Self {
            stop,
            task: Some(task),
        }
    }

    /// Signals the task to stop and waits for it to exit.
    pub(crate) async fn shutdown(mut self) {
        let _ = self.stop.send(true);
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl Drop for SyncHandle {
    fn drop(&mut self) {
        let _ = self.stop.send(true);
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

/// The loop body. The first tick fires after a full interval, and shutdown
/// is honored both mid-wait and between ticks.
async fn run<V, P, G, C>(inner: Arc<Inner<V, P, G, C>>, every: Duration, mut stopped: watch::Receiver<bool>)
where
    V: Clone + Send + Sync + 'static,
    P: Provider<V> + 'static,
    G: Getter<V> + 'static,
    C: Committer<V> + 'static,
{
    loop {
        tokio::select! {
            () = tokio::time::sleep(every) => {}
            _ = stopped.changed() => {
                tracing::debug!("reconciliation scheduler stopped");
                return;
            }
        }
        inner.reconcile_tick().await;
    }
}
