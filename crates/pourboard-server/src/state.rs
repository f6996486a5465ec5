//! Shared application state and the snapshot broadcaster.
//!
//! [`AppState`] holds the item store and the broadcast channel that fans
//! snapshots of the active items out to every connected `WebSocket`
//! client. It is built once at startup and handed to the router, so
//! tests can substitute an in-memory store.

use std::sync::Arc;

use pourboard_db::{DbError, ItemStore};
use pourboard_types::Item;
use tokio::sync::broadcast;

/// Capacity of the broadcast channel for snapshots.
///
/// A subscriber that falls further behind receives
/// [`broadcast::error::RecvError::Lagged`], loses the oldest snapshots and
/// resumes from the oldest one still retained. Every snapshot is the full
/// active list, so the dropped ones carry nothing the later ones lack.
const BROADCAST_CAPACITY: usize = 64;

/// The full list of active items, sorted by name, shared between all
/// connection tasks.
pub type Snapshot = Arc<[Item]>;

/// Shared state for the Axum application.
///
/// Wrapped in [`Arc`] and injected via Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    /// The item collection.
    pub store: ItemStore,
    tx: broadcast::Sender<Snapshot>,
}

impl AppState {
    /// Create a new application state over `store`.
    pub fn new(store: ItemStore) -> Self {
        let (tx, _) = broadcast::channel(BROADCAST_CAPACITY);
        Self { store, tx }
    }

    /// Subscribe to snapshot broadcasts.
    pub fn subscribe(&self) -> broadcast::Receiver<Snapshot> {
        self.tx.subscribe()
    }

    /// Number of connected realtime clients.
    pub fn client_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Read the current active-item snapshot from the store.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the store fails.
    pub async fn snapshot(&self) -> Result<Vec<Item>, DbError> {
        self.store.list_active().await
    }

    /// Push `items` to all connected clients.
    ///
    /// Returns the number of receivers that received the snapshot.
    /// Returns 0 if no clients are connected (this is not an error).
    pub fn broadcast(&self, items: impl Into<Snapshot>) -> usize {
        // send returns Err only when there are zero receivers.
        self.tx.send(items.into()).unwrap_or(0)
    }

    /// Re-read the active items and push them to all connected clients.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the store fails; nothing is sent then.
    pub async fn publish_active(&self) -> Result<usize, DbError> {
        let items = self.snapshot().await?;
        let receivers = self.broadcast(items);
        tracing::debug!(receivers, "Broadcast active snapshot");
        Ok(receivers)
    }

    /// [`publish_active`](Self::publish_active) for callers whose own
    /// result must not depend on the broadcast: failures are logged only.
    pub async fn notify(&self, reason: &'static str) {
        if let Err(e) = self.publish_active().await {
            tracing::error!(error = %e, reason, "Failed to broadcast active snapshot");
        }
    }
}

#[cfg(test)]
mod tests {
    use pourboard_db::MemoryItemStore;

    use super::*;

    #[tokio::test]
    async fn broadcast_without_clients_is_not_an_error() {
        let state = AppState::new(ItemStore::from(MemoryItemStore::new()));
        assert_eq!(state.client_count(), 0);
        assert_eq!(state.broadcast(Vec::new()), 0);
    }

    #[tokio::test]
    async fn publish_reaches_every_subscriber() {
        let state = AppState::new(ItemStore::from(MemoryItemStore::new()));
        let _ = state.store.ensure_seeded().await;
        let mut first = state.subscribe();
        let mut second = state.subscribe();
        assert_eq!(state.client_count(), 2);

        let receivers = state.publish_active().await.ok();
        assert_eq!(receivers, Some(2));

        let a = first.recv().await.ok().map(|s| s.len());
        let b = second.recv().await.ok().map(|s| s.len());
        assert_eq!(a, Some(10));
        assert_eq!(b, Some(10));
    }

    #[tokio::test]
    async fn lagging_subscriber_resumes_from_oldest_retained() {
        let state = AppState::new(ItemStore::from(MemoryItemStore::new()));
        let mut rx = state.subscribe();

        let _ = state.store.ensure_seeded().await;
        let Ok(seeded) = state.snapshot().await else {
            panic!("memory store failed");
        };
        let item = seeded[0].clone();

        // Snapshot length marks the publish order: 1, 2, ..., total.
        let total = BROADCAST_CAPACITY + 10;
        for n in 1..=total {
            state.broadcast(vec![item.clone(); n]);
        }

        assert!(matches!(
            rx.recv().await,
            Err(broadcast::error::RecvError::Lagged(10))
        ));

        let mut lengths = Vec::new();
        while let Ok(snapshot) = rx.try_recv() {
            lengths.push(snapshot.len());
        }
        let expected: Vec<usize> = (11..=total).collect();
        assert_eq!(lengths, expected);
    }

    #[tokio::test]
    async fn publish_failure_sends_nothing() {
        let memory = MemoryItemStore::new();
        let state = AppState::new(ItemStore::from(memory.clone()));
        let mut rx = state.subscribe();
        memory.set_unavailable(true);

        assert!(state.publish_active().await.is_err());
        state.notify("test").await;
        assert!(rx.try_recv().is_err());
    }
}
