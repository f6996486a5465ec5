//! Backend-independent item store interface.
//!
//! [`ItemStore`] uses enum dispatch instead of a trait object because
//! async methods are not dyn-compatible. Handlers hold one `ItemStore`
//! and never know which backend is behind it.

use pourboard_types::{Counter, Item, ItemId, ItemName};

use crate::error::DbError;
use crate::memory::MemoryItemStore;
use crate::postgres::PostgresItemStore;

/// Result of [`ItemStore::apply_delta`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeltaOutcome {
    /// The delta was written. Carries the item after the change.
    Applied(Item),
    /// The delta would have taken the counter below zero (or out of
    /// range) and nothing was written. Carries the unchanged item.
    Rejected(Item),
    /// No item has this id.
    NotFound,
}

/// Result of [`ItemStore::ensure_seeded`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    /// The store was empty and the default list was inserted.
    Seeded(usize),
    /// The store already had items; legacy rows missing `active` were
    /// set to `true`.
    Existing {
        /// Number of items in the store.
        total: u64,
        /// Number of rows whose `active` flag was backfilled.
        backfilled: u64,
    },
}

/// The item collection, backed by `PostgreSQL` or by memory.
#[derive(Clone)]
pub enum ItemStore {
    /// Durable `PostgreSQL` backend.
    Postgres(PostgresItemStore),
    /// In-process backend.
    Memory(MemoryItemStore),
}

impl ItemStore {
    /// Insert the default items into an empty store, or backfill the
    /// `active` flag on an existing one. Safe to call on every startup.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the backend fails.
    pub async fn ensure_seeded(&self) -> Result<SeedOutcome, DbError> {
        let outcome = match self {
            Self::Postgres(store) => store.ensure_seeded().await,
            Self::Memory(store) => store.ensure_seeded().await,
        }?;

        match outcome {
            SeedOutcome::Seeded(count) => {
                tracing::info!(count, "Store was empty, default items inserted");
            }
            SeedOutcome::Existing { total, backfilled } => {
                tracing::info!(total, backfilled, "Store already populated");
            }
        }
        Ok(outcome)
    }

    /// Active items sorted by name.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the backend fails.
    pub async fn list_active(&self) -> Result<Vec<Item>, DbError> {
        match self {
            Self::Postgres(store) => store.list_active().await,
            Self::Memory(store) => store.list_active().await,
        }
    }

    /// Every item, active or not, sorted by name.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the backend fails.
    pub async fn list_all(&self) -> Result<Vec<Item>, DbError> {
        match self {
            Self::Postgres(store) => store.list_all().await,
            Self::Memory(store) => store.list_all().await,
        }
    }

    /// Fetch one item by id.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the backend fails.
    pub async fn get(&self, id: ItemId) -> Result<Option<Item>, DbError> {
        match self {
            Self::Postgres(store) => store.get(id).await,
            Self::Memory(store) => store.get(id).await,
        }
    }

    /// Find the item carrying exactly `name`, ignoring `excluding`.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the backend fails.
    pub async fn find_by_name(
        &self,
        name: &ItemName,
        excluding: Option<ItemId>,
    ) -> Result<Option<Item>, DbError> {
        match self {
            Self::Postgres(store) => store.find_by_name(name, excluding).await,
            Self::Memory(store) => store.find_by_name(name, excluding).await,
        }
    }

    /// Insert a new active item with both counters at zero.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::DuplicateName`] if the name is taken, or
    /// another [`DbError`] if the backend fails.
    pub async fn insert(&self, name: ItemName) -> Result<Item, DbError> {
        match self {
            Self::Postgres(store) => store.insert(name).await,
            Self::Memory(store) => store.insert(name).await,
        }
    }

    /// Zero both counters on every active item. Returns the number of
    /// items touched.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the backend fails.
    pub async fn reset_active(&self) -> Result<u64, DbError> {
        match self {
            Self::Postgres(store) => store.reset_active().await,
            Self::Memory(store) => store.reset_active().await,
        }
    }

    /// Rename an item. `None` if the id is unknown.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::DuplicateName`] if another item has the name.
    pub async fn rename(&self, id: ItemId, name: ItemName) -> Result<Option<Item>, DbError> {
        match self {
            Self::Postgres(store) => store.rename(id, name).await,
            Self::Memory(store) => store.rename(id, name).await,
        }
    }

    /// Set the `active` flag. `None` if the id is unknown.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the backend fails.
    pub async fn set_active(&self, id: ItemId, active: bool) -> Result<Option<Item>, DbError> {
        match self {
            Self::Postgres(store) => store.set_active(id, active).await,
            Self::Memory(store) => store.set_active(id, active).await,
        }
    }

    /// Add `delta` to one counter unless the result would be negative.
    ///
    /// The floor check and the write are a single atomic step in both
    /// backends, so concurrent decrements cannot push a counter below zero.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the backend fails.
    pub async fn apply_delta(
        &self,
        id: ItemId,
        counter: Counter,
        delta: i64,
    ) -> Result<DeltaOutcome, DbError> {
        match self {
            Self::Postgres(store) => store.apply_delta(id, counter, delta).await,
            Self::Memory(store) => store.apply_delta(id, counter, delta).await,
        }
    }

    /// Release backend resources.
    pub async fn close(&self) {
        if let Self::Postgres(store) = self {
            store.close().await;
        }
    }

    /// Human-readable backend name for logging.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Postgres(_) => "postgres",
            Self::Memory(_) => "memory",
        }
    }
}

impl From<PostgresItemStore> for ItemStore {
    fn from(store: PostgresItemStore) -> Self {
        Self::Postgres(store)
    }
}

impl From<MemoryItemStore> for ItemStore {
    fn from(store: MemoryItemStore) -> Self {
        Self::Memory(store)
    }
}
