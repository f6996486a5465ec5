//! Item store for the pourboard tally service.
//!
//! The store holds the single `items` collection. Two backends share one
//! interface through enum dispatch on [`ItemStore`]:
//!
//! ```text
//! ItemStore
//!     |
//!     +-- Postgres --> PostgresItemStore (sqlx pool, durable)
//!     |
//!     +-- Memory ----> MemoryItemStore   (RwLock<BTreeMap>, tests and demos)
//! ```
//!
//! Both backends enforce the same invariants: names are unique across
//! active and inactive items, counters never drop below zero, and nothing
//! is ever physically deleted.
//!
//! # Modules
//!
//! - [`store`] -- [`ItemStore`] dispatch plus operation outcomes
//! - [`postgres`] -- `PostgreSQL` pool configuration and queries
//! - [`memory`] -- In-process backend
//! - [`error`] -- Shared error types

pub mod error;
pub mod memory;
pub mod postgres;
pub mod store;

// Re-export primary types for convenience.
pub use error::DbError;
pub use memory::MemoryItemStore;
pub use postgres::{PostgresConfig, PostgresItemStore};
pub use store::{DeltaOutcome, ItemStore, SeedOutcome};
