//! Process startup: connect the store, seed it, and serve.
//!
//! Failure to reach the store is fatal. There is no retry loop; the
//! error is returned to `main`, which exits non-zero.

use std::sync::Arc;

use pourboard_db::{DbError, ItemStore, MemoryItemStore, PostgresItemStore};

use crate::config::{ConfigError, ServerConfig, StoreKind};
use crate::server::{self, ServerError};
use crate::state::AppState;

/// Errors that abort startup or end the server.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    /// Configuration is incomplete or invalid.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// The store could not be reached or prepared.
    #[error("store error: {0}")]
    Store(#[from] DbError),

    /// The server failed to bind or serve.
    #[error("server error: {0}")]
    Server(#[from] ServerError),
}

/// Open the configured store backend.
///
/// # Errors
///
/// Returns [`StartupError`] if the configuration is incomplete or the
/// `PostgreSQL` connection or migration fails.
pub async fn connect_store(config: &ServerConfig) -> Result<ItemStore, StartupError> {
    let store = match config.store {
        StoreKind::Postgres => {
            let pg = config.postgres_config()?;
            ItemStore::from(PostgresItemStore::connect(&pg).await?)
        }
        StoreKind::Memory => {
            tracing::warn!("Using in-memory store; counts are lost on restart");
            ItemStore::from(MemoryItemStore::new())
        }
    };
    Ok(store)
}

/// Run the service until `Ctrl-C`.
///
/// # Errors
///
/// Returns [`StartupError`] on any fatal startup or serving failure.
pub async fn run(config: ServerConfig) -> Result<(), StartupError> {
    let store = connect_store(&config).await?;
    tracing::info!(backend = store.name(), "Item store ready");

    store.ensure_seeded().await?;

    let state = Arc::new(AppState::new(store.clone()));
    let result = server::start_server(&config, state, server::ctrl_c()).await;

    store.close().await;
    result.map_err(StartupError::from)
}
