//! REST gateway and realtime broadcaster for the pourboard tally service.
//!
//! This crate provides an Axum HTTP server that exposes:
//!
//! - **REST endpoints** under `/api/wines` to list, create, rename,
//!   deactivate, reactivate and reset tally items
//! - **`WebSocket` endpoint** (`/ws`) that pushes the full active-item
//!   snapshot to every connected client after each change, and accepts
//!   counter updates and resync requests
//!
//! # Architecture
//!
//! The server is the single source of truth. Every mutation goes through
//! the [`ItemStore`](pourboard_db::ItemStore); afterwards the active list
//! is re-read and fanned out to all clients through a
//! [`tokio::sync::broadcast`] channel held by [`AppState`]. Clients are
//! passive renderers of the latest snapshot; there is no delta merging.
//!
//! Realtime counter updates are fire-and-forget: a failed or rejected
//! update is logged on the server and never reported to the sender.

pub mod config;
pub mod error;
pub mod handlers;
pub mod router;
pub mod server;
pub mod startup;
pub mod state;
pub mod ws;

// Re-export primary types for convenience.
pub use config::{ConfigError, ServerConfig, StoreKind};
pub use error::ApiError;
pub use router::build_router;
pub use server::{ServerError, start_server};
pub use startup::{StartupError, run};
pub use state::{AppState, Snapshot};
