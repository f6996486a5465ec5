//! Shared type definitions for the pourboard tally service.
//!
//! This crate is the single source of truth for the shapes exchanged
//! between the store, the REST gateway, the realtime channel and the
//! browser client. Types flow downstream to `TypeScript` via `ts-rs`.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrappers for items and connections
//! - [`item`] -- The tally [`Item`], its [`Counter`] selector and name rules
//! - [`events`] -- Realtime envelopes exchanged over the `WebSocket`
//! - [`api`] -- REST request and confirmation bodies
//! - [`seed`] -- The starter list inserted into an empty store

pub mod api;
pub mod events;
pub mod ids;
pub mod item;
pub mod seed;

// Re-export all public types at crate root for convenience.
pub use api::{ItemStatusResponse, NameRequest, ResetResponse};
pub use events::{ClientEvent, CounterUpdate, ServerEvent};
pub use ids::{ConnectionId, ItemId};
pub use item::{Counter, Item, ItemName};
pub use seed::DEFAULT_ITEM_NAMES;

#[cfg(test)]
mod tests {
    //! `TypeScript` binding generation for the client.

    #[test]
    fn export_bindings() {
        // The files are written to the `bindings/` directory relative to
        // the crate root.
        use ts_rs::TS;

        let _ = crate::ids::ItemId::export_all();
        let _ = crate::item::Counter::export_all();
        let _ = crate::item::Item::export_all();
        let _ = crate::events::CounterUpdate::export_all();
        let _ = crate::events::ServerEvent::export_all();
        let _ = crate::events::ClientEvent::export_all();
        let _ = crate::api::NameRequest::export_all();
        let _ = crate::api::ResetResponse::export_all();
        let _ = crate::api::ItemStatusResponse::export_all();
    }
}
