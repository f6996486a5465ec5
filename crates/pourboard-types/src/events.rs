//! Realtime envelopes exchanged over the `WebSocket`.
//!
//! Every frame is a JSON text message of the form
//! `{"event": "<name>", "data": <payload>}`. The event names are kept
//! from the browser client: `wines-updated` flows server to client,
//! `update-wine` and `request-sync` flow client to server.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::ids::ItemId;
use crate::item::{Counter, Item};

/// A message pushed from the server to a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
#[ts(export, export_to = "bindings/")]
pub enum ServerEvent {
    /// Full snapshot of the active items, sorted by name.
    WinesUpdated(Vec<Item>),
}

/// A message sent from a client to the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
#[ts(export, export_to = "bindings/")]
pub enum ClientEvent {
    /// Apply a signed delta to one counter of one item.
    UpdateWine(CounterUpdate),
    /// Ask for the current snapshot, delivered to the sender only.
    RequestSync,
}

/// Payload of [`ClientEvent::UpdateWine`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct CounterUpdate {
    /// Target item.
    pub item_id: ItemId,
    /// Which counter to change.
    #[serde(rename = "type")]
    pub counter: Counter,
    /// Signed delta, normally `1` or `-1`.
    #[ts(type = "number")]
    pub amount: i64,
}
