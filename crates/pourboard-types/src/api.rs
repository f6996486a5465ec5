//! REST request and confirmation bodies.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::item::Item;

/// Body of `POST /api/wines` and `PUT /api/wines/{id}`.
///
/// `name` is optional so that a missing field reaches validation and is
/// reported like a blank one instead of as a JSON rejection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct NameRequest {
    /// Requested item name, trimmed before use.
    #[serde(default)]
    pub name: Option<String>,
}

/// Confirmation returned by `POST /api/wines/reset`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ResetResponse {
    /// Human-readable confirmation.
    pub message: String,
    /// Active items after the reset.
    pub wines: Vec<Item>,
}

/// Confirmation returned when an item is deactivated or reactivated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ItemStatusResponse {
    /// Human-readable confirmation.
    pub message: String,
    /// The item after the change.
    pub wine: Item,
}
