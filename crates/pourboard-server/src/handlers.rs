//! REST API endpoint handlers.
//!
//! Every handler talks to the [`ItemStore`](pourboard_db::ItemStore)
//! through the shared [`AppState`]. Mutations that change what the tally
//! view shows re-broadcast the active snapshot to all realtime clients;
//! the HTTP response is the caller's own confirmation and does not
//! depend on that broadcast succeeding.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/api/wines` | Active items sorted by name |
//! | `GET` | `/api/wines/admin` | All items sorted by name |
//! | `POST` | `/api/wines` | Create an item |
//! | `POST` | `/api/wines/reset` | Zero the counters of all active items |
//! | `PUT` | `/api/wines/{id}` | Rename an item |
//! | `DELETE` | `/api/wines/{id}` | Deactivate (soft-delete) an item |
//! | `PUT` | `/api/wines/{id}/reactivate` | Reactivate an item |

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use pourboard_types::{Item, ItemId, ItemName, ItemStatusResponse, NameRequest, ResetResponse};

use crate::error::{ApiError, ITEM_NOT_FOUND, NAME_REQUIRED, NAME_TAKEN};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

/// Extract a validated name from a `{ "name": ... }` body.
///
/// A malformed body, a missing field and a blank value are all reported
/// the same way.
fn required_name(body: Result<Json<NameRequest>, JsonRejection>) -> Result<ItemName, ApiError> {
    body.ok()
        .and_then(|Json(request)| request.name)
        .as_deref()
        .and_then(ItemName::parse)
        .ok_or_else(|| ApiError::Validation(String::from(NAME_REQUIRED)))
}

/// Parse an item id from the request path. Ids that are not UUIDs
/// cannot exist, so they are reported as not found.
fn item_id(raw: &str) -> Result<ItemId, ApiError> {
    raw.parse::<ItemId>().ok().ok_or_else(not_found)
}

fn not_found() -> ApiError {
    ApiError::NotFound(String::from(ITEM_NOT_FOUND))
}

// ---------------------------------------------------------------------------
// Reads
// ---------------------------------------------------------------------------

/// `GET /api/wines` -- active items sorted by name.
pub async fn list_active(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Item>>, ApiError> {
    Ok(Json(state.store.list_active().await?))
}

/// `GET /api/wines/admin` -- every item, active or not, sorted by name.
pub async fn list_all(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Item>>, ApiError> {
    Ok(Json(state.store.list_all().await?))
}

// ---------------------------------------------------------------------------
// Mutations
// ---------------------------------------------------------------------------

/// `POST /api/wines` -- create an item with both counters at zero.
pub async fn create(
    State(state): State<Arc<AppState>>,
    body: Result<Json<NameRequest>, JsonRejection>,
) -> Result<Json<Item>, ApiError> {
    let name = required_name(body)?;

    if state.store.find_by_name(&name, None).await?.is_some() {
        return Err(ApiError::Validation(String::from(NAME_TAKEN)));
    }

    let item = state.store.insert(name).await?;
    tracing::info!(item_id = %item.id, name = item.name, "Item created");

    state.notify("create").await;
    Ok(Json(item))
}

/// `POST /api/wines/reset` -- zero both counters on every active item.
pub async fn reset(State(state): State<Arc<AppState>>) -> Result<Json<ResetResponse>, ApiError> {
    let touched = state.store.reset_active().await?;
    let wines = state.store.list_active().await?;
    tracing::info!(touched, "Counters reset");

    state.broadcast(wines.clone());
    Ok(Json(ResetResponse {
        message: String::from("Counters reset"),
        wines,
    }))
}

/// `PUT /api/wines/{id}` -- rename an item.
///
/// The snapshot is re-broadcast only when the item is active, since
/// inactive items are not on anyone's tally view.
pub async fn rename(
    State(state): State<Arc<AppState>>,
    Path(raw_id): Path<String>,
    body: Result<Json<NameRequest>, JsonRejection>,
) -> Result<Json<Item>, ApiError> {
    let name = required_name(body)?;
    let id = item_id(&raw_id)?;

    if state.store.find_by_name(&name, Some(id)).await?.is_some() {
        return Err(ApiError::Validation(String::from(NAME_TAKEN)));
    }

    let item = state.store.rename(id, name).await?.ok_or_else(not_found)?;
    tracing::info!(item_id = %item.id, name = item.name, "Item renamed");

    if item.active {
        state.notify("rename").await;
    }
    Ok(Json(item))
}

/// `DELETE /api/wines/{id}` -- soft-delete an item.
pub async fn deactivate(
    State(state): State<Arc<AppState>>,
    Path(raw_id): Path<String>,
) -> Result<Json<ItemStatusResponse>, ApiError> {
    set_active(&state, &raw_id, false, "Item deactivated").await
}

/// `PUT /api/wines/{id}/reactivate` -- restore a soft-deleted item with
/// its counters as they were.
pub async fn reactivate(
    State(state): State<Arc<AppState>>,
    Path(raw_id): Path<String>,
) -> Result<Json<ItemStatusResponse>, ApiError> {
    set_active(&state, &raw_id, true, "Item reactivated").await
}

async fn set_active(
    state: &AppState,
    raw_id: &str,
    active: bool,
    message: &'static str,
) -> Result<Json<ItemStatusResponse>, ApiError> {
    let id = item_id(raw_id)?;
    let wine = state
        .store
        .set_active(id, active)
        .await?
        .ok_or_else(not_found)?;
    tracing::info!(item_id = %wine.id, active, "{message}");

    state.notify(message).await;
    Ok(Json(ItemStatusResponse {
        message: String::from(message),
        wine,
    }))
}
