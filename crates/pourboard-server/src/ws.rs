//! `WebSocket` handler for the realtime tally channel.
//!
//! Clients connect to `GET /ws`. On connect the client receives the
//! current active snapshot; afterwards it receives a fresh snapshot
//! whenever any client or REST call changes the board. Frames are JSON
//! [`ServerEvent`] / [`ClientEvent`] envelopes.
//!
//! Inbound counter updates are fire-and-forget: unknown items, updates
//! that would take a counter below zero, malformed frames and store
//! failures are logged and otherwise ignored. The sender is never told.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::IntoResponse;
use pourboard_db::DeltaOutcome;
use pourboard_types::{ClientEvent, ConnectionId, CounterUpdate, Item, ServerEvent};
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, error, info, warn};

use crate::state::AppState;

/// Upgrade an HTTP request to a `WebSocket` connection and join the
/// snapshot broadcast.
///
/// # Route
///
/// `GET /ws`
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_ws(socket, state))
}

/// Handle the `WebSocket` lifecycle: send the initial snapshot, then
/// forward broadcasts and serve inbound messages until the client leaves.
async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
    let connection_id = ConnectionId::new();

    // Subscribe before reading so a change racing the initial read is
    // still delivered afterwards.
    let mut rx = state.subscribe();
    info!(%connection_id, clients = state.client_count(), "Client connected");

    match state.snapshot().await {
        Ok(items) => {
            debug!(%connection_id, count = items.len(), "Sending initial snapshot");
            if send_snapshot(&mut socket, items).await.is_err() {
                debug!(%connection_id, "Client disconnected (send failed)");
                return;
            }
        }
        Err(e) => error!(%connection_id, error = %e, "Failed to read initial snapshot"),
    }

    loop {
        tokio::select! {
            // A snapshot broadcast caused by any client or REST call.
            result = rx.recv() => {
                match result {
                    Ok(snapshot) => {
                        if send_snapshot(&mut socket, snapshot.to_vec()).await.is_err() {
                            debug!(%connection_id, "Client disconnected (send failed)");
                            break;
                        }
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        debug!(%connection_id, skipped, "Client lagged, oldest snapshots dropped");
                    }
                    Err(RecvError::Closed) => {
                        debug!(%connection_id, "Broadcast channel closed");
                        break;
                    }
                }
            }
            msg = socket.recv() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        let reply = handle_frame(&state, connection_id, text.as_str()).await;
                        if let Some(items) = reply {
                            if send_snapshot(&mut socket, items).await.is_err() {
                                debug!(%connection_id, "Client disconnected (reply failed)");
                                break;
                            }
                        }
                    }
                    Some(Ok(Message::Ping(data))) => {
                        if socket.send(Message::Pong(data)).await.is_err() {
                            debug!(%connection_id, "Client disconnected (pong failed)");
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(e)) => {
                        debug!(%connection_id, error = %e, "WebSocket error");
                        break;
                    }
                    Some(Ok(_)) => {
                        // Binary and pong frames carry nothing for us.
                    }
                }
            }
        }
    }

    info!(%connection_id, "Client disconnected");
}

/// Serialize and send one `wines-updated` frame.
async fn send_snapshot(socket: &mut WebSocket, items: Vec<Item>) -> Result<(), axum::Error> {
    let json = match serde_json::to_string(&ServerEvent::WinesUpdated(items)) {
        Ok(j) => j,
        Err(e) => {
            warn!("Failed to serialize snapshot: {e}");
            return Ok(());
        }
    };
    socket.send(Message::Text(json.into())).await
}

/// Process one inbound text frame. Returns a snapshot to send back to
/// this client only, if the frame asked for one.
async fn handle_frame(
    state: &AppState,
    connection_id: ConnectionId,
    text: &str,
) -> Option<Vec<Item>> {
    let event = match serde_json::from_str::<ClientEvent>(text) {
        Ok(event) => event,
        Err(e) => {
            warn!(%connection_id, error = %e, "Ignoring malformed frame");
            return None;
        }
    };

    match event {
        ClientEvent::UpdateWine(update) => {
            debug!(
                %connection_id,
                item_id = %update.item_id,
                counter = %update.counter,
                amount = update.amount,
                "Received counter update"
            );
            apply_counter_update(state, update).await;
            None
        }
        ClientEvent::RequestSync => {
            debug!(%connection_id, "Client requested resync");
            match state.snapshot().await {
                Ok(items) => Some(items),
                Err(e) => {
                    error!(%connection_id, error = %e, "Failed to read snapshot for resync");
                    None
                }
            }
        }
    }
}

/// Apply a counter update and, if it was written, broadcast the new
/// active snapshot to every client.
///
/// Returns the updated item when the delta was applied. All other
/// outcomes, including store failures, are logged and yield `None`.
pub async fn apply_counter_update(state: &AppState, update: CounterUpdate) -> Option<Item> {
    let CounterUpdate {
        item_id,
        counter,
        amount,
    } = update;

    match state.store.apply_delta(item_id, counter, amount).await {
        Ok(DeltaOutcome::Applied(item)) => {
            info!(
                %item_id,
                name = item.name,
                %counter,
                value = item.count(counter),
                "Counter updated"
            );
            state.notify("counter update").await;
            Some(item)
        }
        Ok(DeltaOutcome::Rejected(item)) => {
            info!(
                %item_id,
                name = item.name,
                %counter,
                amount,
                value = item.count(counter),
                "Ignoring update that would take counter below zero"
            );
            None
        }
        Ok(DeltaOutcome::NotFound) => {
            warn!(%item_id, "Ignoring update for unknown item");
            None
        }
        Err(e) => {
            error!(%item_id, error = %e, "Failed to apply counter update");
            None
        }
    }
}
