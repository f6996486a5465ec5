//! Axum router construction.
//!
//! Assembles all routes (REST + `WebSocket`) into a single [`Router`]
//! with CORS and request tracing middleware.

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post, put};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;
use crate::ws;

/// Build the complete Axum router.
///
/// The router includes:
/// - `GET /ws` -- realtime snapshot channel
/// - `GET /api/wines` -- active items
/// - `POST /api/wines` -- create item
/// - `GET /api/wines/admin` -- all items
/// - `POST /api/wines/reset` -- reset active counters
/// - `PUT /api/wines/{id}` -- rename
/// - `DELETE /api/wines/{id}` -- deactivate
/// - `PUT /api/wines/{id}/reactivate` -- reactivate
///
/// CORS allows any origin; the browser client is served from elsewhere.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // WebSocket
        .route("/ws", get(ws::ws_handler))
        // REST API
        .route(
            "/api/wines",
            get(handlers::list_active).post(handlers::create),
        )
        .route("/api/wines/admin", get(handlers::list_all))
        .route("/api/wines/reset", post(handlers::reset))
        .route(
            "/api/wines/{id}",
            put(handlers::rename).delete(handlers::deactivate),
        )
        .route("/api/wines/{id}/reactivate", put(handlers::reactivate))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
