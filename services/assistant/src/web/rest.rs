//! services/assistant/src/web/rest.rs
//!
//! Contains the Axum handlers for the small REST surface next to the WebSocket.

use axum::response::Json;
use sena_core::{QuickAction, QUICK_ACTIONS};

/// Liveness probe.
pub async fn health_handler() -> &'static str {
    "ok"
}

/// The fixed quick-action catalog, in display order.
pub async fn quick_actions_handler() -> Json<&'static [QuickAction]> {
    Json(QUICK_ACTIONS)
}
