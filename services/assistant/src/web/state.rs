//! services/assistant/src/web/state.rs
//!
//! Defines the application state shared by every connection.

use crate::config::Config;
use sena_core::ports::{ConsentStore, ResponseResolver};
use std::sync::Arc;

/// The shared application state, created once at startup and passed to all handlers.
///
/// Each WebSocket connection builds its own `SessionController` on top of these.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub resolver: Arc<dyn ResponseResolver>,
    pub consent_store: Arc<dyn ConsentStore>,
}
