pub mod protocol;
pub mod rest;
pub mod socket_speech;
pub mod state;
pub mod ws_handler;

// Re-export the handlers to make them easily accessible
// to the binary that will build the web server router.
pub use rest::{health_handler, quick_actions_handler};
pub use state::AppState;
pub use ws_handler::ws_handler;
