//! services/assistant/src/web/socket_speech.rs
//!
//! A `SpeechCapability` backed by the browser on the other end of a
//! WebSocket. Speaking means sending a `speak` frame; the client's speech
//! engine does the rest.

use crate::session::SessionController;
use crate::web::protocol::ServerMessage;
use sena_core::ports::{PortError, PortResult, SpeechCapability};
use std::sync::Weak;
use tokio::sync::mpsc;

pub struct SocketSpeech {
    outbound: mpsc::UnboundedSender<ServerMessage>,
    /// Read for the current rate and volume; weak so the capability never keeps the session alive.
    controller: Weak<SessionController>,
}

impl SocketSpeech {
    pub fn new(
        outbound: mpsc::UnboundedSender<ServerMessage>,
        controller: Weak<SessionController>,
    ) -> Self {
        Self {
            outbound,
            controller,
        }
    }
}

impl SpeechCapability for SocketSpeech {
    fn speak(&self, text: &str) -> PortResult<()> {
        let settings = self
            .controller
            .upgrade()
            .map(|controller| controller.settings())
            .unwrap_or_default();

        self.outbound
            .send(ServerMessage::Speak {
                text: text.to_string(),
                rate: settings.speech_speed,
                volume: settings.speech_volume,
            })
            .map_err(|_| PortError::Unavailable("client connection is closed".to_string()))
    }
}
