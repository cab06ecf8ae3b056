//! services/assistant/src/web/protocol.rs
//!
//! Defines the WebSocket message protocol between the browser client and the
//! assistant server. Every frame is a JSON text frame tagged by `type`.

use crate::adapters::StyleChange;
use crate::session::{KeyEvent, KeyOutcome, SessionError, SessionEvent, SessionSnapshot};
use sena_core::{AccessibilitySettings, Message, MessageId, Panel, SessionUiState, SettingsPatch};
use serde::{Deserialize, Serialize};

//=========================================================================================
// Messages Sent FROM the Client (Browser) TO the Server
//=========================================================================================

/// Represents the structured text messages a client can send to the server.
#[derive(Deserialize, Debug)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// The user acknowledged the welcome screen.
    AcceptConsent,

    /// Free text typed by the user.
    SendMessage { text: String },

    /// One of the quick-action buttons was pressed.
    QuickAction { action_id: String },

    UpdateSettings { patch: SettingsPatch },

    /// A raw key press, forwarded for shortcut handling.
    KeyDown(KeyEvent),

    ToggleDarkMode,
    ToggleTts,
    NewConversation,
    SpeakMessage { message_id: MessageId },
    OpenPanel { panel: Panel },
    ClosePanel { panel: Panel },

    /// The client can speak text aloud; `speak` frames will follow.
    RegisterSpeech,
    UnregisterSpeech,
}

//=========================================================================================
// Messages Sent FROM the Server TO the Client (Browser)
//=========================================================================================

/// Represents the structured text messages the server can send to the client.
#[derive(Serialize, Debug, Clone)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// The complete render state. Sent on connect, after consent, and after a resync.
    Snapshot(SessionSnapshot),

    /// The welcome screen must be shown before anything else.
    ConsentRequired,

    MessageAppended { message: Message },
    TypingChanged { is_typing: bool },
    SettingsChanged { settings: AccessibilitySettings },
    UiChanged { ui: SessionUiState },
    ConversationReset { messages: Vec<Message> },

    /// Set a root style variable, or remove it when `value` is absent.
    StyleProperty {
        name: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        value: Option<String>,
    },
    StyleMarker { name: String, enabled: bool },

    /// Speak `text` aloud with the given rate and volume.
    Speak { text: String, rate: f32, volume: f32 },

    KeyResult { handled: bool, prevent_default: bool },

    /// Reports a rejected or malformed request.
    Error { message: String },
}

impl ServerMessage {
    /// Maps a session event onto its frame. `ConsentAccepted` has no frame of
    /// its own; the connection answers it with a fresh snapshot.
    pub fn from_event(event: SessionEvent) -> Option<Self> {
        let message = match event {
            SessionEvent::ConsentAccepted => return None,
            SessionEvent::MessageAppended(message) => ServerMessage::MessageAppended { message },
            SessionEvent::ConversationReset(messages) => {
                ServerMessage::ConversationReset { messages }
            }
            SessionEvent::TypingChanged(is_typing) => ServerMessage::TypingChanged { is_typing },
            SessionEvent::SettingsChanged(settings) => ServerMessage::SettingsChanged { settings },
            SessionEvent::UiChanged(ui) => ServerMessage::UiChanged { ui },
        };
        Some(message)
    }

    pub fn error(err: &SessionError) -> Self {
        ServerMessage::Error {
            message: err.to_string(),
        }
    }
}

impl From<&StyleChange> for ServerMessage {
    fn from(change: &StyleChange) -> Self {
        match change {
            StyleChange::Property { name, value } => ServerMessage::StyleProperty {
                name: name.clone(),
                value: value.clone(),
            },
            StyleChange::Marker { name, enabled } => ServerMessage::StyleMarker {
                name: name.clone(),
                enabled: *enabled,
            },
        }
    }
}

impl From<KeyOutcome> for ServerMessage {
    fn from(outcome: KeyOutcome) -> Self {
        ServerMessage::KeyResult {
            handled: outcome.handled,
            prevent_default: outcome.prevent_default,
        }
    }
}
