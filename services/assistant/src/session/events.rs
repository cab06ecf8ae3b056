//! services/assistant/src/session/events.rs
//!
//! Notifications published by the session controller for outer surfaces.

use sena_core::{AccessibilitySettings, Message, SessionUiState};

#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    ConsentAccepted,
    MessageAppended(Message),
    /// The log was replaced wholesale; carries the new contents.
    ConversationReset(Vec<Message>),
    TypingChanged(bool),
    SettingsChanged(AccessibilitySettings),
    /// Dark mode or panel visibility changed.
    UiChanged(SessionUiState),
}
