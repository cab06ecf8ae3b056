//! services/assistant/src/session/message_log.rs
//!
//! The ordered, append-only conversation log.

use sena_core::{Message, MessageId};

/// Append-only message sequence. Replaced wholesale by [`MessageLog::reset`].
#[derive(Debug, Clone, Default)]
pub struct MessageLog {
    messages: Vec<Message>,
}

impl MessageLog {
    /// A log holding just the bot-authored `greeting`.
    pub fn with_greeting(greeting: &str) -> Self {
        Self {
            messages: vec![Message::bot(greeting)],
        }
    }

    /// Appends a new message with a fresh id and returns the stored entry.
    pub fn append(&mut self, text: impl Into<String>, is_bot: bool) -> &Message {
        self.messages.push(Message::new(text, is_bot));
        let last = self.messages.len() - 1;
        &self.messages[last]
    }

    /// Throws away the whole conversation and starts over with `greeting`.
    pub fn reset(&mut self, greeting: &str) {
        self.messages = vec![Message::bot(greeting)];
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn get(&self, id: MessageId) -> Option<&Message> {
        self.messages.iter().find(|m| m.id == id)
    }

    pub(crate) fn len(&self) -> usize {
        self.messages.len()
    }
}
