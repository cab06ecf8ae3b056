//! services/assistant/src/session/keyboard.rs
//!
//! Global keyboard shortcuts for a mounted session.
//!
//! | Keys              | Effect                              |
//! |-------------------|-------------------------------------|
//! | `Escape`          | close the accessibility panel, if open |
//! | `Ctrl/Cmd+Enter`  | start a new conversation            |
//! | `F1`              | open the accessibility panel (default suppressed) |
//!
//! Every other key passes through untouched.

use crate::session::controller::SessionController;
use sena_core::Panel;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

/// A key-down event as reported by the presentation layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEvent {
    pub key: String,
    #[serde(default)]
    pub ctrl: bool,
    #[serde(default)]
    pub meta: bool,
    #[serde(default)]
    pub shift: bool,
    #[serde(default)]
    pub alt: bool,
}

#[cfg(test)]
impl KeyEvent {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Default::default()
        }
    }

    pub fn with_ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    pub fn with_meta(mut self) -> Self {
        self.meta = true;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shortcut {
    CloseAccessibilityPanel,
    NewConversation,
    OpenAccessibilityPanel,
}

impl Shortcut {
    /// Maps a key event onto the shortcut table.
    pub fn from_event(event: &KeyEvent) -> Option<Self> {
        match event.key.as_str() {
            "Escape" => Some(Shortcut::CloseAccessibilityPanel),
            "Enter" if event.ctrl || event.meta => Some(Shortcut::NewConversation),
            "F1" => Some(Shortcut::OpenAccessibilityPanel),
            _ => None,
        }
    }

    /// Whether the host's default handling of the key must be suppressed.
    pub fn prevents_default(&self) -> bool {
        matches!(self, Shortcut::OpenAccessibilityPanel)
    }
}

/// What the dispatcher did with a key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyOutcome {
    pub handled: bool,
    pub prevent_default: bool,
}

impl KeyOutcome {
    pub const PASS_THROUGH: KeyOutcome = KeyOutcome {
        handled: false,
        prevent_default: false,
    };
}

/// Listens for shortcuts on behalf of one session, from `attach` until
/// `detach` (or drop).
pub struct ShortcutDispatcher {
    controller: Arc<SessionController>,
    attached: AtomicBool,
}

impl ShortcutDispatcher {
    pub fn attach(controller: Arc<SessionController>) -> Self {
        info!("Keyboard shortcuts attached.");
        Self {
            controller,
            attached: AtomicBool::new(true),
        }
    }

    pub fn is_attached(&self) -> bool {
        self.attached.load(Ordering::Acquire)
    }

    pub fn detach(&self) {
        if self.attached.swap(false, Ordering::AcqRel) {
            info!("Keyboard shortcuts detached.");
        }
    }

    pub fn on_key_down(&self, event: &KeyEvent) -> KeyOutcome {
        if !self.is_attached() {
            return KeyOutcome::PASS_THROUGH;
        }
        let Some(shortcut) = Shortcut::from_event(event) else {
            return KeyOutcome::PASS_THROUGH;
        };

        let handled = match shortcut {
            Shortcut::CloseAccessibilityPanel => {
                self.controller.ui().accessibility_panel_open
                    && self.controller.close_panel(Panel::Accessibility).is_ok()
            }
            Shortcut::NewConversation => self.controller.reset_conversation().is_ok(),
            Shortcut::OpenAccessibilityPanel => {
                self.controller.open_panel(Panel::Accessibility).is_ok()
            }
        };

        if !handled {
            return KeyOutcome::PASS_THROUGH;
        }
        debug!(?shortcut, "Keyboard shortcut handled.");
        KeyOutcome {
            handled: true,
            prevent_default: shortcut.prevents_default(),
        }
    }
}

impl Drop for ShortcutDispatcher {
    fn drop(&mut self) {
        self.detach();
    }
}
