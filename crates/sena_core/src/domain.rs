//! crates/sena_core/src/domain.rs
//!
//! Defines the pure, core data structures for the assistant.
//! These structs are independent of any transport or presentation layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Opaque unique token identifying a single message in the conversation log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(Uuid);

impl MessageId {
    /// Generates a fresh, globally unique id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for MessageId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A single entry of the conversation log. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: MessageId,
    pub text: String,
    pub is_bot: bool,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    /// Creates a message stamped with a fresh id and the current instant.
    pub fn new(text: impl Into<String>, is_bot: bool) -> Self {
        Self {
            id: MessageId::new(),
            text: text.into(),
            is_bot,
            timestamp: Utc::now(),
        }
    }

    pub fn bot(text: impl Into<String>) -> Self {
        Self::new(text, true)
    }

    #[cfg(test)]
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(text, false)
    }
}

/// The two configuration panels a session can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Panel {
    Accessibility,
    LlmConfig,
}

/// Transient flags of one mounted session. Reset to defaults on every fresh load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUiState {
    pub is_typing: bool,
    pub is_dark_mode: bool,
    pub accessibility_panel_open: bool,
    pub llm_config_panel_open: bool,
}

impl SessionUiState {
    pub fn is_open(&self, panel: Panel) -> bool {
        match panel {
            Panel::Accessibility => self.accessibility_panel_open,
            Panel::LlmConfig => self.llm_config_panel_open,
        }
    }

    /// Sets the visibility of `panel`, returning whether it actually changed.
    pub fn set_open(&mut self, panel: Panel, open: bool) -> bool {
        let slot = match panel {
            Panel::Accessibility => &mut self.accessibility_panel_open,
            Panel::LlmConfig => &mut self.llm_config_panel_open,
        };
        let changed = *slot != open;
        *slot = open;
        changed
    }
}

//=========================================================================================
// Quick Actions
//=========================================================================================

/// A predefined topic a user can pick instead of typing free text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QuickAction {
    pub id: &'static str,
    pub label: &'static str,
    /// Spoken right after the user picks the action, before the reply arrives.
    pub acknowledgement: &'static str,
}

/// Spoken for action ids that are not part of the catalog.
pub const GENERIC_ACKNOWLEDGEMENT: &str = "Preparando sua resposta...";

pub const QUICK_ACTIONS: &[QuickAction] = &[
    QuickAction {
        id: "celular-basico",
        label: "Como usar o celular",
        acknowledgement: "Vou te ensinar como usar o celular",
    },
    QuickAction {
        id: "wifi",
        label: "Conectar no WiFi",
        acknowledgement: "Vou explicar como conectar no WiFi",
    },
    QuickAction {
        id: "whatsapp",
        label: "WhatsApp",
        acknowledgement: "Vou te ajudar com o WhatsApp",
    },
    QuickAction {
        id: "email",
        label: "E-mail",
        acknowledgement: "Vou te ensinar sobre e-mail",
    },
    QuickAction {
        id: "camera",
        label: "Câmera e fotos",
        acknowledgement: "Vou explicar como usar a câmera",
    },
    QuickAction {
        id: "ligacao",
        label: "Fazer ligações",
        acknowledgement: "Vou te ensinar a fazer ligações",
    },
    QuickAction {
        id: "compras",
        label: "Compras online",
        acknowledgement: "Vou explicar sobre compras online",
    },
    QuickAction {
        id: "banco",
        label: "Banco digital e PIX",
        acknowledgement: "Vou te ajudar com banco digital",
    },
    QuickAction {
        id: "configuracoes",
        label: "Configurações",
        acknowledgement: "Vou explicar as configurações",
    },
    QuickAction {
        id: "outros",
        label: "Outras dúvidas",
        acknowledgement: "Vou te ajudar com outras dúvidas",
    },
];

/// Looks up a catalog entry by id.
pub fn find_quick_action(id: &str) -> Option<&'static QuickAction> {
    QUICK_ACTIONS.iter().find(|action| action.id == id)
}

/// The phrase announced when `id` is selected; unknown ids get the generic one.
pub fn acknowledgement_for(id: &str) -> &'static str {
    find_quick_action(id)
        .map(|action| action.acknowledgement)
        .unwrap_or(GENERIC_ACKNOWLEDGEMENT)
}
