pub mod domain;
pub mod ports;
pub mod settings;

pub use domain::{
    acknowledgement_for, find_quick_action, Message, MessageId, Panel, QuickAction,
    SessionUiState, GENERIC_ACKNOWLEDGEMENT, QUICK_ACTIONS,
};
pub use ports::{ConsentStore, PortError, PortResult, ResponseResolver, SpeechCapability, StyleEnvironment};
pub use settings::{container_classes, AccessibilitySettings, ScrollBehavior, SettingsPatch};
