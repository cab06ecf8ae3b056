pub mod consent;
pub mod controller;
pub mod effects;
pub mod error;
pub mod events;
pub mod gateway;
pub mod keyboard;
pub mod message_log;
pub mod phrases;
pub mod speech;

#[cfg(test)]
pub(crate) mod testing;

pub use consent::{ConsentGate, GateState, CONSENT_KEY};
pub use controller::{SessionController, SessionOptions, SessionSnapshot};
pub use error::SessionError;
pub use events::SessionEvent;
pub use keyboard::{KeyEvent, KeyOutcome, ShortcutDispatcher};
pub use speech::SpeechRegistry;
