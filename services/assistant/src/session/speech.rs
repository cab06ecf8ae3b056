//! services/assistant/src/session/speech.rs
//!
//! Single-slot registry for the speech capability contributed by whichever
//! component currently owns the speech engine.

use sena_core::SpeechCapability;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, PoisonError, RwLock, Weak};
use tracing::{debug, warn};

/// Holds a weak handle to the current speech capability.
///
/// The registry never keeps the engine alive: once the holder drops its
/// `Arc`, the slot resolves to "absent" and every invocation is a no-op.
#[derive(Clone, Default)]
pub struct SpeechRegistry {
    slot: Arc<RwLock<Option<Weak<dyn SpeechCapability>>>>,
}

impl SpeechRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `capability`, replacing any previous holder.
    pub fn register(&self, capability: &Arc<dyn SpeechCapability>) {
        let mut slot = self.slot.write().unwrap_or_else(PoisonError::into_inner);
        if slot.is_some() {
            debug!("Replacing previously registered speech capability.");
        }
        *slot = Some(Arc::downgrade(capability));
    }

    pub fn unregister(&self) {
        self.slot
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
    }

    /// Whether a live capability is currently registered.
    pub fn is_registered(&self) -> bool {
        self.current().is_some()
    }

    /// Speaks `text` through the registered capability.
    ///
    /// Returns `true` if a capability was invoked. Engine failures, panics
    /// included, are logged and swallowed.
    pub fn invoke(&self, text: &str) -> bool {
        let Some(capability) = self.current() else {
            return false;
        };
        match panic::catch_unwind(AssertUnwindSafe(|| capability.speak(text))) {
            Ok(Ok(())) => {}
            Ok(Err(e)) => warn!(error = %e, "Speech capability failed."),
            Err(_) => warn!("Speech capability panicked."),
        }
        true
    }

    fn current(&self) -> Option<Arc<dyn SpeechCapability>> {
        self.slot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .and_then(Weak::upgrade)
    }
}
