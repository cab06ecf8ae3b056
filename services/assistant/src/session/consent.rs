//! services/assistant/src/session/consent.rs
//!
//! The one-time terms acceptance barrier in front of the conversation.

use sena_core::{ConsentStore, PortResult};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

/// Storage key of the persisted acceptance flag.
pub const CONSENT_KEY: &str = "sena-welcome-accepted";
pub const CONSENT_ACCEPTED_VALUE: &str = "true";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    /// Terms not accepted yet; the conversation is unreachable.
    Gated,
    /// Terminal for the lifetime of the session.
    Active,
}

impl fmt::Display for GateState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GateState::Gated => write!(f, "Gated"),
            GateState::Active => write!(f, "Active"),
        }
    }
}

pub struct ConsentGate {
    store: Arc<dyn ConsentStore>,
    accepted: AtomicBool,
}

impl ConsentGate {
    /// Reads the persisted flag once. Any non-empty stored value counts as
    /// accepted; a failing store is treated as "not accepted".
    pub async fn load(store: Arc<dyn ConsentStore>) -> Self {
        let accepted = match store.read(CONSENT_KEY).await {
            Ok(value) => value.is_some_and(|v| !v.is_empty()),
            Err(e) => {
                warn!(error = %e, "Could not read consent flag; asking again.");
                false
            }
        };
        Self {
            store,
            accepted: AtomicBool::new(accepted),
        }
    }

    pub fn is_accepted(&self) -> bool {
        self.accepted.load(Ordering::Acquire)
    }

    pub fn state(&self) -> GateState {
        if self.is_accepted() {
            GateState::Active
        } else {
            GateState::Gated
        }
    }

    /// Persists the flag and moves the gate to `Active`.
    ///
    /// The gate is `Active` afterwards even if the write failed; the error is
    /// returned so the caller can report that consent will be asked again on
    /// the next load.
    pub async fn accept(&self) -> PortResult<()> {
        let written = self.store.write(CONSENT_KEY, CONSENT_ACCEPTED_VALUE).await;
        if !self.accepted.swap(true, Ordering::AcqRel) {
            info!("Consent accepted; session is now active.");
        }
        written
    }
}
