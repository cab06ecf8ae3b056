//! services/assistant/src/session/error.rs
//!
//! Errors surfaced to callers of the session controller.

/// Reply resolution failures never show up here; they become fallback messages.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("the terms have not been accepted yet")]
    ConsentRequired,
    #[error("message cannot be empty")]
    EmptyMessage,
}
