//! crates/sena_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the session controller.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of how replies are produced, how speech is played, where
//! the consent flag lives, and how styles reach the screen.

use async_trait::async_trait;

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., network, filesystem).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Service unavailable: {0}")]
    Unavailable(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

#[async_trait]
pub trait ResponseResolver: Send + Sync {
    /// Maps a quick-action id, or free text with an empty action id, to reply text.
    async fn resolve(&self, action_id: &str, utterance: Option<&str>) -> PortResult<String>;
}

/// A callable that produces audible output for a piece of text.
pub trait SpeechCapability: Send + Sync {
    fn speak(&self, text: &str) -> PortResult<()>;
}

impl<F> SpeechCapability for F
where
    F: Fn(&str) + Send + Sync,
{
    fn speak(&self, text: &str) -> PortResult<()> {
        self(text);
        Ok(())
    }
}

#[async_trait]
pub trait ConsentStore: Send + Sync {
    /// Reads the value stored under `key`, `None` when absent.
    async fn read(&self, key: &str) -> PortResult<Option<String>>;

    /// Persists `value` under `key`, replacing any previous value.
    async fn write(&self, key: &str, value: &str) -> PortResult<()>;
}

/// The styling surface shared with the presentation layer.
pub trait StyleEnvironment: Send + Sync {
    /// Sets a root style variable such as `--font-size`.
    fn set_property(&self, name: &str, value: &str);

    /// Removes a root style variable, reverting it to the stylesheet default.
    fn remove_property(&self, name: &str);

    /// Adds (`enabled = true`) or removes a marker class on the root scope.
    fn set_marker(&self, name: &str, enabled: bool);
}
