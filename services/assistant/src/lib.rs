//! services/assistant/src/lib.rs
//!
//! The Sena assistant service: the session orchestration layer, its
//! adapters, and the WebSocket surface that exposes one session per connection.

pub mod adapters;
pub mod config;
pub mod error;
pub mod session;
pub mod web;
