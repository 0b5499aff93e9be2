//! folio-engine: Conversation core for the folio portfolio assistant
//!
//! This crate provides the headless side of the chat widget:
//! - Message model and request wire format
//! - Reply extraction for loosely shaped responses
//! - Chat transports (HTTP, logging wrapper)
//! - The conversation controller (transcript, pending guard, sessions)
//! - Configuration (endpoints, timeout, profile)

pub mod chat;
pub mod config;
pub mod controller;
pub mod extract;
#[cfg(any(test, feature = "test-util"))]
pub mod testing;
pub mod transport;

// Re-export commonly used types
pub use chat::{ChatMessage, ChatRequest, Role, WireMessage};
pub use config::{ChatConfig, Config, ConfigError, Endpoints, Environment, Profile};
pub use controller::ConversationController;
pub use extract::{extract_reply, reply_or_default, NO_ANSWER_REPLY};
pub use transport::{ChatTransport, HttpTransport, LoggingTransport, TransportError};

/// Returns the engine version.
pub fn engine_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
