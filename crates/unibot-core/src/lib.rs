//! Domain layer for the unibot chat client.
//!
//! Holds the wire types exchanged with the chatbot backend, the typed
//! [`chat::ChatReply`] sum type the renderer dispatches on, and the
//! persistence/transport traits the outer crates implement.

pub mod chat;
pub mod config;
pub mod error;
pub mod history;
pub mod session;

// Re-export common error type
pub use error::UnibotError;
