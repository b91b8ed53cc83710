//! Chat backend for the study assistant.
//!
//! Talks to an OpenAI-compatible chat-completions endpoint (Cerebras by
//! default) and keeps the assistant grounded in the supplied materials.

pub mod client;
pub mod config;
pub mod error;

pub use client::ChatClient;
pub use config::ChatConfig;
pub use error::ChatError;
