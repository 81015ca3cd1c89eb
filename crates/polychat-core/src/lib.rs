//! Core types and traits for the polychat session core

pub mod backend;
pub mod error;
pub mod message;
pub mod types;

pub use backend::CompletionBackend;
pub use error::{BackendError, ChatError, Result};
pub use message::{ChatMessage, Role};
pub use types::GenerationParams;
