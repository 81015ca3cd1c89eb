//! Multi-persona chat engine.
//!
//! Conversations run through a [`session::ChatSession`]: pick a persona,
//! submit turns, and the session assembles prompts from a sliding window of
//! recent exchanges before calling the configured completion backend.

use std::sync::Arc;

pub mod error {
    pub use polychat_core::{BackendError, ChatError, Result};
}

pub mod message {
    pub use polychat_core::{ChatMessage, Role};
}

pub mod backend {
    pub use polychat_core::{CompletionBackend, GenerationParams};
    pub use polychat_llm::{MockBackend, MockCall, ProviderKind, UnifiedBackend};
}

pub mod memory {
    pub use polychat_memory::{DEFAULT_SPEAKER, Exchange, WindowMemory};
}

pub mod persona {
    pub use polychat_persona::{
        HISTORY_VAR, INPUT_VAR, Persona, PersonaRegistry, PromptTemplate, builtin_personas,
    };
}

pub mod session {
    pub use polychat_session::{
        CONFIG_ENV_VAR, ChatConfig, ChatSession, ConversationChain, DEFAULT_WINDOW,
    };
}

// Top-level re-exports
pub use backend::{CompletionBackend, GenerationParams, MockBackend, ProviderKind, UnifiedBackend};
pub use error::{BackendError, ChatError, Result};
pub use memory::WindowMemory;
pub use message::{ChatMessage, Role};
pub use persona::{Persona, PersonaRegistry};
pub use session::{ChatConfig, ChatSession, ConversationChain};

/// Builds a ready-to-chat session from configuration: built-in personas
/// plus the provider the config names.
///
/// Fails fast when the provider is unknown or its credential is missing,
/// so a broken setup never reaches the first turn.
pub fn session_from_config(config: &ChatConfig) -> Result<ChatSession> {
    let registry = PersonaRegistry::builtin()?;
    let kind: ProviderKind = config
        .provider
        .parse()
        .map_err(|_| ChatError::config(format!("unknown provider '{}'", config.provider)))?;
    // Backend construction failures are startup conditions, not per-request
    // errors, so they surface as fatal configuration errors.
    let backend = UnifiedBackend::new(kind, config.api_key.clone(), config.base_url.clone())
        .map_err(|e| ChatError::config(e.to_string()))?;

    Ok(ChatSession::new(registry, Arc::new(backend))
        .with_params(config.generation_params())
        .with_window(config.window))
}
