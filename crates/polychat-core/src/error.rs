//! Error taxonomy for the polychat workspace

use thiserror::Error;

/// Errors surfaced by completion backends.
///
/// These are per-request and recoverable: the session converts them into a
/// visible transcript entry instead of terminating.
#[derive(Debug, Clone, Error)]
pub enum BackendError {
    #[error("API error: {message}")]
    Api {
        message: String,
        status: Option<u16>,
    },

    #[error("network error: {0}")]
    Network(String),

    #[error("rate limit exceeded")]
    RateLimit,

    #[error("backend configuration error: {0}")]
    Config(String),

    #[error("backend '{0}' returned an empty completion")]
    EmptyCompletion(String),

    #[error("{0}")]
    Other(String),
}

/// Workspace-wide error type.
#[derive(Debug, Error)]
pub enum ChatError {
    /// Fatal at startup: missing credential or unreadable configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// Lookup of a persona id outside the registered set.
    #[error("unknown persona '{0}'")]
    UnknownPersona(String),

    /// A persona template failed load-time validation.
    #[error("invalid template for persona '{persona}': {reason}")]
    InvalidTemplate { persona: String, reason: String },

    /// Prompt rendering failed after registration (unresolved variable).
    #[error("template rendering failed: {0}")]
    Template(String),

    #[error(transparent)]
    Backend(#[from] BackendError),
}

impl ChatError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    pub fn invalid_template(persona: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidTemplate {
            persona: persona.into(),
            reason: reason.into(),
        }
    }

    /// Whether the error is recoverable within a running session.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Backend(_))
    }
}

pub type Result<T> = std::result::Result<T, ChatError>;
