use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use polychat_core::{BackendError, CompletionBackend, GenerationParams};

/// Hosted inference provider selectable through configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Groq (default)
    Groq,
    /// OpenAI (GPT models)
    OpenAI,
    /// Anthropic (Claude models)
    Anthropic,
    /// Ollama (local models)
    Ollama,
}

impl ProviderKind {
    pub fn api_key_env_var(&self) -> Option<&'static str> {
        match self {
            Self::Groq => Some("GROQ_API_KEY"),
            Self::OpenAI => Some("OPENAI_API_KEY"),
            Self::Anthropic => Some("ANTHROPIC_API_KEY"),
            Self::Ollama => None, // Ollama doesn't need an API key
        }
    }

    pub fn default_base_url(&self) -> Option<&'static str> {
        match self {
            Self::Ollama => Some("http://localhost:11434"),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Groq => "groq",
            Self::OpenAI => "openai",
            Self::Anthropic => "anthropic",
            Self::Ollama => "ollama",
        }
    }

    fn to_llm_backend(self) -> llm::builder::LLMBackend {
        match self {
            Self::Groq => llm::builder::LLMBackend::Groq,
            Self::OpenAI => llm::builder::LLMBackend::OpenAI,
            Self::Anthropic => llm::builder::LLMBackend::Anthropic,
            Self::Ollama => llm::builder::LLMBackend::Ollama,
        }
    }
}

impl FromStr for ProviderKind {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "groq" => Ok(Self::Groq),
            "openai" => Ok(Self::OpenAI),
            "anthropic" => Ok(Self::Anthropic),
            "ollama" => Ok(Self::Ollama),
            _ => Err("unknown provider kind"),
        }
    }
}

/// [`CompletionBackend`] over hosted chat providers.
///
/// Stateless by contract: each call sends exactly one user message carrying
/// the fully rendered prompt, so the provider sees no conversation of its
/// own. The underlying client is rebuilt per request because generation
/// parameters arrive with the call.
#[derive(Debug)]
pub struct UnifiedBackend {
    kind: ProviderKind,
    api_key: Option<String>,
    base_url: Option<String>,
}

impl UnifiedBackend {
    /// Creates a backend, resolving the API key eagerly.
    ///
    /// An explicit `api_key` wins; otherwise the provider's environment
    /// variable is consulted. A provider that requires a key and finds none
    /// fails here rather than on the first request.
    pub fn new(
        kind: ProviderKind,
        api_key: Option<String>,
        base_url: Option<String>,
    ) -> Result<Self, BackendError> {
        let resolved_key = match api_key {
            Some(key) => Some(key),
            None => match kind.api_key_env_var() {
                Some(env_var) => Some(std::env::var(env_var).map_err(|_| {
                    BackendError::Config(format!(
                        "API key not found: set {env_var} or configure api_key"
                    ))
                })?),
                None => None,
            },
        };

        let resolved_url = base_url.or_else(|| kind.default_base_url().map(|s| s.to_string()));

        Ok(Self {
            kind,
            api_key: resolved_key,
            base_url: resolved_url,
        })
    }

    /// Creates a backend from the provider's environment variable alone.
    pub fn from_env(kind: ProviderKind) -> Result<Self, BackendError> {
        Self::new(kind, None, None)
    }

    pub fn kind(&self) -> ProviderKind {
        self.kind
    }

    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    fn build_client(
        &self,
        params: &GenerationParams,
    ) -> Result<Box<dyn llm::LLMProvider>, BackendError> {
        let mut builder = llm::builder::LLMBuilder::new()
            .backend(self.kind.to_llm_backend())
            .model(&params.model)
            .temperature(params.temperature)
            .max_tokens(params.max_tokens);

        if let Some(ref key) = self.api_key {
            builder = builder.api_key(key);
        }
        if let Some(ref url) = self.base_url {
            builder = builder.base_url(url);
        }

        builder
            .build()
            .map_err(|e| BackendError::Config(format!("failed to build LLM client: {e}")))
    }
}

#[async_trait]
impl CompletionBackend for UnifiedBackend {
    async fn complete(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<String, BackendError> {
        debug!(
            provider = self.kind.as_str(),
            model = %params.model,
            prompt_chars = prompt.len(),
            "sending completion request"
        );

        let client = self.build_client(params)?;
        let messages = vec![llm::chat::ChatMessage::user().content(prompt).build()];

        let response = client.chat(&messages).await.map_err(|e| BackendError::Api {
            message: e.to_string(),
            status: None,
        })?;

        match response.text() {
            Some(text) if !text.trim().is_empty() => Ok(text),
            _ => Err(BackendError::EmptyCompletion(self.kind.as_str().to_string())),
        }
    }

    fn name(&self) -> &str {
        self.kind.as_str()
    }
}
