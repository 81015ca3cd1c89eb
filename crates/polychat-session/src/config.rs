use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use polychat_core::{ChatError, GenerationParams, Result};

use crate::session::DEFAULT_WINDOW;

/// Environment variable naming an alternative config file location.
pub const CONFIG_ENV_VAR: &str = "POLYCHAT_CONFIG";

/// Startup configuration, typically loaded from a YAML file.
///
/// Every field has a default, so an absent file yields a working Groq
/// setup as long as the API key is present in the environment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Backend provider name ("groq", "openai", "anthropic", "ollama").
    #[serde(default = "default_provider")]
    pub provider: String,

    /// Explicit API key. When absent the provider's environment variable
    /// is consulted instead.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    #[serde(default)]
    pub generation: GenerationParams,

    /// Memory window size in exchange pairs.
    #[serde(default = "default_window")]
    pub window: usize,
}

fn default_provider() -> String {
    "groq".to_string()
}

fn default_window() -> usize {
    DEFAULT_WINDOW
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            api_key: None,
            base_url: None,
            generation: GenerationParams::default(),
            window: default_window(),
        }
    }
}

impl ChatConfig {
    /// Loads configuration with the usual precedence.
    ///
    /// An explicitly given path must exist. Otherwise `$POLYCHAT_CONFIG`
    /// is consulted, then the per-user default location, and finally the
    /// built-in defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::from_file(path);
        }
        if let Ok(env_path) = std::env::var(CONFIG_ENV_VAR) {
            return Self::from_file(Path::new(&env_path));
        }
        if let Some(default_path) = Self::default_path() {
            if default_path.exists() {
                return Self::from_file(&default_path);
            }
        }
        debug!("no config file found, using defaults");
        Ok(Self::default())
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            ChatError::config(format!("cannot read config file '{}': {e}", path.display()))
        })?;
        let config = Self::from_yaml(&content).map_err(|e| {
            ChatError::config(format!("in config file '{}': {e}", path.display()))
        })?;
        debug!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).map_err(|e| ChatError::config(e.to_string()))
    }

    /// Per-user config location (`~/.config/polychat/config.yaml` on Linux).
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("polychat").join("config.yaml"))
    }

    pub fn generation_params(&self) -> GenerationParams {
        self.generation.clone()
    }
}
