use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{RepcoachError, Result};

/// Top-level configuration for RepCoach.
///
/// Loaded from `~/.repcoach/config.toml` by default. Each section corresponds
/// to one external collaborator or to the chat engine itself.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RepcoachConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub media: MediaConfig,
    #[serde(default)]
    pub generation: GenerationConfig,
    #[serde(default)]
    pub chat: ChatConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

impl RepcoachConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: RepcoachConfig = toml::from_str(&content)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }

    /// Check value ranges that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.catalog.base_url.trim().is_empty() {
            return Err(RepcoachError::Config("catalog.base_url is empty".into()));
        }
        if self.media.base_url.trim().is_empty() {
            return Err(RepcoachError::Config("media.base_url is empty".into()));
        }
        if self.generation.base_url.trim().is_empty() {
            return Err(RepcoachError::Config("generation.base_url is empty".into()));
        }
        if self.generation.model.trim().is_empty() {
            return Err(RepcoachError::Config("generation.model is empty".into()));
        }
        if !(0.0..=2.0).contains(&self.generation.temperature) {
            return Err(RepcoachError::Config(format!(
                "generation.temperature must be within 0.0..=2.0, got {}",
                self.generation.temperature
            )));
        }
        if self.catalog.timeout_secs == 0
            || self.media.timeout_secs == 0
            || self.generation.timeout_secs == 0
        {
            return Err(RepcoachError::Config("timeouts must be non-zero".into()));
        }
        if self.chat.max_question_length == 0 {
            return Err(RepcoachError::Config(
                "chat.max_question_length must be non-zero".into(),
            ));
        }
        Ok(())
    }
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Exercise catalog service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Base URL of the catalog service (the listing lives at `/list_all`).
    pub base_url: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            timeout_secs: 10,
        }
    }
}

/// Step image service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaConfig {
    /// Base URL prepended to resource paths.
    pub base_url: String,
    /// Per-image fetch timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            timeout_secs: 5,
        }
    }
}

/// Text generation service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Base URL of an OpenAI-compatible API.
    pub base_url: String,
    /// Model identifier sent with every request.
    pub model: String,
    /// Sampling temperature.
    pub temperature: f32,
    /// Environment variable holding the API key.
    pub api_key_env: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            temperature: 0.7,
            api_key_env: "OPENAI_API_KEY".to_string(),
            timeout_secs: 120,
        }
    }
}

/// Chat engine settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Maximum question length in characters.
    pub max_question_length: usize,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            max_question_length: 2000,
        }
    }
}

/// Catalog/media HTTP service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address the service binds to.
    pub bind_address: String,
    /// Port the service listens on.
    pub port: u16,
    /// Directory holding one sub-directory of step images per exercise.
    pub exercises_dir: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1".to_string(),
            port: 5000,
            exercises_dir: "exercises".to_string(),
        }
    }
}
