use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

pub const DEFAULT_MODEL: &str = "gemma3:4b";
pub const DEFAULT_MAX_PAGES: usize = 10;
pub const MAX_PAGES_LIMIT: usize = 100;
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;
pub const MIN_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";

/// Root configuration, loaded from `~/.config/docinfer/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DocinferConfig {
    pub extraction: ExtractionConfig,
    pub ollama: OllamaConfig,
    pub prompts: PromptConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Pages of text handed to the model.
    pub max_pages: usize,
    pub model: String,
    pub temperature: f32,
    pub timeout_secs: u64,
    pub skip_ai: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OllamaConfig {
    pub base_url: String,
    /// Executable used for the `list` availability probe.
    pub command: String,
    pub probe_timeout_secs: u64,
}

/// Optional overrides for the built-in prompts.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_template: Option<String>,
}

/// Presentation settings; these come from the command line only.
#[derive(Debug, Clone, Default)]
pub struct OutputConfig {
    pub json_output: bool,
    pub export_path: Option<PathBuf>,
    pub quiet: bool,
}

impl OutputConfig {
    /// Progress bars and spinners are drawn only for interactive text output.
    pub fn shows_progress(&self) -> bool {
        !self.quiet && !self.json_output
    }
}

// ─── Defaults ──────────────────────────────────────────────

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            max_pages: DEFAULT_MAX_PAGES,
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.0,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            skip_ai: false,
        }
    }
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_OLLAMA_URL.to_string(),
            command: "ollama".to_string(),
            probe_timeout_secs: 5,
        }
    }
}

impl ExtractionConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl OllamaConfig {
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }
}

// ─── Load / Save ───────────────────────────────────────────

impl DocinferConfig {
    /// Standard config file path: `~/.config/docinfer/config.toml`
    pub fn config_path() -> PathBuf {
        if let Ok(path) = std::env::var("DOCINFER_CONFIG") {
            return PathBuf::from(path);
        }

        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join("docinfer")
            .join("config.toml")
    }

    /// Load config from disk, falling back to defaults if the file doesn't exist.
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        Self::load_from(&path)
    }

    /// Load config from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Save config to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let toml_str = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_str)?;
        Ok(())
    }

    /// Apply `DOCINFER_MODEL` / `OLLAMA_HOST` style overrides from `lookup`.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(model) = lookup("DOCINFER_MODEL").filter(|m| !m.trim().is_empty()) {
            self.extraction.model = model.trim().to_string();
        }
        if let Some(host) = lookup("OLLAMA_HOST").filter(|h| !h.trim().is_empty()) {
            self.ollama.base_url = normalize_base_url(&host);
        }
    }

    pub fn validate(&self) -> Result<()> {
        let extraction = &self.extraction;
        if !(1..=MAX_PAGES_LIMIT).contains(&extraction.max_pages) {
            return Err(CoreError::ValidationError(format!(
                "max_pages must be between 1 and {MAX_PAGES_LIMIT}, got {}",
                extraction.max_pages
            )));
        }
        if !(0.0..=2.0).contains(&extraction.temperature) {
            return Err(CoreError::ValidationError(format!(
                "temperature must be between 0.0 and 2.0, got {}",
                extraction.temperature
            )));
        }
        if extraction.timeout_secs < MIN_TIMEOUT_SECS {
            return Err(CoreError::ValidationError(format!(
                "timeout_secs must be at least {MIN_TIMEOUT_SECS}, got {}",
                extraction.timeout_secs
            )));
        }
        if extraction.model.trim().is_empty() {
            return Err(CoreError::ValidationError("model must not be empty".to_string()));
        }
        if let Some(template) = &self.prompts.user_template
            && !template.contains("{text}")
        {
            return Err(CoreError::ConfigError(
                "prompts.user_template must contain a {text} placeholder".to_string(),
            ));
        }
        Ok(())
    }
}

/// `OLLAMA_HOST` is often given as a bare `host:port`.
fn normalize_base_url(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("http://{trimmed}")
    }
}
