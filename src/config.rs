//! Application Configuration
//!
//! Loaded from an optional JSON file, then overridden by environment variables.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::domain::{DomainError, DomainResult};

pub const ENV_DATA_DIR: &str = "OBRA_GESTOR_DATA_DIR";
pub const ENV_LOG_DIR: &str = "OBRA_GESTOR_LOG_DIR";
pub const ENV_GEMINI_API_KEY: &str = "GEMINI_API_KEY";
pub const ENV_FALLBACK_API_KEY: &str = "API_KEY";
pub const ENV_GEMINI_MODEL: &str = "GEMINI_MODEL";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub app_name: String,
    pub data_dir: PathBuf,
    pub db_file: String,
    pub log_dir: PathBuf,
    /// How long a transient notice stays visible
    pub notice_duration_ms: i64,
    pub gemini: GeminiConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            app_name: "ObraGestor".to_string(),
            data_dir: PathBuf::from("data"),
            db_file: "obra_gestor.db".to_string(),
            log_dir: PathBuf::from("data").join("logs"),
            notice_duration_ms: 3_000,
            gemini: GeminiConfig::default(),
        }
    }
}

/// Image suggestion service settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeminiConfig {
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub model: String,
    pub endpoint: String,
    pub timeout_secs: u64,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: "gemini-2.5-flash".to_string(),
            endpoint: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            timeout_secs: 30,
        }
    }
}

impl AppConfig {
    /// Defaults plus environment overrides
    pub fn from_env() -> Self {
        Self::default().apply_env(|key| std::env::var(key).ok())
    }

    /// Optional JSON file plus environment overrides
    pub fn load(path: Option<&Path>) -> DomainResult<Self> {
        match path {
            Some(path) => Ok(Self::from_json_file(path)?.apply_env(|key| std::env::var(key).ok())),
            None => Ok(Self::from_env()),
        }
    }

    pub fn from_json_file(path: &Path) -> DomainResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            DomainError::InvalidInput(format!("Failed to read config {}: {}", path.display(), e))
        })?;
        serde_json::from_str(&text).map_err(|e| {
            DomainError::InvalidInput(format!("Invalid config {}: {}", path.display(), e))
        })
    }

    /// Apply overrides from a variable lookup
    pub fn apply_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(dir) = non_empty(ENV_DATA_DIR) {
            self.data_dir = PathBuf::from(dir);
        }
        if let Some(dir) = non_empty(ENV_LOG_DIR) {
            self.log_dir = PathBuf::from(dir);
        }
        if let Some(key) = non_empty(ENV_GEMINI_API_KEY).or_else(|| non_empty(ENV_FALLBACK_API_KEY)) {
            self.gemini.api_key = Some(key);
        }
        if let Some(model) = non_empty(ENV_GEMINI_MODEL) {
            self.gemini.model = model;
        }
        self
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(&self.db_file)
    }
}
