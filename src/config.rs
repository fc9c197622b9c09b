// src/config.rs
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::catalog::AutoSelectStrategy;
use crate::errors::{Result, TiacherError};

pub const DEFAULT_API_BASE: &str = "http://localhost:8000/api";
pub const DEFAULT_MAIL_DOMAIN: &str = "@educa.jcyl.es";
pub const DEFAULT_MODEL_PRIORITY: &[&str] = &[
    "chat gpt 4.5 preview",
    "chat gpt 4.",
    "claude",
    "gemini",
    "grok",
];

/// High-level client configuration, loaded from an optional TOML file and
/// then overridden by environment variables.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend base URL, including the `/api` prefix.
    pub api_base: String,
    /// Directory holding the session store.
    pub storage_dir: PathBuf,
    /// Directory downloaded exam PDFs are written to.
    pub output_dir: PathBuf,
    /// Institutional mail suffix accepted at registration.
    pub mail_domain: String,
    /// Ordered, case-insensitive name fragments moved to the front of the catalog.
    pub model_priority: Vec<String>,
    pub auto_select: AutoSelectStrategy,
}

/// On-disk shape of `tiacher.toml`. Every key is optional.
#[derive(Deserialize, Debug, Default)]
struct FileConfig {
    api_base: Option<String>,
    storage_dir: Option<PathBuf>,
    output_dir: Option<PathBuf>,
    mail_domain: Option<String>,
    model_priority: Option<Vec<String>>,
    auto_select: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            storage_dir: default_storage_dir(),
            output_dir: default_output_dir(),
            mail_domain: DEFAULT_MAIL_DOMAIN.to_string(),
            model_priority: DEFAULT_MODEL_PRIORITY.iter().map(|s| s.to_string()).collect(),
            auto_select: AutoSelectStrategy::First,
        }
    }
}

impl ClientConfig {
    /// Load configuration from the TOML file (if any) and environment variables.
    pub fn from_env() -> Result<Self> {
        let file_path = std::env::var("TIACHER_CONFIG")
            .map(PathBuf::from)
            .ok()
            .or_else(default_config_file);

        let mut config = Self::default();
        if let Some(path) = file_path.filter(|p| p.exists()) {
            config = config.merge_file(&path)?;
        }
        config.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Reads `path` as TOML and lets its keys override the current values.
    pub fn merge_file(self, path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        self.merge_toml(&raw)
    }

    pub fn merge_toml(mut self, raw: &str) -> Result<Self> {
        let file: FileConfig = toml::from_str(raw)?;

        if let Some(api_base) = file.api_base {
            self.api_base = api_base;
        }
        if let Some(dir) = file.storage_dir {
            self.storage_dir = dir;
        }
        if let Some(dir) = file.output_dir {
            self.output_dir = dir;
        }
        if let Some(domain) = file.mail_domain {
            self.mail_domain = domain;
        }
        if let Some(priority) = file.model_priority {
            self.model_priority = priority;
        }
        if let Some(mode) = file.auto_select {
            self.auto_select = mode.parse()?;
        }
        self.validate()
    }

    /// Applies `TIACHER_*` overrides read through `lookup`.
    pub fn apply_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(api_base) = lookup("TIACHER_API_BASE") {
            self.api_base = api_base;
        }
        if let Some(dir) = lookup("TIACHER_STORAGE_DIR") {
            self.storage_dir = PathBuf::from(dir);
        }
        if let Some(dir) = lookup("TIACHER_OUTPUT_DIR") {
            self.output_dir = PathBuf::from(dir);
        }
        if let Some(domain) = lookup("TIACHER_MAIL_DOMAIN") {
            self.mail_domain = domain;
        }
        if let Some(priority) = lookup("TIACHER_MODEL_PRIORITY") {
            self.model_priority = priority
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }
        if let Some(mode) = lookup("TIACHER_AUTO_SELECT") {
            self.auto_select = mode.parse()?;
        }
        self.validate()
    }

    fn validate(self) -> Result<Self> {
        let base = self.api_base.trim();
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(TiacherError::Config(format!(
                "api_base must be an http(s) URL, got '{}'",
                self.api_base
            )));
        }
        if !self.mail_domain.starts_with('@') {
            return Err(TiacherError::Config(format!(
                "mail_domain must start with '@', got '{}'",
                self.mail_domain
            )));
        }
        Ok(self)
    }

    /// Joins an endpoint path onto the base URL.
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.api_base.trim().trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

fn default_config_file() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("tiacher").join("tiacher.toml"))
}

fn default_storage_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("tiacher")
}

fn default_output_dir() -> PathBuf {
    dirs::download_dir().unwrap_or_else(|| PathBuf::from("."))
}
