use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::debug;

use crate::paths::PathManager;

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub reviews: ReviewOptions,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct BackendConfig {
    pub url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub user_agent: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ReviewOptions {
    /// Which category a deletion removes the review from locally
    #[serde(default)]
    pub delete_category: DeleteCategoryPolicy,
    /// Ask before deleting a review (the CLI `--yes` flag skips the prompt)
    #[serde(default = "default_true")]
    pub confirm_deletes: bool,
}

/// How the category of a review being deleted is determined
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum DeleteCategoryPolicy {
    /// Use the acting viewer's current trust status (viewers only delete their own reviews)
    #[default]
    ActingViewer,
    /// Use the trust status recorded on the review when it was submitted
    StoredReview,
}

fn default_true() -> bool {
    true
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_backend_url() -> String {
    "http://localhost:8000".to_string()
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: default_backend_url(),
            timeout_secs: default_timeout_secs(),
            user_agent: None,
        }
    }
}

impl Default for ReviewOptions {
    fn default() -> Self {
        Self {
            delete_category: DeleteCategoryPolicy::default(),
            confirm_deletes: default_true(),
        }
    }
}

impl Config {
    pub fn load_from_file(path: &PathBuf) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load the config file if it exists, otherwise fall back to defaults
    pub fn load_or_default(paths: &PathManager) -> anyhow::Result<Self> {
        let path = paths.config_file();
        if !path.exists() {
            debug!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let config = Self::load_from_file(&path)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save_to_file(&self, path: &PathBuf) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        let url = self.backend.url.trim();
        if url.is_empty() {
            return Err(anyhow::anyhow!("backend.url is required and cannot be empty"));
        }
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(anyhow::anyhow!("backend.url must start with http:// or https://: {}", url));
        }
        if self.backend.timeout_secs == 0 {
            return Err(anyhow::anyhow!("backend.timeout_secs must be greater than zero"));
        }
        Ok(())
    }

    /// Backend base URL without a trailing slash
    pub fn backend_url(&self) -> &str {
        self.backend.url.trim().trim_end_matches('/')
    }
}
