//! quizkit configuration.

use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use quizkit_core::session::SessionConfig;

use crate::client::{HttpQuestionBank, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};
use crate::error::BankError;

/// Where to fetch questions from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BankConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}
fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for BankConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
        }
    }
}

impl BankConfig {
    /// Build the HTTP client for this bank.
    pub fn connect(&self) -> Result<HttpQuestionBank, BankError> {
        HttpQuestionBank::new(&self.base_url, Duration::from_secs(self.timeout_secs))
    }
}

/// Session defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuizConfig {
    /// Questions shown per cycle. Unset shows the whole pool; 0 is rejected.
    #[serde(default)]
    pub display_count: Option<NonZeroUsize>,
    /// Fixed seed for reproducible draws.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl QuizConfig {
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            display_count: self.display_count,
            seed: self.seed,
        }
    }
}

/// Top-level quizkit configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuizkitConfig {
    #[serde(default)]
    pub bank: BankConfig,
    #[serde(default)]
    pub quiz: QuizConfig,
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    while let Some(start) = result.find("${") {
        if let Some(end) = result[start..].find('}') {
            let var_name = &result[start + 2..start + end];
            let value = std::env::var(var_name).unwrap_or_default();
            result = format!(
                "{}{}{}",
                &result[..start],
                value,
                &result[start + end + 1..]
            );
        } else {
            break;
        }
    }
    result
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `quizkit.toml` in the current directory
/// 2. `~/.config/quizkit/config.toml`
///
/// Environment variable override: `QUIZKIT_BANK_URL`.
pub fn load_config() -> Result<QuizkitConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<QuizkitConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("quizkit.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading config");
            parse_config(
                &std::fs::read_to_string(&path)
                    .with_context(|| format!("failed to read config: {}", path.display()))?,
            )
            .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => QuizkitConfig::default(),
    };

    if let Ok(url) = std::env::var("QUIZKIT_BANK_URL") {
        config.bank.base_url = url;
    }
    config.bank.base_url = resolve_env_vars(&config.bank.base_url);

    Ok(config)
}

fn parse_config(content: &str) -> Result<QuizkitConfig> {
    Ok(toml::from_str::<QuizkitConfig>(content)?)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("quizkit"))
}
