//! Application configuration.
//!
//! Defaults, optionally overridden by `config.yaml` in the data directory,
//! then by environment variables:
//!
//! - `EU_POR_INTEIRO_DATA_DIR`: data directory
//! - `EU_POR_INTEIRO_YEAR`: target year of the journey
//! - `EU_POR_INTEIRO_BIND`: listen address
//! - `EU_POR_INTEIRO_FORCE_UNLOCK`: `true`/`1` opens the journey before its start date
//! - `GEMINI_API_KEY`: key for monthly summaries

use anyhow::{Context, Result};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::backend::storage::json::connection::{default_data_directory, DEFAULT_MAX_STORE_BYTES};

pub const CONFIG_FILE: &str = "config.yaml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryConfig {
    pub api_base: String,
    pub model: String,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            api_base: "https://generativelanguage.googleapis.com".to_string(),
            model: "gemini-2.5-flash".to_string(),
            api_key: None,
            timeout_secs: 60,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub data_directory: PathBuf,
    pub target_year: i32,
    pub bind_address: String,
    pub allowed_origin: String,
    /// Per-category storage quota in bytes
    pub max_store_bytes: u64,
    pub image_max_dimension: u32,
    pub image_jpeg_quality: u8,
    pub force_unlock: bool,
    pub summary: SummaryConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_directory: default_data_directory(),
            target_year: 2026,
            bind_address: "127.0.0.1:3000".to_string(),
            allowed_origin: "http://localhost:8080".to_string(),
            max_store_bytes: DEFAULT_MAX_STORE_BYTES,
            image_max_dimension: 800,
            image_jpeg_quality: 60,
            force_unlock: false,
            summary: SummaryConfig::default(),
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

impl AppConfig {
    /// Load configuration from the process environment
    pub fn load() -> Result<Self> {
        Self::load_with(|key| std::env::var(key).ok())
    }

    /// Load configuration with a custom variable lookup
    pub fn load_with<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let data_directory = lookup("EU_POR_INTEIRO_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(default_data_directory);

        let mut config = Self::from_file(&data_directory.join(CONFIG_FILE))?;
        config.data_directory = data_directory;
        config.apply_env(lookup);
        Ok(config)
    }

    /// Read a YAML config file, or the defaults when it does not exist
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: Self = serde_yaml::from_str(&content)
            .with_context(|| format!("Invalid configuration in {}", path.display()))?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(year) = lookup("EU_POR_INTEIRO_YEAR") {
            match year.trim().parse() {
                Ok(year) => self.target_year = year,
                Err(_) => warn!("Ignoring EU_POR_INTEIRO_YEAR={}: not a year", year),
            }
        }
        if let Some(bind) = lookup("EU_POR_INTEIRO_BIND") {
            self.bind_address = bind;
        }
        if let Some(flag) = lookup("EU_POR_INTEIRO_FORCE_UNLOCK") {
            match parse_flag(&flag) {
                Some(force) => self.force_unlock = force,
                None => warn!("Ignoring EU_POR_INTEIRO_FORCE_UNLOCK={}: not a flag", flag),
            }
        }
        if let Some(key) = lookup("GEMINI_API_KEY").filter(|k| !k.trim().is_empty()) {
            self.summary.api_key = Some(key);
        }
    }
}
