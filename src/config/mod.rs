//! Configuration management.
//!
//! Settings come from a TOML file, overridden by `SPECIES_CATALOG_*`
//! environment variables (nested keys separated by `__`, e.g.
//! `SPECIES_CATALOG_STORE__API_KEY`).
//!
//! ```toml
//! [encyclopedia]
//! base_url = "https://en.wikipedia.org/w/api.php"
//! result_limit = 20
//! thumbnail_size = 100
//! timeout_seconds = 30
//!
//! [store]
//! url = "https://your-project.supabase.co"
//! api_key = "your-anon-key"
//! table = "species"
//!
//! [viewer]
//! user_id = "00000000-0000-0000-0000-000000000000"
//!
//! [logging]
//! level = "info"
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::search::WIKIPEDIA_API_BASE;

/// Environment variable prefix for overrides
pub const ENV_PREFIX: &str = "SPECIES_CATALOG";

/// File name looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "species-catalog.toml";

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Encyclopedia search settings
    #[serde(default)]
    pub encyclopedia: EncyclopediaConfig,

    /// Record store settings
    #[serde(default)]
    pub store: StoreConfig,

    /// Identity of the person using the catalogue
    #[serde(default)]
    pub viewer: ViewerConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Encyclopedia search configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncyclopediaConfig {
    /// Action API endpoint
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Maximum ranked results requested per search
    #[serde(default = "default_result_limit")]
    pub result_limit: u32,

    /// Thumbnail width in pixels
    #[serde(default = "default_thumbnail_size")]
    pub thumbnail_size: u32,

    /// Per-request timeout
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// User agent sent with every request
    #[serde(default)]
    pub user_agent: Option<String>,
}

impl Default for EncyclopediaConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            result_limit: default_result_limit(),
            thumbnail_size: default_thumbnail_size(),
            timeout_seconds: default_timeout(),
            user_agent: None,
        }
    }
}

fn default_base_url() -> String {
    WIKIPEDIA_API_BASE.to_string()
}

fn default_result_limit() -> u32 {
    20
}

fn default_thumbnail_size() -> u32 {
    100
}

fn default_timeout() -> u64 {
    30
}

/// Record store configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Project URL of the PostgREST host
    #[serde(default)]
    pub url: Option<String>,

    /// API key sent as `apikey` and bearer token
    #[serde(default)]
    pub api_key: Option<String>,

    /// Table holding species records
    #[serde(default = "default_table")]
    pub table: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            url: None,
            api_key: None,
            table: default_table(),
        }
    }
}

fn default_table() -> String {
    "species".to_string()
}

/// Viewer configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewerConfig {
    /// Author identifier of the current user
    #[serde(default)]
    pub user_id: Option<String>,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Save configuration to a TOML file
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Load configuration from a file, with environment overrides
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let settings = config::Config::builder()
        .add_source(config::File::from(path))
        .add_source(env_source())
        .build()?;

    Ok(settings.try_deserialize()?)
}

/// Configuration from environment overrides and defaults only
pub fn get_config() -> Result<Config, ConfigError> {
    let settings = config::Config::builder().add_source(env_source()).build()?;
    Ok(settings.try_deserialize()?)
}

fn env_source() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
}

/// Find a configuration file in the usual places.
///
/// Looks for `species-catalog.toml` in the working directory, then
/// `<config dir>/species-catalog/config.toml`.
pub fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.is_file() {
        return Some(local);
    }

    default_config_path().filter(|path| path.is_file())
}

/// Per-user configuration file location
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("species-catalog").join("config.toml"))
}
