//! `AppConfig` struct and TOML read/write.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use nolly_api::catalog::DEFAULT_LANGUAGE;
use nolly_store::STORE_FILE;
use serde::{Deserialize, Serialize};
use url::Url;

/// File name of the TOML configuration.
const CONFIG_FILE: &str = "config.toml";

/// Where one profile keeps its config file and its token store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfilePaths {
    /// TOML configuration file.
    pub config_file: PathBuf,
    /// Directory holding the store database.
    pub store_dir: PathBuf,
}

impl ProfilePaths {
    /// Resolves both locations.
    ///
    /// - With `dir`, the config file and `nolly.db` both live in `dir`.
    /// - Otherwise config goes to `~/.config/nolly/` and the store to
    ///   `~/.local/share/nolly/`.
    ///
    /// # Errors
    ///
    /// Returns an error if `dir` is `None` and `HOME` is not set.
    pub fn resolve(dir: Option<&Path>) -> Result<Self> {
        if let Some(d) = dir {
            return Ok(Self {
                config_file: d.join(CONFIG_FILE),
                store_dir: d.to_path_buf(),
            });
        }

        let home = std::env::var("HOME").context("HOME environment variable is not set")?;
        let home = PathBuf::from(home);
        Ok(Self {
            config_file: home.join(".config").join("nolly").join(CONFIG_FILE),
            store_dir: home.join(".local").join("share").join("nolly"),
        })
    }

    /// Path of the store database inside `store_dir`.
    #[must_use]
    pub fn store_file(&self) -> PathBuf {
        self.store_dir.join(STORE_FILE)
    }
}

/// Top-level application configuration.
#[derive(Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct AppConfig {
    /// Movie catalog settings.
    #[serde(default)]
    pub catalog: CatalogConfig,
    /// Account service settings.
    #[serde(default)]
    pub account: AccountConfig,
    /// Query cache settings.
    #[serde(default)]
    pub query: QueryConfig,
}

/// Movie catalog configuration.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct CatalogConfig {
    /// Base URL override (default: TMDB v3).
    #[serde(default)]
    pub base_url: Option<String>,
    /// Response language.
    #[serde(default = "default_language")]
    pub language: String,
    /// ISO 3166-1 region for release-date based listings.
    #[serde(default)]
    pub region: Option<String>,
    /// Include adult titles in discover and search.
    #[serde(default)]
    pub include_adult: bool,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            language: default_language(),
            region: None,
            include_adult: false,
        }
    }
}

fn default_language() -> String {
    String::from(DEFAULT_LANGUAGE)
}

/// Account service configuration.
#[derive(Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct AccountConfig {
    /// Base URL override.
    #[serde(default)]
    pub base_url: Option<String>,
}

/// Query cache configuration.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct QueryConfig {
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
        }
    }
}

const fn default_timeout_secs() -> u64 {
    30
}

impl QueryConfig {
    /// Request timeout as a `Duration`.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Parses an optional base URL override.
///
/// # Errors
///
/// Returns an error if the URL is malformed.
pub fn parse_base_url(value: Option<&str>) -> Result<Option<Url>> {
    value
        .map(|raw| Url::parse(raw).with_context(|| format!("invalid base URL: {raw}")))
        .transpose()
}

impl AppConfig {
    /// Loads config from a TOML file. Returns default if file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
    }

    /// Saves config to a TOML file, creating parent directories if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if directory creation or file write fails.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }
        let content = toml::to_string_pretty(self).context("failed to serialize config to TOML")?;
        std::fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))
    }
}
