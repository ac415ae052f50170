use anyhow::{Context, Result};
use confyg::{env, Confygery};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Collection used when none is configured.
pub const DEFAULT_COLLECTION: &str = "images";

/// Embedding width used when none is configured.
pub const DEFAULT_VECTOR_SIZE: u64 = 512;

/// Unprefixed variables read when the `SEMSEARCH_*` equivalent is unset.
const FALLBACK_URL: &str = "QDRANT_URL";
const FALLBACK_API_KEY: &str = "QDRANT_API_KEY";
const FALLBACK_COLLECTION: &str = "QDRANT_COLLECTION";
const FALLBACK_VECTOR_SIZE: &str = "VECTOR_SIZE";

/// Configuration for the semsearch tools.
///
/// Configuration is loaded from multiple sources with the following priority:
/// 1. Environment variables (SEMSEARCH_* prefix)
/// 2. Config file (~/.config/semsearch/config.toml)
/// 3. Unprefixed environment variables (QDRANT_URL, QDRANT_API_KEY,
///    QDRANT_COLLECTION, VECTOR_SIZE)
/// 4. Built-in defaults (lowest priority)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the Qdrant HTTP API.
    ///
    /// Can be set via:
    /// - ENV: SEMSEARCH_QDRANT_URL or QDRANT_URL
    /// - Config: qdrant_url = "http://localhost:6333"
    pub qdrant_url: Option<String>,

    /// Qdrant API key, sent as the `api-key` header.
    ///
    /// Can be set via:
    /// - ENV: SEMSEARCH_QDRANT_API_KEY or QDRANT_API_KEY
    /// - Config: qdrant_api_key = "..."
    pub qdrant_api_key: Option<String>,

    /// Name of the collection provisioned by `ensure-collection`.
    ///
    /// Default: "images"
    pub qdrant_collection: Option<String>,

    /// Dimensionality of the vectors stored in the collection.
    ///
    /// Default: 512
    #[serde(default, deserialize_with = "flexible::option")]
    pub vector_size: Option<u64>,

    /// Per-request timeout for the Qdrant client, in seconds.
    #[serde(default = "default_timeout_secs", deserialize_with = "flexible::deserialize")]
    pub timeout_secs: u64,

    /// Manifest rewritten by `semsearch pin`.
    ///
    /// Default: requirements.txt (relative to the working directory)
    #[serde(default = "default_requirements_path")]
    pub requirements_path: PathBuf,

    /// Python interpreter asked for its `sys.path` when no site-packages
    /// directories are configured.
    #[serde(default = "default_python")]
    pub python: String,

    /// Site-packages directories searched for installed distributions.
    ///
    /// Accepts a TOML array or, from the environment, an OS path list
    /// (`:`-separated on Unix).
    #[serde(default, deserialize_with = "path_list::deserialize")]
    pub site_packages: Vec<PathBuf>,

    /// Log level: trace, debug, info, warn or error.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Whether log output is coloured.
    #[serde(default = "default_true", deserialize_with = "flexible::deserialize")]
    pub log_coloured: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            qdrant_url: None,
            qdrant_api_key: None,
            qdrant_collection: None,
            vector_size: None,
            timeout_secs: default_timeout_secs(),
            requirements_path: default_requirements_path(),
            python: default_python(),
            site_packages: Vec::new(),
            log_level: default_log_level(),
            log_coloured: true,
        }
    }
}

impl Config {
    /// Load configuration from file and environment variables.
    ///
    /// Searches for config file at: ~/.config/semsearch/config.toml
    /// Reads environment variables with SEMSEARCH_ prefix, then fills any
    /// remaining Qdrant settings from the unprefixed variables.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed.
    pub fn load() -> Result<Self> {
        let config_path = config_file_path();

        let mut builder = Confygery::new()
            .context("Failed to create config builder")?;

        if config_path.exists() {
            let path_str = config_path.to_str()
                .ok_or_else(|| anyhow::anyhow!("Config path contains invalid UTF-8"))?;
            builder.add_file(path_str)
                .context("Failed to load config file")?;
        }

        let env_opts = env::Options::with_top_level("semsearch");
        builder.add_env(env_opts)
            .context("Failed to load environment variables")?;

        let mut config: Self = builder.build()
            .context("Failed to build configuration")?;

        config.apply_env_fallbacks(|key| std::env::var(key).ok());

        Ok(config)
    }

    /// Fill unset Qdrant settings from the unprefixed variables.
    ///
    /// Empty values count as unset.
    pub fn apply_env_fallbacks<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if self.qdrant_url.is_none() {
            self.qdrant_url = lookup(FALLBACK_URL);
        }
        if self.qdrant_api_key.is_none() {
            self.qdrant_api_key = lookup(FALLBACK_API_KEY);
        }
        if self.qdrant_collection.is_none() {
            self.qdrant_collection = lookup(FALLBACK_COLLECTION);
        }
        if self.vector_size.is_none() {
            match lookup(FALLBACK_VECTOR_SIZE).map(|raw| raw.trim().parse::<u64>()) {
                Some(Ok(size)) => self.vector_size = Some(size),
                Some(Err(e)) => log::warn!("Ignoring {}: {}", FALLBACK_VECTOR_SIZE, e),
                None => {}
            }
        }
    }

    /// Target collection name.
    pub fn collection(&self) -> &str {
        self.qdrant_collection.as_deref().unwrap_or(DEFAULT_COLLECTION)
    }

    /// Target vector dimensionality.
    pub fn vector_size(&self) -> u64 {
        self.vector_size.unwrap_or(DEFAULT_VECTOR_SIZE)
    }
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_requirements_path() -> PathBuf {
    PathBuf::from("requirements.txt")
}

fn default_python() -> String {
    String::from("python3")
}

fn default_log_level() -> String {
    String::from("info")
}

fn default_true() -> bool {
    true
}

/// Get the config file path.
///
/// Returns:
/// - Linux: ~/.config/semsearch/config.toml
/// - macOS: ~/Library/Application Support/semsearch/config.toml
/// - Windows: %APPDATA%\semsearch\config.toml
pub fn config_file_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("semsearch")
        .join("config.toml")
}

/// Get the example config file content.
pub fn example_config() -> &'static str {
    r#"# Semsearch Configuration File
#
# Configuration is loaded from multiple sources with the following priority:
# 1. Environment variables (SEMSEARCH_* prefix)
# 2. This config file
# 3. Unprefixed QDRANT_URL, QDRANT_API_KEY, QDRANT_COLLECTION, VECTOR_SIZE
# 4. Built-in defaults (lowest priority)

# Qdrant HTTP endpoint
#
# Can also be set via:
# - Environment: SEMSEARCH_QDRANT_URL=http://localhost:6333
qdrant_url = "http://localhost:6333"

# Qdrant API key (leave unset for an unauthenticated local instance)
#qdrant_api_key = "your-qdrant-api-key-here"

# Collection created by `semsearch ensure-collection`
qdrant_collection = "images"

# Dimensionality of the stored embeddings
vector_size = 512

# Request timeout in seconds
timeout_secs = 30

# Manifest rewritten by `semsearch pin`
requirements_path = "requirements.txt"

# Interpreter used to discover site-packages when none are listed below
python = "python3"

# Site-packages directories to search instead of asking the interpreter
#site_packages = ["/path/to/venv/lib/python3.12/site-packages"]

# Logging
log_level = "info"
log_coloured = true
"#
}

/// Create default config file if it doesn't exist.
///
/// Returns true if a new file was created, false if it already existed.
pub fn ensure_config_file() -> Result<bool> {
    let config_path = config_file_path();

    if config_path.exists() {
        return Ok(false);
    }

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)
            .context("Failed to create config directory")?;
    }

    std::fs::write(&config_path, example_config())
        .context("Failed to write config file")?;

    Ok(true)
}

/// Accepts either a native TOML value or its string form, since
/// environment variables always arrive as strings.
mod flexible {
    use serde::{Deserialize, Deserializer};
    use std::fmt::Display;
    use std::str::FromStr;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum ValueOrText<T> {
        Value(T),
        Text(String),
    }

    pub fn deserialize<'de, D, T>(deserializer: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de> + FromStr,
        T::Err: Display,
    {
        match ValueOrText::<T>::deserialize(deserializer)? {
            ValueOrText::Value(value) => Ok(value),
            ValueOrText::Text(text) => text.trim().parse().map_err(serde::de::Error::custom),
        }
    }

    pub fn option<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de> + FromStr,
        T::Err: Display,
    {
        deserialize(deserializer).map(Some)
    }
}

mod path_list {
    use serde::{Deserialize, Deserializer};
    use std::path::PathBuf;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum PathList {
        List(Vec<PathBuf>),
        Joined(String),
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<PathBuf>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match PathList::deserialize(deserializer)? {
            PathList::List(paths) => paths,
            PathList::Joined(joined) => std::env::split_paths(&joined)
                .filter(|path| !path.as_os_str().is_empty())
                .collect(),
        })
    }
}
