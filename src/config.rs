//! Gemini configuration and API key resolution.
//!
//! Settings are layered: serde defaults, then an optional TOML file, then
//! environment variables. The API key is resolved once at startup and
//! handed to whatever constructs the client.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Environment variables consulted for the API key, in priority order.
pub const API_KEY_VARS: [&str; 3] = ["API_KEY", "VITE_GEMINI_API_KEY", "GEMINI_API_KEY"];

/// Default model used for every request.
pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";

/// Default base URL of the Generative Language API.
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Resolve the API key from an ordered list of sources.
///
/// The first non-empty value wins and is returned as-is; whitespace counts
/// as a value. `lookup` maps a variable name to its value, which lets
/// callers resolve from the process environment or from any other source.
pub fn resolve_api_key<F>(lookup: F) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    API_KEY_VARS
        .into_iter()
        .find_map(|name| lookup(name).filter(|v| !v.is_empty()))
}

/// Configuration for the Gemini client.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct GeminiConfig {
    /// API key (never printed)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Model identifier used for all requests
    #[serde(default = "default_model")]
    pub model: String,
    /// API base URL, without trailing `/models`
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_timeout_secs() -> u64 {
    120
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_model(),
            endpoint: default_endpoint(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("endpoint", &self.endpoint)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// On-disk layout: everything lives under a `[gemini]` table.
#[derive(Debug, Default, Deserialize)]
struct SettingsFile {
    #[serde(default)]
    gemini: GeminiConfig,
}

impl GeminiConfig {
    /// Load configuration from an optional TOML file, then apply
    /// environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let base = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        Ok(base.with_env_overrides())
    }

    /// Read the `[gemini]` table of a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let file: SettingsFile = toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("Loaded config from {}", path.display());
        Ok(file.gemini)
    }

    /// Apply overrides from the process environment.
    ///
    /// Supported env vars:
    /// - `API_KEY`, `VITE_GEMINI_API_KEY`, `GEMINI_API_KEY`: API key, first non-empty wins
    /// - `GEMINI_MODEL`: model identifier
    /// - `GEMINI_ENDPOINT`: API base URL
    /// - `GEMINI_TIMEOUT_SECS`: request timeout (0 is ignored)
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|name| std::env::var(name).ok())
    }

    /// Apply overrides from an arbitrary variable source.
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = resolve_api_key(&lookup) {
            self.api_key = Some(key);
        }
        if let Some(model) = lookup("GEMINI_MODEL").filter(|v| !v.is_empty()) {
            self.model = model;
        }
        if let Some(endpoint) = lookup("GEMINI_ENDPOINT").filter(|v| !v.is_empty()) {
            self.endpoint = endpoint;
        }
        if let Some(secs) = lookup("GEMINI_TIMEOUT_SECS")
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|secs| *secs > 0)
        {
            self.timeout_secs = secs;
        }
        self
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Whether a usable API key is configured.
    pub fn is_available(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.is_empty())
    }
}
