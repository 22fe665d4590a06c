//! Connection configuration
//!
//! Settings come from CLI flags (which clap already merges with their `VMGR_*`
//! environment variables), then the config file, then built-in defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use vmgr_client::{ClientError, HttpClient};

/// Errors in user-supplied configuration; reported with the usage exit code
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("management API URL required: use --url, VMGR_URL, or the config file")]
    MissingUrl,

    #[error("datastore required: use --ds, VMGR_DATASTORE, or the config file")]
    MissingDatastore,

    #[error("invalid management API URL: {0}")]
    InvalidUrl(#[source] ClientError),

    #[error("config file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Config file structure
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(default)]
    pub connection: ConnectionSection,
    #[serde(default)]
    pub defaults: DefaultsSection,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConnectionSection {
    /// Management API base URL
    pub url: Option<String>,
    /// Per-request timeout in seconds
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DefaultsSection {
    pub datastore: Option<String>,
    pub host: Option<String>,
}

impl ConfigFile {
    /// Parse a config file
    ///
    /// # Errors
    /// Returns error if the file cannot be read or parsed
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load `path` if given (it must exist), otherwise the first default path found
    ///
    /// # Errors
    /// Returns error if an explicit path is missing, or a found file is invalid
    pub fn discover(path: Option<&Path>) -> Result<Option<Self>, ConfigError> {
        if let Some(path) = path {
            if !path.exists() {
                return Err(ConfigError::FileNotFound(path.to_path_buf()));
            }
            return Self::load(path).map(Some);
        }

        for path in Self::default_paths() {
            if path.exists() {
                tracing::debug!(path = %path.display(), "using config file");
                return Self::load(&path).map(Some);
            }
        }

        Ok(None)
    }

    fn default_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("vmgr.toml")];
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join("vmgr").join("config.toml"));
        }
        paths
    }
}

/// Effective client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub url: String,
    pub timeout: Duration,
    /// Datastore used when `--ds` is not given
    pub datastore: Option<String>,
    /// Host used when `--host` is not given
    pub host: Option<String>,
}

impl ClientConfig {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

    /// Load configuration with precedence: CLI/env > file > defaults
    ///
    /// # Errors
    /// Returns error if the config file is invalid or no URL is configured
    pub fn load(
        config_path: Option<&Path>,
        cli_url: Option<&str>,
        cli_timeout_secs: Option<u64>,
    ) -> Result<Self, ConfigError> {
        let file = ConfigFile::discover(config_path)?;
        Self::resolve(file.unwrap_or_default(), cli_url, cli_timeout_secs)
    }

    /// Merge flag values over a parsed config file
    ///
    /// # Errors
    /// Returns error if no URL is configured
    pub fn resolve(
        file: ConfigFile,
        cli_url: Option<&str>,
        cli_timeout_secs: Option<u64>,
    ) -> Result<Self, ConfigError> {
        let url = cli_url
            .map(String::from)
            .or(file.connection.url)
            .filter(|u| !u.trim().is_empty())
            .ok_or(ConfigError::MissingUrl)?;

        let timeout = cli_timeout_secs
            .or(file.connection.timeout_secs)
            .map_or(Self::DEFAULT_TIMEOUT, Duration::from_secs);

        Ok(Self {
            url,
            timeout,
            datastore: file.defaults.datastore,
            host: file.defaults.host,
        })
    }

    /// Build the HTTP client for the configured endpoint
    ///
    /// # Errors
    /// Returns error if the URL is not a valid base URL
    pub fn http_client(&self) -> Result<HttpClient, ConfigError> {
        HttpClient::with_timeout(&self.url, self.timeout).map_err(ConfigError::InvalidUrl)
    }
}
