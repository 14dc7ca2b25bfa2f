//! Server configuration.
//!
//! Loaded from a TOML file; every key is optional and falls back to its
//! default. Command-line flags are applied on top by the binary.

use bookshelf_core::logging::{default_log_level, normalize_level};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::fs;
use std::path::{Path, PathBuf};

/// HTTP server and storage configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Host to bind to (default: "127.0.0.1").
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to bind to (default: 3000). `0` picks a free port.
    #[serde(default = "default_port")]
    pub port: u16,
    /// SQLite database file (default: "bookshelf.sqlite3").
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,
    /// One of `trace|debug|info|warn|error`.
    #[serde(default = "default_level")]
    pub log_level: String,
    /// Absolute directory for rolling log files; stderr when unset.
    #[serde(default)]
    pub log_dir: Option<PathBuf>,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_database_path() -> PathBuf {
    PathBuf::from("bookshelf.sqlite3")
}

fn default_level() -> String {
    default_log_level().to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            database_path: default_database_path(),
            log_level: default_level(),
            log_dir: None,
        }
    }
}

impl ServerConfig {
    /// Returns the `host:port` bind address.
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Checks every field and reports all problems at once.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut problems = Vec::new();
        if self.host.trim().is_empty() {
            problems.push("host cannot be empty".to_string());
        }
        if self.database_path.as_os_str().is_empty() {
            problems.push("database_path cannot be empty".to_string());
        }
        if let Err(err) = normalize_level(&self.log_level) {
            problems.push(err);
        }
        if let Some(dir) = &self.log_dir {
            if !dir.is_absolute() {
                problems.push(format!(
                    "log_dir must be an absolute path, got `{}`",
                    dir.display()
                ));
            }
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(problems))
        }
    }
}

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Validation(Vec<String>),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "failed to read config: {err}"),
            Self::Parse(err) => write!(f, "failed to parse config: {err}"),
            Self::Validation(problems) => {
                write!(f, "invalid config: {}", problems.join(", "))
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Parse(err) => Some(err),
            Self::Validation(_) => None,
        }
    }
}

/// Parses configuration from TOML text without validating it.
pub fn parse_config(text: &str) -> Result<ServerConfig, ConfigError> {
    toml::from_str(text).map_err(ConfigError::Parse)
}

/// Loads and validates configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<ServerConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config = parse_config(&content)?;
    config.validate()?;
    Ok(config)
}
