//! Configuration for the passmint binaries.
//!
//! Supports both command-line arguments and a shared TOML configuration
//! file. CLI arguments take precedence over config file values.

use crate::protocol::DEFAULT_ADDR;
use clap::Parser;
use serde::Deserialize;
use std::path::PathBuf;

/// Command-line arguments for the server binary.
#[derive(Parser, Debug)]
#[command(name = "passmint-server")]
#[command(version = "0.1.0")]
#[command(about = "Random password generation server", long_about = None)]
pub struct ServerArgs {
    /// Path to TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Address to bind to (e.g., 127.0.0.1:60000)
    #[arg(short = 'l', long)]
    pub listen: Option<String>,

    /// Fixed RNG seed (defaults to the current time)
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

/// Command-line arguments for the client binary.
#[derive(Parser, Debug)]
#[command(name = "passmint-client")]
#[command(version = "0.1.0")]
#[command(about = "Interactive random password generation client", long_about = None)]
pub struct ClientArgs {
    /// Path to TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Server address to connect to (e.g., 127.0.0.1:60000)
    #[arg(short = 's', long)]
    pub connect: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

/// TOML configuration file structure, shared by both binaries.
#[derive(Debug, Deserialize, Default)]
pub struct TomlConfig {
    #[serde(default)]
    pub server: ServerSection,
    #[serde(default)]
    pub client: ClientSection,
    #[serde(default)]
    pub logging: LoggingSection,
}

/// Server-related configuration
#[derive(Debug, Deserialize)]
pub struct ServerSection {
    /// Address to bind to
    #[serde(default = "default_addr")]
    pub listen: String,
    /// Fixed RNG seed
    pub seed: Option<u64>,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            listen: default_addr(),
            seed: None,
        }
    }
}

/// Client-related configuration
#[derive(Debug, Deserialize)]
pub struct ClientSection {
    /// Server address to connect to
    #[serde(default = "default_addr")]
    pub connect: String,
}

impl Default for ClientSection {
    fn default() -> Self {
        Self {
            connect: default_addr(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Deserialize)]
pub struct LoggingSection {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_addr() -> String {
    DEFAULT_ADDR.to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Final resolved server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub listen: String,
    pub seed: Option<u64>,
    pub log_level: String,
}

impl ServerConfig {
    /// Load configuration from CLI args and optional TOML file.
    /// CLI arguments take precedence over TOML file values.
    pub fn load() -> Result<Self, ConfigError> {
        Self::resolve(ServerArgs::parse())
    }

    fn resolve(cli: ServerArgs) -> Result<Self, ConfigError> {
        let toml_config = read_toml(cli.config.as_ref())?;

        Ok(ServerConfig {
            listen: cli.listen.unwrap_or(toml_config.server.listen),
            seed: cli.seed.or(toml_config.server.seed),
            log_level: if cli.log_level != "info" {
                cli.log_level
            } else {
                toml_config.logging.level
            },
        })
    }
}

/// Final resolved client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub connect: String,
    pub log_level: String,
}

impl ClientConfig {
    /// Load configuration from CLI args and optional TOML file.
    /// CLI arguments take precedence over TOML file values.
    pub fn load() -> Result<Self, ConfigError> {
        Self::resolve(ClientArgs::parse())
    }

    fn resolve(cli: ClientArgs) -> Result<Self, ConfigError> {
        let toml_config = read_toml(cli.config.as_ref())?;

        Ok(ClientConfig {
            connect: cli.connect.unwrap_or(toml_config.client.connect),
            log_level: cli.log_level,
        })
    }
}

fn read_toml(path: Option<&PathBuf>) -> Result<TomlConfig, ConfigError> {
    match path {
        Some(config_path) => {
            let contents = std::fs::read_to_string(config_path)
                .map_err(|e| ConfigError::FileRead(config_path.clone(), e))?;
            toml::from_str(&contents)
                .map_err(|e| ConfigError::TomlParse(config_path.clone(), e))
        }
        None => Ok(TomlConfig::default()),
    }
}

/// Configuration loading errors
#[derive(Debug)]
pub enum ConfigError {
    FileRead(PathBuf, std::io::Error),
    TomlParse(PathBuf, toml::de::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::FileRead(path, e) => {
                write!(f, "Failed to read config file '{}': {}", path.display(), e)
            }
            ConfigError::TomlParse(path, e) => {
                write!(f, "Failed to parse config file '{}': {}", path.display(), e)
            }
        }
    }
}

impl std::error::Error for ConfigError {}
