//! Configuration loading and resolution
//!
//! Each setting is resolved in priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Environment variable overriding the bind host
pub const ENV_HOST: &str = "HORUS_HOST";
/// Environment variable overriding the listen port
pub const ENV_PORT: &str = "HORUS_PORT";
/// Environment variable overriding the record storage root
pub const ENV_DATA_DIR: &str = "HORUS_DATA_DIR";

/// Compiled fallback values
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledDefaults {
    pub host: String,
    pub port: u16,
    pub data_dir: PathBuf,
}

impl Default for CompiledDefaults {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            data_dir: PathBuf::from("match_records"),
        }
    }
}

/// Contents of `config.toml`; every key is optional
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct TomlConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub data_dir: Option<PathBuf>,
}

impl TomlConfig {
    /// Parse TOML text
    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Read and parse a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }
}

/// Values supplied on the command line
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub data_dir: Option<PathBuf>,
    /// Explicit config file; failure to load it is an error
    pub config_file: Option<PathBuf>,
}

/// Fully resolved service configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub host: String,
    pub port: u16,
    pub data_dir: PathBuf,
}

impl ServiceConfig {
    /// Resolve configuration from CLI, environment, TOML file and defaults
    pub fn resolve(cli: &CliOverrides) -> Result<Self> {
        let toml = match &cli.config_file {
            Some(path) => TomlConfig::load(path).map_err(|e| {
                Error::Config(format!("Failed to load {}: {}", path.display(), e))
            })?,
            None => load_default_config_file(),
        };
        let defaults = CompiledDefaults::default();

        let host = cli
            .host
            .clone()
            .or_else(|| std::env::var(ENV_HOST).ok())
            .or(toml.host)
            .unwrap_or(defaults.host);

        let port = match cli.port {
            Some(port) => port,
            None => match env_port()? {
                Some(port) => port,
                None => toml.port.unwrap_or(defaults.port),
            },
        };

        let data_dir = cli
            .data_dir
            .clone()
            .or_else(|| std::env::var(ENV_DATA_DIR).ok().map(PathBuf::from))
            .or(toml.data_dir)
            .unwrap_or(defaults.data_dir);

        Ok(Self {
            host,
            port,
            data_dir,
        })
    }

    /// Socket address string suitable for `TcpListener::bind`
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn env_port() -> Result<Option<u16>> {
    match std::env::var(ENV_PORT) {
        Ok(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| Error::Config(format!("{} is not a valid port: {:?}", ENV_PORT, value))),
        Err(_) => Ok(None),
    }
}

/// Platform config file path: `<config_dir>/horus/config.toml`
pub fn default_config_file() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("horus").join("config.toml"))
}

/// Missing or malformed default config file degrades to compiled defaults
fn load_default_config_file() -> TomlConfig {
    let Some(path) = default_config_file() else {
        return TomlConfig::default();
    };
    if !path.exists() {
        return TomlConfig::default();
    }
    match TomlConfig::load(&path) {
        Ok(config) => config,
        Err(e) => {
            warn!("Ignoring config file {}: {}", path.display(), e);
            TomlConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compiled_defaults() {
        let defaults = CompiledDefaults::default();
        assert_eq!(defaults.host, "0.0.0.0");
        assert_eq!(defaults.port, 5000);
        assert_eq!(defaults.data_dir, PathBuf::from("match_records"));
    }

    #[test]
    fn test_toml_partial() {
        let config = TomlConfig::parse("port = 8080\n").unwrap();
        assert_eq!(config.port, Some(8080));
        assert!(config.host.is_none());
        assert!(config.data_dir.is_none());
    }

    #[test]
    fn test_toml_rejects_bad_port() {
        let result = TomlConfig::parse("port = \"eighty\"\n");
        assert!(matches!(result, Err(Error::Toml(_))));
    }

    #[test]
    fn test_bind_addr() {
        let config = ServiceConfig {
            host: "127.0.0.1".to_string(),
            port: 5001,
            data_dir: PathBuf::from("records"),
        };
        assert_eq!(config.bind_addr(), "127.0.0.1:5001");
    }
}
