//! Bootstrap configuration shared by the catalog and song-info services
//!
//! Resolution follows the usual priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)
//!
//! A missing TOML file is not an error: compiled defaults are used and the
//! caller logs a warning once logging is up.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Environment variable naming the TOML config file
pub const CONFIG_PATH_ENV: &str = "MLIB_CONFIG";

/// Deployment environment, selects the log output style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Human-readable debug output
    #[default]
    Local,
    /// JSON debug output
    Dev,
    /// JSON info output
    Prod,
}

impl std::str::FromStr for Environment {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "local" => Ok(Environment::Local),
            "dev" => Ok(Environment::Dev),
            "prod" => Ok(Environment::Prod),
            other => Err(Error::Config(format!(
                "unknown env mode: {}, available modes: local, dev, prod",
                other
            ))),
        }
    }
}

/// Bootstrap configuration loaded from TOML file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub env: Environment,
    pub database: DatabaseConfig,
    pub http_server: HttpServerConfig,
    pub song_info: SongInfoConfig,
    pub logging: LoggingConfig,
}

/// PostgreSQL connection settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Full connection URL; when set, the discrete fields below are ignored
    pub url: Option<String>,
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub name: String,
    /// Upper bound for a single connection attempt
    pub connect_timeout_ms: u64,
    /// Number of connection attempts before giving up
    pub attempts: u32,
    /// Delay before the second attempt; doubles after each failure
    pub retry_delay_ms: u64,
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            host: "localhost".to_string(),
            port: 5432,
            user: "postgres".to_string(),
            password: String::new(),
            name: "music_library".to_string(),
            connect_timeout_ms: 5000,
            attempts: 5,
            retry_delay_ms: 500,
            max_connections: 10,
        }
    }
}

impl DatabaseConfig {
    /// Apply `DATABASE_URL` and `POSTGRES_*` environment overrides
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Some(url) = env_nonempty("DATABASE_URL") {
            self.url = Some(url);
        }
        if let Some(host) = env_nonempty("POSTGRES_HOST") {
            self.host = host;
        }
        if let Some(port) = env_nonempty("POSTGRES_PORT") {
            self.port = port
                .parse()
                .map_err(|_| Error::Config(format!("invalid POSTGRES_PORT value: {}", port)))?;
        }
        if let Some(user) = env_nonempty("POSTGRES_USER") {
            self.user = user;
        }
        if let Some(password) = env_nonempty("POSTGRES_PASSWORD") {
            self.password = password;
        }
        if let Some(name) = env_nonempty("POSTGRES_DB") {
            self.name = name;
        }
        Ok(())
    }

    /// Connection target for logs, without credentials
    pub fn display_target(&self) -> String {
        match &self.url {
            Some(_) => "DATABASE_URL".to_string(),
            None => format!("{}:{}/{}", self.host, self.port, self.name),
        }
    }
}

/// HTTP listener settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpServerConfig {
    pub host: String,
    pub port: u16,
    pub request_timeout_ms: u64,
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            request_timeout_ms: 10_000,
        }
    }
}

impl HttpServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Location of the song info lookup service
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SongInfoConfig {
    pub protocol: String,
    pub host: String,
    pub port: u16,
    pub timeout_ms: u64,
}

impl Default for SongInfoConfig {
    fn default() -> Self {
        Self {
            protocol: "http".to_string(),
            host: "localhost".to_string(),
            port: 8081,
            timeout_ms: 5000,
        }
    }
}

impl SongInfoConfig {
    /// Full URL of the `/info` endpoint
    pub fn info_url(&self) -> String {
        format!("{}://{}:{}/info", self.protocol, self.host, self.port)
    }
}

/// Logging configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level or filter directive (e.g. `info`, `mlib_cs=debug`)
    ///
    /// Unset means `debug` for local/dev and `info` for prod. `RUST_LOG`
    /// wins over both.
    pub level: Option<String>,
}

/// Where the effective configuration came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(PathBuf),
    /// No file found; compiled defaults in use
    Defaults,
}

/// Resolve the TOML config path
///
/// Priority: CLI argument, `MLIB_CONFIG`, then `<config dir>/mlib/config.toml`
/// if it exists. `None` means compiled defaults.
pub fn resolve_config_path(cli_arg: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = cli_arg {
        return Some(path.to_path_buf());
    }

    if let Some(path) = env_nonempty(CONFIG_PATH_ENV) {
        return Some(PathBuf::from(path));
    }

    dirs::config_dir()
        .map(|d| d.join("mlib").join("config.toml"))
        .filter(|p| p.exists())
}

/// Load configuration from `path`, falling back to defaults when it is absent
///
/// A file that exists but does not parse is an error.
pub fn load_config(path: Option<&Path>) -> Result<(TomlConfig, ConfigSource)> {
    let Some(path) = path else {
        return Ok((TomlConfig::default(), ConfigSource::Defaults));
    };

    if !path.exists() {
        return Ok((TomlConfig::default(), ConfigSource::Defaults));
    }

    let content = std::fs::read_to_string(path)?;
    let config: TomlConfig = toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))?;

    Ok((config, ConfigSource::File(path.to_path_buf())))
}

fn env_nonempty(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_from_str() {
        assert_eq!("prod".parse::<Environment>().unwrap(), Environment::Prod);
        assert_eq!(" Dev ".parse::<Environment>().unwrap(), Environment::Dev);
        assert!("staging".parse::<Environment>().is_err());
    }

    #[test]
    fn test_info_url() {
        let cfg = SongInfoConfig {
            protocol: "https".to_string(),
            host: "info.local".to_string(),
            port: 9000,
            timeout_ms: 100,
        };
        assert_eq!(cfg.info_url(), "https://info.local:9000/info");
    }

    #[test]
    fn test_display_target_hides_credentials() {
        let mut cfg = DatabaseConfig::default();
        cfg.password = "secret".to_string();
        assert!(!cfg.display_target().contains("secret"));

        cfg.url = Some("postgres://u:secret@h/db".to_string());
        assert_eq!(cfg.display_target(), "DATABASE_URL");
    }
}
