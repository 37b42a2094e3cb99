//! Configuration management for oceandash.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::PathBuf;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::Collection;

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Configuration directory name.
const CONFIG_DIR_NAME: &str = "oceandash";

/// Prefix for namespaced environment variables, e.g. `OCEANDASH_SERVER__PORT`.
pub const ENV_PREFIX: &str = "OCEANDASH_";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. `PORT`, `HOST`, `DATABASE_URL` and `DATABASE_NAME`
/// 2. Environment variables prefixed with `OCEANDASH_`
/// 3. TOML config file at `~/.config/oceandash/config.toml`
/// 4. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP listener configuration.
    pub server: ServerConfig,
    /// Document store configuration.
    pub database: DatabaseConfig,
    /// Cross-origin policy.
    pub cors: CorsConfig,
    /// Default list sizes per collection.
    pub limits: ListLimits,
}

/// HTTP listener configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to bind.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
}

/// Document store configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Connection string. When unset the store is reported as not available.
    pub url: Option<String>,
    /// Logical database name.
    pub name: String,
}

/// Cross-origin policy. Origins, methods and headers are always mirrored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    /// Allow cookies and authorization headers on cross-origin requests.
    pub allow_credentials: bool,
}

/// Number of documents returned by a list call without `limit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListLimits {
    /// `GET /api/vessels`.
    pub vessels: usize,
    /// `GET /api/missions`.
    pub missions: usize,
    /// `GET /api/logs`.
    pub logs: usize,
    /// `GET /api/telemetry`.
    pub telemetry: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            name: "oceandash".to_string(),
        }
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allow_credentials: true,
        }
    }
}

impl Default for ListLimits {
    fn default() -> Self {
        Self {
            vessels: Collection::Vessel.default_limit(),
            missions: Collection::Mission.default_limit(),
            logs: Collection::CrewLog.default_limit(),
            telemetry: Collection::Telemetry.default_limit(),
        }
    }
}

impl ListLimits {
    /// The default limit for one collection.
    #[must_use]
    pub const fn for_collection(&self, collection: Collection) -> usize {
        match collection {
            Collection::Vessel => self.vessels,
            Collection::Mission => self.missions,
            Collection::CrewLog => self.logs,
            Collection::Telemetry => self.telemetry,
        }
    }
}

impl Config {
    /// Load configuration from all sources, reading the TOML file at
    /// `config_path` or the default location.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let config: Config = Self::figment(config_file).extract()?;
        config.validate()?;
        Ok(config)
    }

    fn figment(config_file: PathBuf) -> Figment {
        Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(config_file).nested())
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .merge(well_known_env())
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(CONFIG_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(Error::ConfigValidation {
                message: "server.port must be greater than 0".to_string(),
            });
        }

        if self.server.host.trim().is_empty() {
            return Err(Error::ConfigValidation {
                message: "server.host must not be empty".to_string(),
            });
        }

        if self.database.name.trim().is_empty() {
            return Err(Error::ConfigValidation {
                message: "database.name must not be empty".to_string(),
            });
        }

        Ok(())
    }

    /// The `host:port` pair the server listens on.
    #[must_use]
    pub fn listen_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

/// Unprefixed variables that deployment platforms set directly.
fn well_known_env() -> Env {
    Env::raw().filter_map(|key| match key.as_str().to_ascii_uppercase().as_str() {
        "PORT" => Some("server.port".into()),
        "HOST" => Some("server.host".into()),
        "DATABASE_URL" => Some("database.url".into()),
        "DATABASE_NAME" => Some("database.name".into()),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8000);
        assert!(config.database.url.is_none());
        assert_eq!(config.database.name, "oceandash");
        assert!(config.cors.allow_credentials);
    }

    #[test]
    fn test_default_limits() {
        let limits = ListLimits::default();

        assert_eq!(limits.for_collection(Collection::Vessel), 50);
        assert_eq!(limits.for_collection(Collection::Mission), 50);
        assert_eq!(limits.for_collection(Collection::CrewLog), 100);
        assert_eq!(limits.for_collection(Collection::Telemetry), 200);
    }

    #[test]
    fn test_validate_valid_config() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_zero_port() {
        let mut config = Config::default();
        config.server.port = 0;

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("server.port"));
    }

    #[test]
    fn test_validate_empty_database_name() {
        let mut config = Config::default();
        config.database.name = "  ".to_string();

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("database.name"));
    }

    #[test]
    fn test_validate_empty_host() {
        let mut config = Config::default();
        config.server.host = String::new();

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_listen_address() {
        let mut config = Config::default();
        config.server.host = "127.0.0.1".to_string();
        config.server.port = 9000;

        assert_eq!(config.listen_address(), "127.0.0.1:9000");
    }

    #[test]
    fn test_default_config_path() {
        let path = Config::default_config_path();
        assert!(path.to_string_lossy().contains("oceandash"));
        assert!(path.to_string_lossy().contains("config.toml"));
    }

    #[test]
    fn test_load_nonexistent_config() {
        Jail::expect_with(|_jail| {
            let config = Config::load_from(Some(PathBuf::from("/nonexistent/config.toml")))
                .map_err(|e| e.to_string())?;
            assert_eq!(config, Config::default());
            Ok(())
        });
    }

    #[test]
    fn test_load_toml_file() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "config.toml",
                r#"
                [server]
                port = 9100

                [database]
                url = "sqlite::memory:"

                [limits]
                telemetry = 25
                "#,
            )?;

            let config = Config::load_from(Some(PathBuf::from("config.toml")))
                .map_err(|e| e.to_string())?;
            assert_eq!(config.server.port, 9100);
            assert_eq!(config.server.host, "0.0.0.0");
            assert_eq!(config.database.url.as_deref(), Some("sqlite::memory:"));
            assert_eq!(config.limits.telemetry, 25);
            assert_eq!(config.limits.logs, 100);
            Ok(())
        });
    }

    #[test]
    fn test_prefixed_env_overrides_file() {
        Jail::expect_with(|jail| {
            jail.create_file("config.toml", "[server]\nport = 9100\n")?;
            jail.set_env("OCEANDASH_SERVER__PORT", "9200");
            jail.set_env("OCEANDASH_DATABASE__NAME", "research");

            let config = Config::load_from(Some(PathBuf::from("config.toml")))
                .map_err(|e| e.to_string())?;
            assert_eq!(config.server.port, 9200);
            assert_eq!(config.database.name, "research");
            Ok(())
        });
    }

    #[test]
    fn test_well_known_env() {
        Jail::expect_with(|jail| {
            jail.set_env("OCEANDASH_SERVER__PORT", "9200");
            jail.set_env("PORT", "8080");
            jail.set_env("DATABASE_URL", "sqlite:///tmp/ocean.db");
            jail.set_env("DATABASE_NAME", "fleet");

            let config = Config::load_from(Some(PathBuf::from("missing.toml")))
                .map_err(|e| e.to_string())?;
            assert_eq!(config.server.port, 8080);
            assert_eq!(
                config.database.url.as_deref(),
                Some("sqlite:///tmp/ocean.db")
            );
            assert_eq!(config.database.name, "fleet");
            Ok(())
        });
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        Jail::expect_with(|jail| {
            jail.set_env("PORT", "0");

            let err = Config::load_from(Some(PathBuf::from("missing.toml"))).unwrap_err();
            assert!(matches!(err, Error::ConfigValidation { .. }));
            Ok(())
        });
    }

    #[test]
    fn test_load_rejects_malformed_port() {
        Jail::expect_with(|jail| {
            jail.set_env("PORT", "harbor");

            let err = Config::load_from(Some(PathBuf::from("missing.toml"))).unwrap_err();
            assert!(matches!(err, Error::ConfigLoad(_)));
            Ok(())
        });
    }

    #[test]
    fn test_config_serialize() {
        let json = serde_json::to_string(&Config::default()).unwrap();
        assert!(json.contains("allow_credentials"));
        assert!(json.contains("telemetry"));
    }

    #[test]
    fn test_limits_deserialize_partial() {
        let limits: ListLimits = serde_json::from_str(r#"{"logs": 5}"#).unwrap();
        assert_eq!(limits.logs, 5);
        assert_eq!(limits.vessels, 50);
    }
}
