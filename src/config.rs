//! Application configuration
//!
//! Loaded from a TOML file. Every section and field has a default, so a
//! missing file or a partial one is fine.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::infrastructure::crypto::JwtConfig;
use crate::infrastructure::database::DatabaseConfig;
use crate::infrastructure::media::CloudinaryCredentials;

/// Environment variable that overrides the config file location.
pub const CONFIG_ENV: &str = "PLANT_BIO_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub security: SecurityConfig,
    pub database: DatabaseSection,
    pub seed: SeedConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Base address printed into QR codes, e.g. `https://plants.example.org`.
    pub public_base_url: String,
    /// Seconds to wait for in-flight requests on shutdown.
    pub shutdown_timeout: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            public_base_url: "http://localhost:5173".to_string(),
            shutdown_timeout: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `trace`, `debug`, `info`, `warn` or `error`, or any `EnvFilter` directive.
    pub level: String,
    /// `pretty` or `json`.
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    pub jwt_secret: String,
    pub jwt_expiration_hours: i64,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        let jwt = JwtConfig::default();
        Self {
            jwt_secret: jwt.secret,
            jwt_expiration_hours: jwt.expiration_hours,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSection {
    pub url: String,
    pub max_connections: u32,
}

impl Default for DatabaseSection {
    fn default() -> Self {
        let db = DatabaseConfig::default();
        Self {
            url: db.url,
            max_connections: db.max_connections,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SeedConfig {
    /// Seed the demo admin and student into an empty user collection.
    pub demo_accounts: bool,
    /// Seed the five demo plants into an empty plant collection.
    pub demo_plants: bool,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            demo_accounts: true,
            demo_plants: false,
        }
    }
}

impl AppConfig {
    /// Read `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&raw)?)
    }

    /// Write the config to `path`, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn jwt_config(&self) -> JwtConfig {
        JwtConfig {
            secret: self.security.jwt_secret.clone(),
            expiration_hours: self.security.jwt_expiration_hours,
            ..Default::default()
        }
    }

    pub fn database_config(&self) -> DatabaseConfig {
        DatabaseConfig {
            url: self.database.url.clone(),
            max_connections: self.database.max_connections,
        }
    }

    pub fn listen_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

/// Upload proxy settings, read from the environment.
#[derive(Debug, Clone)]
pub struct UploadConfig {
    pub allowed_origin: String,
    pub cloudinary: Option<CloudinaryCredentials>,
    /// When set, callers must send it in `x-upload-secret`.
    pub upload_secret: Option<String>,
    pub port: u16,
}

impl UploadConfig {
    pub const DEFAULT_ORIGIN: &'static str = "http://localhost:5173";
    pub const DEFAULT_PORT: u16 = 4000;

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`from_env`](Self::from_env) over an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match lookup("PORT").filter(|p| !p.is_empty()) {
            Some(raw) => raw.parse().map_err(|e: std::num::ParseIntError| ConfigError::Invalid {
                name: "PORT",
                reason: e.to_string(),
            })?,
            None => Self::DEFAULT_PORT,
        };

        Ok(Self {
            allowed_origin: lookup("ALLOWED_ORIGIN")
                .filter(|o| !o.is_empty())
                .unwrap_or_else(|| Self::DEFAULT_ORIGIN.to_string()),
            cloudinary: CloudinaryCredentials::from_parts(
                lookup("CLOUDINARY_CLOUD_NAME"),
                lookup("CLOUDINARY_API_KEY"),
                lookup("CLOUDINARY_API_SECRET"),
            ),
            upload_secret: lookup("UPLOAD_SECRET").filter(|s| !s.is_empty()),
            port,
        })
    }
}

/// `$PLANT_BIO_CONFIG`, else `~/.config/plant-bio/config.toml`.
pub fn default_config_path() -> PathBuf {
    if let Some(path) = std::env::var_os(CONFIG_ENV) {
        return PathBuf::from(path);
    }
    dirs_next::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("plant-bio")
        .join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = AppConfig::load(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg.server.port, 8080);
        assert!(cfg.seed.demo_accounts);
        assert!(!cfg.seed.demo_plants);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[server]\nport = 9100\npublic_base_url = \"https://plants.example.org\"\n\n[logging]\nformat = \"json\"\n",
        )
        .unwrap();

        let cfg = AppConfig::load(&path).unwrap();
        assert_eq!(cfg.server.port, 9100);
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.server.public_base_url, "https://plants.example.org");
        assert_eq!(cfg.logging.format, "json");
        assert_eq!(cfg.logging.level, "info");
    }

    #[test]
    fn save_then_load_keeps_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = AppConfig::default();
        cfg.database.url = "sqlite://./custom.db?mode=rwc".into();
        cfg.seed.demo_plants = true;
        cfg.save(&path).unwrap();

        let back = AppConfig::load(&path).unwrap();
        assert_eq!(back.database.url, "sqlite://./custom.db?mode=rwc");
        assert!(back.seed.demo_plants);
    }

    #[test]
    fn upload_config_defaults() {
        let cfg = UploadConfig::from_lookup(|_| None).unwrap();
        assert_eq!(cfg.allowed_origin, "http://localhost:5173");
        assert_eq!(cfg.port, 4000);
        assert!(cfg.cloudinary.is_none());
        assert!(cfg.upload_secret.is_none());
    }

    #[test]
    fn upload_config_needs_all_three_credentials() {
        let env = |name: &str| match name {
            "CLOUDINARY_CLOUD_NAME" => Some("demo".to_string()),
            "CLOUDINARY_API_KEY" => Some("key".to_string()),
            "PORT" => Some("4100".to_string()),
            "UPLOAD_SECRET" => Some("s3cret".to_string()),
            _ => None,
        };
        let cfg = UploadConfig::from_lookup(env).unwrap();
        assert!(cfg.cloudinary.is_none());
        assert_eq!(cfg.port, 4100);
        assert_eq!(cfg.upload_secret.as_deref(), Some("s3cret"));
    }

    #[test]
    fn upload_config_rejects_bad_port() {
        let env = |name: &str| (name == "PORT").then(|| "http".to_string());
        assert!(matches!(
            UploadConfig::from_lookup(env),
            Err(ConfigError::Invalid { name: "PORT", .. })
        ));
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[server\nport = ").unwrap();
        assert!(matches!(AppConfig::load(&path), Err(ConfigError::Parse(_))));
    }
}
