use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,

    pub server: ServerConfig,

    pub metadata: MetadataConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            general: GeneralConfig::default(),
            server: ServerConfig::default(),
            metadata: MetadataConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub database_path: String,

    pub log_level: String,

    /// 0 lets the runtime pick.
    pub worker_threads: usize,

    pub max_db_connections: u32,

    pub min_db_connections: u32,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            database_path: "sqlite:lokarr.db".to_string(),
            log_level: "info".to_string(),
            worker_threads: 0,
            max_db_connections: 5,
            min_db_connections: 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub enabled: bool,

    pub port: u16,

    pub cors_allowed_origins: Vec<String>,

    /// Session inactivity expiry.
    pub session_minutes: i64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            port: 6767,
            cors_allowed_origins: vec!["*".to_string()],
            session_minutes: 60,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MetadataConfig {
    /// Base URL of the external video metadata source.
    pub source_url: String,

    pub request_timeout_seconds: u64,
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self {
            source_url: "http://localhost:9005".to_string(),
            request_timeout_seconds: 30,
        }
    }
}

impl Config {
    /// `LOKARR_CONFIG` wins, then `./config.toml`, then the user config dir.
    #[must_use]
    pub fn config_path() -> PathBuf {
        if let Ok(path) = std::env::var("LOKARR_CONFIG") {
            return PathBuf::from(path);
        }

        let local = PathBuf::from("config.toml");
        if local.exists() {
            return local;
        }

        dirs::config_dir().map_or(local, |dir| dir.join("lokarr").join("config.toml"))
    }

    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let path = Self::config_path();
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let config: Self = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config: {}", path.display()))?;

        Ok(config)
    }

    pub fn create_default_if_missing() -> Result<()> {
        let path = Self::config_path();
        if path.exists() {
            info!("Config already exists at {}", path.display());
            return Ok(());
        }

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(&Self::default())?;
        std::fs::write(&path, contents)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;

        info!("Wrote default config to {}", path.display());
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.general.max_db_connections < self.general.min_db_connections {
            anyhow::bail!("max_db_connections must be >= min_db_connections");
        }
        if self.server.enabled && self.server.port == 0 {
            anyhow::bail!("server.port must be set when the server is enabled");
        }
        if self.metadata.source_url.is_empty() {
            anyhow::bail!("metadata.source_url must not be empty");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        Config::default().validate().unwrap();
    }

    #[test]
    fn partial_toml_fills_in_defaults() {
        let config: Config = toml::from_str("[server]\nport = 9001\n").unwrap();
        assert_eq!(config.server.port, 9001);
        assert_eq!(config.general.log_level, "info");
    }

    #[test]
    fn bad_pool_bounds_are_rejected() {
        let mut config = Config::default();
        config.general.max_db_connections = 1;
        config.general.min_db_connections = 4;
        assert!(config.validate().is_err());
    }
}
