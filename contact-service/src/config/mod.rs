use serde::Deserialize;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct ContactConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub service_name: String,
    pub log_level: String,
    pub otlp_endpoint: Option<String>,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    /// `None` when no connection string was provided; the service then runs
    /// without persistence.
    pub mongodb: Option<MongoConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MongoConfig {
    pub uri: String,
    pub database: String,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    MongoDb,
    Memory,
    Disabled,
}

impl ContactConfig {
    pub fn load() -> Result<Self, AppError> {
        // Load common config (handles .env and APP__ prefix)
        let common_config = core_config::Config::load()?;

        let backend: StorageBackend = env_or("STORAGE_BACKEND", "mongodb")
            .parse()
            .map_err(|e: String| AppError::ConfigError(anyhow::anyhow!(e)))?;

        // A missing URI is a deployment state, not an error, in every environment.
        let mongodb = env::var("MONGODB_URI")
            .ok()
            .filter(|uri| !uri.trim().is_empty())
            .map(|uri| MongoConfig {
                uri,
                database: env_or("MONGODB_DATABASE", "contact_db"),
            });

        Ok(ContactConfig {
            common: common_config,
            service_name: env_or("SERVICE_NAME", "contact-service"),
            log_level: env_or("LOG_LEVEL", "info"),
            otlp_endpoint: env::var("OTLP_ENDPOINT")
                .ok()
                .filter(|s| !s.trim().is_empty()),
            storage: StorageConfig { backend, mongodb },
        })
    }
}

impl std::str::FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mongodb" | "mongo" => Ok(StorageBackend::MongoDb),
            "memory" => Ok(StorageBackend::Memory),
            "none" | "disabled" => Ok(StorageBackend::Disabled),
            _ => Err(format!("Invalid storage backend: {}", s)),
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}
