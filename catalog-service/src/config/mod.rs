use secrecy::Secret;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;

#[derive(Debug, Clone)]
pub struct CatalogConfig {
    pub common: core_config::Config,
    pub service_name: String,
    pub environment: Environment,
    pub log_level: String,
    pub otlp_endpoint: Option<String>,
    pub persistence: PersistenceBackend,
    pub mongodb: MongoConfig,
    pub storage: StorageConfig,
    pub jwt: JwtConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Dev,
    Prod,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistenceBackend {
    Memory,
    MongoDb,
}

#[derive(Debug, Clone)]
pub struct MongoConfig {
    pub uri: String,
    pub database: String,
}

#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub local_path: String,
}

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: Secret<String>,
    pub issuer: String,
    pub audience: String,
    pub expiry_hours: i64,
}

impl CatalogConfig {
    pub fn load() -> Result<Self, AppError> {
        // Handles .env and the APP__ prefix
        let common = core_config::Config::load()?;

        let environment = match env::var("ENVIRONMENT").as_deref() {
            Ok("prod") => Environment::Prod,
            _ => Environment::Dev,
        };
        let is_prod = environment == Environment::Prod;
        let default_log_level = common.log_level.clone();

        Ok(CatalogConfig {
            common,
            service_name: "catalog-service".to_string(),
            environment,
            log_level: get_env("LOG_LEVEL", Some(&default_log_level), is_prod)?,
            otlp_endpoint: optional_env("OTLP_ENDPOINT"),
            persistence: get_env("PERSISTENCE_BACKEND", Some("memory"), is_prod)?
                .parse()
                .map_err(|e: String| AppError::ConfigError(anyhow::anyhow!(e)))?,
            mongodb: MongoConfig {
                uri: get_env("MONGODB_URI", Some("mongodb://localhost:27017"), is_prod)?,
                database: get_env("MONGODB_DATABASE", Some("catalog_db"), is_prod)?,
            },
            storage: StorageConfig {
                local_path: get_env("STORAGE_LOCAL_PATH", Some("storage/images"), is_prod)?,
            },
            jwt: JwtConfig {
                secret: Secret::new(get_env(
                    "JWT_SECRET",
                    Some("dev-only-signing-secret"),
                    is_prod,
                )?),
                issuer: get_env("JWT_ISSUER", Some("catalog"), is_prod)?,
                audience: get_env("JWT_AUDIENCE", Some("https://localhost"), is_prod)?,
                expiry_hours: get_env("JWT_EXPIRY_HOURS", Some("2"), is_prod)?
                    .parse()
                    .map_err(|e| {
                        AppError::ConfigError(anyhow::anyhow!(
                            "JWT_EXPIRY_HOURS must be a whole number of hours: {}",
                            e
                        ))
                    })?,
            },
        })
    }
}

impl std::str::FromStr for PersistenceBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "memory" => Ok(PersistenceBackend::Memory),
            "mongodb" | "mongo" => Ok(PersistenceBackend::MongoDb),
            _ => Err(format!("Invalid persistence backend: {}", s)),
        }
    }
}

/// Unset and empty both mean "not configured", in every environment.
fn optional_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.is_empty())
}

fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required in production but not set",
                    key
                )))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required but not set",
                    key
                )))
            }
        }
    }
}
