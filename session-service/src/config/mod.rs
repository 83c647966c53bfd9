use std::env;
use std::str::FromStr;

use secrecy::Secret;
use service_core::config as core_config;
use service_core::error::AppError;

/// Runtime settings for the session service.
///
/// The shared `APP__*` settings come from [`core_config::Config`]; the rest
/// is read from individual environment variables with development defaults.
/// In production (`ENVIRONMENT=prod`) every variable must be set explicitly.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub common: core_config::Config,
    pub mongodb: MongoConfig,
    pub store: StoreConfig,
    pub http: HttpConfig,
}

#[derive(Debug, Clone)]
pub struct MongoConfig {
    pub uri: Secret<String>,
    pub database: String,
}

#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub backend: StoreBackend,
}

/// Which `SessionStore` implementation the service runs against.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreBackend {
    Mongo,
    Memory,
}

#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Upper bound on request body size. Session payloads are small; the
    /// default keeps runaway clients from buffering megabytes server-side.
    pub max_body_bytes: usize,
    pub request_timeout_secs: u64,
}

impl SessionConfig {
    pub fn load() -> Result<Self, AppError> {
        let common = core_config::Config::load()?;
        let is_prod = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string()) == "prod";

        Ok(SessionConfig {
            common,
            mongodb: MongoConfig {
                uri: Secret::new(get_env(
                    "MONGODB_URI",
                    Some("mongodb://localhost:27017"),
                    is_prod,
                )?),
                database: get_env("MONGODB_DATABASE", Some("session_db"), is_prod)?,
            },
            store: StoreConfig {
                backend: get_env("SESSION_STORE_BACKEND", Some("mongo"), is_prod)?
                    .parse()
                    .map_err(|e: String| AppError::ConfigError(anyhow::anyhow!(e)))?,
            },
            http: HttpConfig {
                max_body_bytes: parse_env(
                    get_env("MAX_JSON_BODY_BYTES", Some("102400"), is_prod)?,
                    "MAX_JSON_BODY_BYTES",
                )?,
                request_timeout_secs: parse_env(
                    get_env("REQUEST_TIMEOUT_SECS", Some("30"), is_prod)?,
                    "REQUEST_TIMEOUT_SECS",
                )?,
            },
        })
    }
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mongo" => Ok(StoreBackend::Mongo),
            "memory" => Ok(StoreBackend::Memory),
            _ => Err(format!("Invalid session store backend: {}", s)),
        }
    }
}

fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    if let Ok(value) = env::var(key) {
        return Ok(value);
    }
    match default {
        Some(fallback) if !is_prod => Ok(fallback.to_string()),
        _ => Err(AppError::ConfigError(anyhow::anyhow!(
            "{} is required but not set",
            key
        ))),
    }
}

fn parse_env<T>(value: String, key: &str) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.parse().map_err(|e| {
        AppError::ConfigError(anyhow::anyhow!(
            "'{}' is not a valid value for {}: {}",
            value,
            key,
            e
        ))
    })
}
