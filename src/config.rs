use reqwest::Url;
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub database_path: String,
    pub vendor_origin: Url,
    pub backend_url: String,
    pub cooldown_ms: u64,
    pub ping_timeout_ms: u64,
    pub sweep_interval_ms: u64,
    /// Browser origins allowed by CORS, serialized as `scheme://host[:port]`.
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnv(String),
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_map(std::env::vars().collect())
    }

    pub fn from_env_map(env_map: HashMap<String, String>) -> Result<Self, ConfigError> {
        let port = env_map
            .get("PORT")
            .map(|s| s.as_str())
            .unwrap_or("8787")
            .parse::<u16>()
            .map_err(|_| {
                ConfigError::InvalidValue("PORT".to_string(), "must be a valid u16".to_string())
            })?;

        let database_path = env_map
            .get("DATABASE_PATH")
            .cloned()
            .ok_or_else(|| ConfigError::MissingEnv("DATABASE_PATH".to_string()))?;

        let vendor_origin_str = env_map
            .get("VENDOR_ORIGIN")
            .map(|s| s.as_str())
            .unwrap_or("https://api.autodarts.io");
        let vendor_origin = Url::parse(vendor_origin_str).map_err(|e| {
            ConfigError::InvalidValue("VENDOR_ORIGIN".to_string(), e.to_string())
        })?;

        let backend_url = env_map
            .get("BACKEND_URL")
            .map(|s| s.as_str())
            .unwrap_or("http://localhost:8080/api")
            .trim_end_matches('/')
            .to_string();
        if Url::parse(&backend_url).is_err() {
            return Err(ConfigError::InvalidValue(
                "BACKEND_URL".to_string(),
                format!("not a valid URL: {}", backend_url),
            ));
        }

        let cooldown_ms = parse_u64(&env_map, "COOLDOWN_MS", 600_000)?;
        let ping_timeout_ms = parse_u64(&env_map, "PING_TIMEOUT_MS", 2_000)?;
        let sweep_interval_ms = parse_u64(&env_map, "SWEEP_INTERVAL_MS", 60_000)?;
        if sweep_interval_ms == 0 {
            return Err(ConfigError::InvalidValue(
                "SWEEP_INTERVAL_MS".to_string(),
                "must be greater than 0".to_string(),
            ));
        }

        let cors_origins = match env_map.get("CORS_ORIGINS") {
            None => vec![vendor_origin.origin().ascii_serialization()],
            Some(raw) => parse_origins(raw)?,
        };

        Ok(Config {
            port,
            database_path,
            vendor_origin,
            backend_url,
            cooldown_ms,
            ping_timeout_ms,
            sweep_interval_ms,
            cors_origins,
        })
    }

    pub fn cooldown(&self) -> Duration {
        Duration::from_millis(self.cooldown_ms)
    }

    pub fn ping_timeout(&self) -> Duration {
        Duration::from_millis(self.ping_timeout_ms)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_millis(self.sweep_interval_ms)
    }
}

fn parse_origins(raw: &str) -> Result<Vec<String>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            let origin = Url::parse(s)
                .map_err(|e| ConfigError::InvalidValue("CORS_ORIGINS".to_string(), e.to_string()))?
                .origin();
            if !origin.is_tuple() {
                return Err(ConfigError::InvalidValue(
                    "CORS_ORIGINS".to_string(),
                    format!("not an http(s) origin: {}", s),
                ));
            }
            Ok(origin.ascii_serialization())
        })
        .collect()
}

fn parse_u64(
    env_map: &HashMap<String, String>,
    key: &str,
    default: u64,
) -> Result<u64, ConfigError> {
    match env_map.get(key) {
        None => Ok(default),
        Some(raw) => raw.trim().parse::<u64>().map_err(|_| {
            ConfigError::InvalidValue(key.to_string(), "must be a valid u64".to_string())
        }),
    }
}
