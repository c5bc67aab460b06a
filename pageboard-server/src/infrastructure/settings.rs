use std::str::FromStr;

use anyhow::{Context, Result, anyhow};
use url::Url;

#[derive(Debug, Clone)]
pub struct Settings {
    pub database_url: String,
    pub database_max_connections: u32,
    pub protocol: String,
    pub host: String,
    pub http_addr: String,
    pub cors_origins: Vec<String>,
    pub log_level: String,
    pub http_request_body_limit_bytes: usize,
    pub http_concurrency_limit: usize,
    pub http_request_timeout_secs: u64,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        let database_url = get_required("DATABASE_URL").context("DATABASE_URL is required")?;
        let database_max_connections = parse_positive_env("DATABASE_MAX_CONNECTIONS", 10)?;

        let protocol = std::env::var("PROTOCOL").unwrap_or_else(|_| "http".to_string());
        let host = std::env::var("HOST").unwrap_or_else(|_| "localhost:3000".to_string());

        let http_addr = std::env::var("HTTP_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
        let cors_origins = parse_cors_origins(
            std::env::var("CORS_ORIGINS")
                .unwrap_or_else(|_| "http://localhost:8000,http://127.0.0.1:8000".to_string()),
        );
        let log_level = std::env::var("LOG_LEVEL")
            .or_else(|_| std::env::var("RUST_LOG"))
            .unwrap_or_else(|_| "info".to_string());
        let http_request_body_limit_bytes =
            parse_positive_env("HTTP_REQUEST_BODY_LIMIT_BYTES", 1024 * 1024)?;
        let http_concurrency_limit = parse_positive_env("HTTP_CONCURRENCY_LIMIT", 256)?;
        let http_request_timeout_secs = parse_positive_env("HTTP_REQUEST_TIMEOUT_SECS", 10)?;

        let settings = Self {
            database_url,
            database_max_connections,
            protocol,
            host,
            http_addr,
            cors_origins,
            log_level,
            http_request_body_limit_bytes,
            http_concurrency_limit,
            http_request_timeout_secs,
        };
        settings.posts_url()?;

        Ok(settings)
    }

    /// Absolute URL of the posts listing, used for `next` links.
    pub fn posts_url(&self) -> Result<Url> {
        build_posts_url(&self.protocol, &self.host)
    }
}

fn build_posts_url(protocol: &str, host: &str) -> Result<Url> {
    let protocol = protocol.trim().trim_end_matches("://");
    let host = host.trim().trim_end_matches('/');
    if protocol.is_empty() || host.is_empty() {
        return Err(anyhow!("PROTOCOL and HOST must not be empty"));
    }

    Url::parse(&format!("{protocol}://{host}/posts"))
        .with_context(|| format!("invalid PROTOCOL/HOST pair: {protocol}://{host}"))
}

fn get_required(key: &str) -> Result<String> {
    let value = std::env::var(key)?;
    let value = value.trim().to_string();
    if value.is_empty() {
        return Err(anyhow!("{key} must not be empty"));
    }
    Ok(value)
}

fn parse_cors_origins(raw: String) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}

/// Reads a positive number from `key`, falling back to `default` when unset.
fn parse_positive_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr + Default + PartialEq,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let value = match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Failed to parse {key}, expecting positive integer"))?,
        Err(_) => default,
    };

    if value == T::default() {
        return Err(anyhow!("{key} must be > 0"));
    }
    Ok(value)
}
