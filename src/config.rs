use std::env;
use std::time::Duration;

use crate::error::AppError;

const DEFAULT_BACKEND_URL: &str = "http://localhost:5000/api/v1";
const TOKEN_COOKIE: &str = "token";

#[derive(Debug, Clone)]
pub struct Config {
    pub backend_url: String,
    pub token: Option<String>,
    pub log_level: String,
    pub request_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        let _ = dotenvy::dotenv();

        let backend_url = env::var("BACKEND_URL")
            .map(|raw| normalize_base_url(&raw))
            .unwrap_or_else(|_| DEFAULT_BACKEND_URL.to_string());

        let token = resolve_token(
            env::var("TOKEN").ok(),
            env::var("DASHBOARD_COOKIE").ok(),
        );

        Ok(Self {
            backend_url,
            token,
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            request_timeout: Duration::from_secs(parse_or_default("REQUEST_TIMEOUT_SECS", 30)?),
        })
    }
}

/// Picks the bearer token: an explicit `TOKEN` wins over the `token` cookie.
pub fn resolve_token(explicit: Option<String>, cookie_header: Option<String>) -> Option<String> {
    explicit
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty())
        .or_else(|| cookie_header.and_then(|header| cookie_value(&header, TOKEN_COOKIE)))
}

pub fn cookie_value(header: &str, name: &str) -> Option<String> {
    header
        .split(';')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| key.trim() == name)
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn normalize_base_url(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_string()
}

fn parse_or_default<T>(key: &str, default: T) -> Result<T, AppError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .map_err(|err| AppError::Config(format!("invalid {key}: {err}"))),
        Err(_) => Ok(default),
    }
}
