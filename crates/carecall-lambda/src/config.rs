//! Runtime configuration, read once from the environment at cold start.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use carecall_auth::jwt::AUTHENTICATED_AUDIENCE;
use carecall_bedrock::assessment::DEFAULT_TIMEOUT;
use carecall_bedrock::classifier::DEFAULT_MAX_TOKENS;
use carecall_core::models::pagination::MAX_PAGE_SIZE;

pub const DEFAULT_DATABASE_PATH: &str = "/tmp/carecall.db";
pub const DEFAULT_MODEL_ID: &str = "us.anthropic.claude-sonnet-4-20250514-v1:0";
pub const DEFAULT_PAGE_SIZE: u32 = 10;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{var} has invalid value {value:?}: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: &'static str,
    },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_path: PathBuf,
    pub model_id: String,
    pub classifier_timeout: Duration,
    pub max_tokens: i32,
    pub jwt_secret: String,
    /// `None` disables the audience check.
    pub jwt_audience: Option<String>,
    pub default_page_size: u32,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build a config from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

        let jwt_secret = get("CARECALL_JWT_SECRET").ok_or(ConfigError::Missing("CARECALL_JWT_SECRET"))?;

        let timeout_secs: u64 = parse_or(
            "CARECALL_CLASSIFIER_TIMEOUT_SECS",
            get("CARECALL_CLASSIFIER_TIMEOUT_SECS"),
            DEFAULT_TIMEOUT.as_secs(),
        )?;
        if timeout_secs == 0 {
            return Err(invalid("CARECALL_CLASSIFIER_TIMEOUT_SECS", "0", "must be positive"));
        }

        let max_tokens: i32 = parse_or("CARECALL_MAX_TOKENS", get("CARECALL_MAX_TOKENS"), DEFAULT_MAX_TOKENS)?;
        if max_tokens <= 0 {
            return Err(invalid(
                "CARECALL_MAX_TOKENS",
                &max_tokens.to_string(),
                "must be positive",
            ));
        }

        let default_page_size: u32 = parse_or(
            "CARECALL_DEFAULT_PAGE_SIZE",
            get("CARECALL_DEFAULT_PAGE_SIZE"),
            DEFAULT_PAGE_SIZE,
        )?;
        if !(1..=MAX_PAGE_SIZE).contains(&default_page_size) {
            return Err(invalid(
                "CARECALL_DEFAULT_PAGE_SIZE",
                &default_page_size.to_string(),
                "must be between 1 and 100",
            ));
        }

        // Set but blank disables the check; unset uses the provider default.
        let jwt_audience = match lookup("CARECALL_JWT_AUDIENCE") {
            None => Some(AUTHENTICATED_AUDIENCE.to_string()),
            Some(aud) if aud.trim().is_empty() => None,
            Some(aud) => Some(aud),
        };

        Ok(Self {
            database_path: get("CARECALL_DATABASE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATABASE_PATH)),
            model_id: get("CARECALL_MODEL_ID").unwrap_or_else(|| DEFAULT_MODEL_ID.to_string()),
            classifier_timeout: Duration::from_secs(timeout_secs),
            max_tokens,
            jwt_secret,
            jwt_audience,
            default_page_size,
        })
    }
}

fn parse_or<T: FromStr>(var: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError> {
    match raw {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| invalid(var, &raw, "not a number")),
    }
}

fn invalid(var: &'static str, value: &str, reason: &'static str) -> ConfigError {
    ConfigError::Invalid {
        var,
        value: value.to_string(),
        reason,
    }
}
