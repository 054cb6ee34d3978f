use std::{env, fmt::Display, str::FromStr};

use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("invalid {key} value: {reason}")]
    Invalid { key: &'static str, reason: String },
}

#[derive(Debug, Clone)]
pub struct MailConfig {
    pub relay: String,
    pub username: String,
    pub password: String,
    pub from: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub bind_addr: String,
    pub access_token_ttl_minutes: i64,
    pub refresh_token_ttl_days: i64,
    pub rmq_url: Option<String>,
    pub mail: Option<MailConfig>,
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mail = match (
            lookup("SMTP_USERNAME"),
            lookup("SMTP_PASSWORD"),
        ) {
            (Some(username), Some(password)) => Some(MailConfig {
                relay: lookup("SMTP_RELAY").unwrap_or_else(|| "smtp.gmail.com".to_owned()),
                username,
                password,
                from: lookup("MAIL_FROM").unwrap_or_else(|| "no-reply@storefront.local".to_owned()),
            }),
            _ => {
                debug!("SMTP credentials not set, e-mails disabled");
                None
            }
        };

        Ok(Self {
            database_url: required(&lookup, "DATABASE_URL")?,
            jwt_secret: required(&lookup, "JWT_SECRET")?,
            bind_addr: try_load(&lookup, "BIND_ADDR", "127.0.0.1:3000")?,
            access_token_ttl_minutes: try_load(&lookup, "ACCESS_TOKEN_TTL_MINUTES", "15")?,
            refresh_token_ttl_days: try_load(&lookup, "REFRESH_TOKEN_TTL_DAYS", "7")?,
            rmq_url: lookup("RMQ_URL"),
            mail,
        })
    }
}

fn required<F>(lookup: &F, key: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .filter(|value| !value.is_empty())
        .ok_or(ConfigError::Missing(key))
}

fn try_load<F, T>(lookup: &F, key: &'static str, default: &str) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: Display,
{
    lookup(key)
        .unwrap_or_else(|| {
            info!("{key} not set, using default: {default}");
            default.to_owned()
        })
        .parse()
        .map_err(|e: T::Err| ConfigError::Invalid {
            key,
            reason: e.to_string(),
        })
}
