use anyhow::{Context as _, bail};
use chrono::Duration;

use labdesk_core::tracing::LogFormat;

const DEFAULT_MAIL_API_URL: &str = "https://api.resend.com/emails";

/// Auth service configuration loaded from environment variables.
#[derive(Debug)]
pub struct AuthConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// Redis connection URL. Env var: `REDIS_URL`. Unset keeps recovery codes in process memory,
    /// which only works for a single replica.
    pub redis_url: Option<String>,
    /// HMAC secret for signing access tokens. Should be at least 32 bytes.
    pub jwt_secret: String,
    /// `iss` claim (default "labdesk"). Env var: `JWT_ISSUER`.
    pub jwt_issuer: String,
    /// `aud` claim (default "labdesk-web"). Env var: `JWT_AUDIENCE`.
    pub jwt_audience: String,
    /// Access-token lifetime. Env var: `JWT_EXPIRY_HOURS`, a positive hour count (default 24).
    pub jwt_ttl: Duration,
    /// Resend-compatible mail endpoint. Env var: `MAIL_API_URL`.
    pub mail_api_url: String,
    /// Mail API key. Env var: `MAIL_API_KEY`. Required unless `mail_log_only` is set.
    pub mail_api_key: Option<String>,
    /// Env var: `MAIL_LOG_ONLY` (default false). Development only: recovery
    /// requests answer success while no mail leaves the process.
    pub mail_log_only: bool,
    /// Sender address. Env var: `MAIL_FROM`.
    pub mail_from: String,
    /// TCP port to listen on (default 3112). Env var: `AUTH_PORT`.
    pub auth_port: u16,
    /// Env var: `LOG_FORMAT` (`json` or `pretty`).
    pub log_format: LogFormat,
}

impl AuthConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            database_url: required("DATABASE_URL")?,
            redis_url: optional("REDIS_URL"),
            jwt_secret: required("JWT_SECRET")?,
            jwt_issuer: optional("JWT_ISSUER").unwrap_or_else(|| "labdesk".to_owned()),
            jwt_audience: optional("JWT_AUDIENCE").unwrap_or_else(|| "labdesk-web".to_owned()),
            jwt_ttl: token_ttl(parsed("JWT_EXPIRY_HOURS", 24)?)?,
            mail_api_url: optional("MAIL_API_URL")
                .unwrap_or_else(|| DEFAULT_MAIL_API_URL.to_owned()),
            mail_api_key: optional("MAIL_API_KEY"),
            mail_log_only: parsed("MAIL_LOG_ONLY", false)?,
            mail_from: optional("MAIL_FROM")
                .unwrap_or_else(|| "no-reply@labdesk.local".to_owned()),
            auth_port: parsed("AUTH_PORT", 3112)?,
            log_format: optional("LOG_FORMAT")
                .map(|v| LogFormat::parse(&v))
                .unwrap_or_default(),
        })
    }
}

fn token_ttl(hours: i64) -> anyhow::Result<Duration> {
    if hours <= 0 {
        bail!("JWT_EXPIRY_HOURS must be positive, got {hours}");
    }
    Duration::try_hours(hours).with_context(|| format!("JWT_EXPIRY_HOURS is too large: {hours}"))
}

fn required(name: &str) -> anyhow::Result<String> {
    std::env::var(name).with_context(|| format!("{name} must be set"))
}

/// Empty values count as unset.
fn optional(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

fn parsed<T>(name: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional(name) {
        Some(v) => v
            .parse()
            .with_context(|| format!("{name} has an invalid value: {v:?}")),
        None => Ok(default),
    }
}
