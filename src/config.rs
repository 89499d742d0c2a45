use std::{net::SocketAddr, str::FromStr, time::Duration};

use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub ttl_hours: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub db_max_connections: u32,
    /// Upper bound for a single store call, pool acquisition included.
    pub db_timeout: Duration,
    pub jwt: JwtConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").context("DATABASE_URL must be set")?;
        let secret = lookup("JWT_SECRET")
            .filter(|s| !s.is_empty())
            .context("JWT_SECRET must be set")?;

        let jwt = JwtConfig {
            secret,
            ttl_hours: token_ttl_hours(&lookup)?,
        };

        Ok(Self {
            database_url,
            host: lookup("APP_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port: parse_or(&lookup, "APP_PORT", 3000)?,
            db_max_connections: parse_or(&lookup, "DB_MAX_CONNECTIONS", 10)?,
            db_timeout: Duration::from_secs(parse_or(&lookup, "DB_TIMEOUT_SECS", 5)?),
            jwt,
        })
    }

    pub fn listen_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid listen address {}:{}", self.host, self.port))
    }
}

/// Token lifetime in hours. Must be positive and keep `now + ttl` inside the
/// range a timestamp can represent.
fn token_ttl_hours<F>(lookup: &F) -> anyhow::Result<i64>
where
    F: Fn(&str) -> Option<String>,
{
    let hours: i64 = parse_or(lookup, "JWT_TTL_HOURS", 24)?;
    if hours <= 0 {
        anyhow::bail!("JWT_TTL_HOURS must be positive, got {hours}");
    }
    hours
        .checked_mul(3600)
        .map(time::Duration::seconds)
        .and_then(|ttl| time::OffsetDateTime::now_utc().checked_add(ttl))
        .with_context(|| format!("JWT_TTL_HOURS is too large: {hours}"))?;
    Ok(hours)
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> anyhow::Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} has an invalid value: {raw:?}")),
        None => Ok(default),
    }
}
