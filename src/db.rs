use std::{future::Future, time::Duration};

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};
use thiserror::Error;

use crate::config::AppConfig;

/// Closed set of failures a store call can end in. Handlers match on the
/// kind, never on driver error text.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("database timeout")]
    Timeout,
    #[error("{0}")]
    Other(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => StoreError::NotFound,
            sqlx::Error::PoolTimedOut => StoreError::Timeout,
            sqlx::Error::Database(ref db) if db.is_unique_violation() => StoreError::Conflict,
            other => StoreError::Other(other.to_string()),
        }
    }
}

pub async fn connect(config: &AppConfig) -> anyhow::Result<PgPool> {
    PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(config.db_timeout)
        .connect(&config.database_url)
        .await
        .context("connect to database")
}

/// Runs one unit of store work under `limit`; the pooled connection is
/// released when the future is dropped.
pub async fn timed<T, F>(limit: Duration, fut: F) -> Result<T, StoreError>
where
    F: Future<Output = Result<T, sqlx::Error>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(res) => res.map_err(StoreError::from),
        Err(_) => Err(StoreError::Timeout),
    }
}
