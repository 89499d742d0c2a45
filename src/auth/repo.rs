use std::time::Duration;

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    auth::repo_types::User,
    db::{timed, StoreError},
};

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Conflict when the email is already taken.
    async fn create(&self, email: &str, password_hash: &str) -> Result<User, StoreError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError>;
}

#[derive(Clone)]
pub struct PgUserStore {
    db: PgPool,
    timeout: Duration,
}

impl PgUserStore {
    pub fn new(db: PgPool, timeout: Duration) -> Self {
        Self { db, timeout }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn create(&self, email: &str, password_hash: &str) -> Result<User, StoreError> {
        timed(
            self.timeout,
            sqlx::query_as::<_, User>(
                r#"
                INSERT INTO users (email, password_hash)
                VALUES ($1, $2)
                RETURNING id, email, password_hash, created_at, updated_at
                "#,
            )
            .bind(email)
            .bind(password_hash)
            .fetch_one(&self.db),
        )
        .await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        timed(
            self.timeout,
            sqlx::query_as::<_, User>(
                r#"
                SELECT id, email, password_hash, created_at, updated_at
                FROM users
                WHERE email = $1
                "#,
            )
            .bind(email)
            .fetch_optional(&self.db),
        )
        .await
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        timed(
            self.timeout,
            sqlx::query_as::<_, User>(
                r#"
                SELECT id, email, password_hash, created_at, updated_at
                FROM users
                WHERE id = $1
                "#,
            )
            .bind(id)
            .fetch_optional(&self.db),
        )
        .await
    }
}
