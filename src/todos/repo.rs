use std::time::Duration;

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    db::{timed, StoreError},
    todos::repo_types::Todo,
};

/// Owner-scoped todo storage. Every id-based call filters on `(id, owner)`,
/// so another user's todo is indistinguishable from a missing one.
#[async_trait]
pub trait TodoStore: Send + Sync {
    async fn create(&self, owner: Uuid, title: &str, completed: bool) -> Result<Todo, StoreError>;
    /// Newest first.
    async fn list_by_owner(&self, owner: Uuid) -> Result<Vec<Todo>, StoreError>;
    async fn get(&self, id: i64, owner: Uuid) -> Result<Todo, StoreError>;
    async fn update(
        &self,
        id: i64,
        owner: Uuid,
        title: &str,
        completed: bool,
    ) -> Result<Todo, StoreError>;
    /// NotFound when nothing was deleted.
    async fn delete(&self, id: i64, owner: Uuid) -> Result<(), StoreError>;
}

#[derive(Clone)]
pub struct PgTodoStore {
    db: PgPool,
    timeout: Duration,
}

impl PgTodoStore {
    pub fn new(db: PgPool, timeout: Duration) -> Self {
        Self { db, timeout }
    }
}

#[async_trait]
impl TodoStore for PgTodoStore {
    async fn create(&self, owner: Uuid, title: &str, completed: bool) -> Result<Todo, StoreError> {
        timed(
            self.timeout,
            sqlx::query_as::<_, Todo>(
                r#"
                INSERT INTO todos (title, completed, user_id)
                VALUES ($1, $2, $3)
                RETURNING id, title, completed, created_at, updated_at, user_id
                "#,
            )
            .bind(title)
            .bind(completed)
            .bind(owner)
            .fetch_one(&self.db),
        )
        .await
    }

    async fn list_by_owner(&self, owner: Uuid) -> Result<Vec<Todo>, StoreError> {
        timed(
            self.timeout,
            sqlx::query_as::<_, Todo>(
                r#"
                SELECT id, title, completed, created_at, updated_at, user_id
                FROM todos
                WHERE user_id = $1
                ORDER BY created_at DESC, id DESC
                "#,
            )
            .bind(owner)
            .fetch_all(&self.db),
        )
        .await
    }

    async fn get(&self, id: i64, owner: Uuid) -> Result<Todo, StoreError> {
        timed(
            self.timeout,
            sqlx::query_as::<_, Todo>(
                r#"
                SELECT id, title, completed, created_at, updated_at, user_id
                FROM todos
                WHERE id = $1 AND user_id = $2
                "#,
            )
            .bind(id)
            .bind(owner)
            .fetch_one(&self.db),
        )
        .await
    }

    async fn update(
        &self,
        id: i64,
        owner: Uuid,
        title: &str,
        completed: bool,
    ) -> Result<Todo, StoreError> {
        timed(
            self.timeout,
            sqlx::query_as::<_, Todo>(
                r#"
                UPDATE todos
                SET title = $1, completed = $2, updated_at = now()
                WHERE id = $3 AND user_id = $4
                RETURNING id, title, completed, created_at, updated_at, user_id
                "#,
            )
            .bind(title)
            .bind(completed)
            .bind(id)
            .bind(owner)
            .fetch_one(&self.db),
        )
        .await
    }

    async fn delete(&self, id: i64, owner: Uuid) -> Result<(), StoreError> {
        let result = timed(
            self.timeout,
            sqlx::query("DELETE FROM todos WHERE id = $1 AND user_id = $2")
                .bind(id)
                .bind(owner)
                .execute(&self.db),
        )
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}
