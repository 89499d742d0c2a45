use std::time::Duration;

use async_trait::async_trait;
use sqlx::PgPool;

use crate::{
    db::{timed, StoreError},
    students::{dto::NewStudent, repo_types::Student},
};

#[async_trait]
pub trait StudentStore: Send + Sync {
    /// Returns the new id.
    async fn create(&self, student: &NewStudent) -> Result<i64, StoreError>;
    async fn get(&self, id: i64) -> Result<Student, StoreError>;
    /// Ordered by id.
    async fn list(&self) -> Result<Vec<Student>, StoreError>;
}

#[derive(Clone)]
pub struct PgStudentStore {
    db: PgPool,
    timeout: Duration,
}

impl PgStudentStore {
    pub fn new(db: PgPool, timeout: Duration) -> Self {
        Self { db, timeout }
    }
}

#[async_trait]
impl StudentStore for PgStudentStore {
    async fn create(&self, student: &NewStudent) -> Result<i64, StoreError> {
        timed(
            self.timeout,
            sqlx::query_scalar::<_, i64>(
                "INSERT INTO students (name, email, age) VALUES ($1, $2, $3) RETURNING id",
            )
            .bind(&student.name)
            .bind(&student.email)
            .bind(student.age)
            .fetch_one(&self.db),
        )
        .await
    }

    async fn get(&self, id: i64) -> Result<Student, StoreError> {
        timed(
            self.timeout,
            sqlx::query_as::<_, Student>(
                r#"
                SELECT id, name, email, age, created_at
                FROM students
                WHERE id = $1
                "#,
            )
            .bind(id)
            .fetch_one(&self.db),
        )
        .await
    }

    async fn list(&self) -> Result<Vec<Student>, StoreError> {
        timed(
            self.timeout,
            sqlx::query_as::<_, Student>(
                r#"
                SELECT id, name, email, age, created_at
                FROM students
                ORDER BY id ASC
                "#,
            )
            .fetch_all(&self.db),
        )
        .await
    }
}
