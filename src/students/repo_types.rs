use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Student {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub age: i32,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}
