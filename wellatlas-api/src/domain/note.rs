use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Note {
    pub id: i64,
    pub job_id: i64,
    pub content: String,
    pub created_at: String,
}
