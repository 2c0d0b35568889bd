use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Customer {
    pub id: i64,
    pub name: String,
    pub notes: Option<String>,
}
