use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
    #[error("Not found: {0}")]
    NotFound(String),
}

impl RepositoryError {
    pub fn not_found(entity: &str, id: i64) -> Self {
        Self::NotFound(format!("{} {}", entity, id))
    }
}
