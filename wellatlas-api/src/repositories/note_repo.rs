use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::domain::Note;

use super::repo_error::RepositoryError;

#[async_trait]
pub trait NoteRepository {
    /// Notes for a job, oldest first.
    async fn get_notes(&self, job_id: i64) -> Result<Vec<Note>, RepositoryError>;
    async fn create_note(&self, job_id: i64, content: &str) -> Result<Note, RepositoryError>;
}

pub struct NoteRepositoryImpl {
    pool: SqlitePool,
}

impl NoteRepositoryImpl {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NoteRepository for NoteRepositoryImpl {
    async fn get_notes(&self, job_id: i64) -> Result<Vec<Note>, RepositoryError> {
        let notes = sqlx::query_as::<_, Note>(
            r#"
            SELECT id, job_id, content, created_at
            FROM job_notes
            WHERE job_id = ?
            ORDER BY datetime(created_at) ASC, created_at ASC, id ASC
            "#,
        )
        .bind(job_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(notes)
    }

    async fn create_note(&self, job_id: i64, content: &str) -> Result<Note, RepositoryError> {
        let note = sqlx::query_as::<_, Note>(
            r#"
            INSERT INTO job_notes (job_id, content)
            VALUES (?, ?)
            RETURNING id, job_id, content, created_at
            "#,
        )
        .bind(job_id)
        .bind(content)
        .fetch_one(&self.pool)
        .await?;

        Ok(note)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{seed_job, test_pool};

    #[tokio::test]
    async fn notes_come_back_oldest_first() {
        let pool = test_pool().await;
        let job_id = seed_job(&pool, "100", None, None).await;

        sqlx::query("INSERT INTO job_notes (job_id, content, created_at) VALUES (?, ?, ?)")
            .bind(job_id)
            .bind("second")
            .bind("2024-02-01 10:00:00")
            .execute(&pool)
            .await
            .unwrap();
        sqlx::query("INSERT INTO job_notes (job_id, content, created_at) VALUES (?, ?, ?)")
            .bind(job_id)
            .bind("first")
            .bind("2024-01-01 10:00:00")
            .execute(&pool)
            .await
            .unwrap();

        let repo = NoteRepositoryImpl::new(pool);
        let created = repo.create_note(job_id, "latest").await.unwrap();
        assert_eq!(created.job_id, job_id);
        assert!(!created.created_at.is_empty());

        let contents: Vec<_> = repo
            .get_notes(job_id)
            .await
            .unwrap()
            .into_iter()
            .map(|n| n.content)
            .collect();
        assert_eq!(contents, vec!["first", "second", "latest"]);
    }
}
