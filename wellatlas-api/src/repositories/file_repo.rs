use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::domain::{FileType, JobFile};

use super::repo_error::RepositoryError;

#[async_trait]
pub trait FileRepository {
    async fn get_files(&self, job_id: i64) -> Result<Vec<JobFile>, RepositoryError>;
    async fn create_file(&self, file: &NewJobFile) -> Result<JobFile, RepositoryError>;
}

pub struct FileRepositoryImpl {
    pool: SqlitePool,
}

impl FileRepositoryImpl {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

pub struct NewJobFile {
    pub job_id: i64,
    pub filename: String,
    pub file_type: FileType,
    pub url: String,
}

#[async_trait]
impl FileRepository for FileRepositoryImpl {
    async fn get_files(&self, job_id: i64) -> Result<Vec<JobFile>, RepositoryError> {
        let files = sqlx::query_as::<_, JobFile>(
            r#"
            SELECT id, job_id, filename, file_type, url, uploaded_at
            FROM job_files
            WHERE job_id = ?
            ORDER BY uploaded_at DESC, id DESC
            "#,
        )
        .bind(job_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(files)
    }

    async fn create_file(&self, file: &NewJobFile) -> Result<JobFile, RepositoryError> {
        let file = sqlx::query_as::<_, JobFile>(
            r#"
            INSERT INTO job_files (job_id, filename, file_type, url)
            VALUES (?, ?, ?, ?)
            RETURNING id, job_id, filename, file_type, url, uploaded_at
            "#,
        )
        .bind(file.job_id)
        .bind(&file.filename)
        .bind(file.file_type.to_string())
        .bind(&file.url)
        .fetch_one(&self.pool)
        .await?;

        Ok(file)
    }
}
