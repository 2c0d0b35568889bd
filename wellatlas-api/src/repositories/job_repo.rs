use async_trait::async_trait;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use crate::domain::{Job, JobRow};

use super::repo_error::RepositoryError;

#[async_trait]
pub trait JobRepository {
    /// Jobs joined with site and customer, optionally limited to one site.
    async fn get_job_rows(&self, site_id: Option<i64>) -> Result<Vec<JobRow>, RepositoryError>;
    async fn get_job(&self, id: i64) -> Result<Job, RepositoryError>;
    async fn create_job(&self, job: &JobFields) -> Result<Job, RepositoryError>;
    async fn update_job(&self, id: i64, update: &JobFields) -> Result<Job, RepositoryError>;
}

pub struct JobRepositoryImpl {
    pool: SqlitePool,
}

impl JobRepositoryImpl {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

/// Column values for inserts and partial updates. On insert `site_id` and
/// `job_number` must be set; on update `None` keeps the stored value.
#[derive(Debug, Default)]
pub struct JobFields {
    pub site_id: Option<i64>,
    pub job_number: Option<String>,
    pub job_category: Option<String>,
    pub status: Option<String>,
    pub description: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[async_trait]
impl JobRepository for JobRepositoryImpl {
    async fn get_job_rows(&self, site_id: Option<i64>) -> Result<Vec<JobRow>, RepositoryError> {
        let mut query = QueryBuilder::<Sqlite>::new(
            r#"
            SELECT jobs.id, jobs.site_id, sites.customer_id, jobs.job_number,
                   sites.name AS site_name, customers.name AS customer_name,
                   jobs.job_category, jobs.status, jobs.description,
                   jobs.start_date, jobs.end_date
            FROM jobs
            JOIN sites ON sites.id = jobs.site_id
            LEFT JOIN customers ON customers.id = sites.customer_id
            "#,
        );
        if let Some(site_id) = site_id {
            query.push(" WHERE jobs.site_id = ").push_bind(site_id);
        }
        query.push(" ORDER BY jobs.id");

        let rows = query.build_query_as::<JobRow>().fetch_all(&self.pool).await?;

        Ok(rows)
    }

    async fn get_job(&self, id: i64) -> Result<Job, RepositoryError> {
        sqlx::query_as::<_, Job>(
            r#"
            SELECT id, site_id, job_number, job_category, status, description, start_date, end_date
            FROM jobs
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| RepositoryError::not_found("job", id))
    }

    async fn create_job(&self, job: &JobFields) -> Result<Job, RepositoryError> {
        let id = sqlx::query(
            r#"
            INSERT INTO jobs (site_id, job_number, job_category, status, description, start_date, end_date)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(job.site_id)
        .bind(&job.job_number)
        .bind(&job.job_category)
        .bind(&job.status)
        .bind(&job.description)
        .bind(&job.start_date)
        .bind(&job.end_date)
        .execute(&self.pool)
        .await?
        .last_insert_rowid();

        tracing::debug!(job_id = id, "created job");
        self.get_job(id).await
    }

    async fn update_job(&self, id: i64, update: &JobFields) -> Result<Job, RepositoryError> {
        let result = sqlx::query(
            r#"
            UPDATE jobs
            SET site_id = COALESCE(?, site_id),
                job_number = COALESCE(?, job_number),
                job_category = COALESCE(?, job_category),
                status = COALESCE(?, status),
                description = COALESCE(?, description),
                start_date = COALESCE(?, start_date),
                end_date = COALESCE(?, end_date)
            WHERE id = ?
            "#,
        )
        .bind(update.site_id)
        .bind(&update.job_number)
        .bind(&update.job_category)
        .bind(&update.status)
        .bind(&update.description)
        .bind(&update.start_date)
        .bind(&update.end_date)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::not_found("job", id));
        }

        self.get_job(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{seed_site, test_pool};

    #[tokio::test]
    async fn job_rows_join_site_and_customer() {
        let pool = test_pool().await;
        let site_id = seed_site(&pool, "Acme Farms", "North Field").await;
        let other_site = seed_site(&pool, "Bolt Dairy", "Barn Well").await;
        let repo = JobRepositoryImpl::new(pool);

        repo.create_job(&JobFields {
            site_id: Some(site_id),
            job_number: Some("100".to_string()),
            job_category: Some("Drilling".to_string()),
            start_date: Some("2024-01-01".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
        repo.create_job(&JobFields {
            site_id: Some(other_site),
            job_number: Some("200".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();

        let rows = repo.get_job_rows(None).await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].site_name.as_deref(), Some("North Field"));
        assert_eq!(rows[0].customer_name.as_deref(), Some("Acme Farms"));
        assert_eq!(rows[0].job_category.as_deref(), Some("Drilling"));

        let scoped = repo.get_job_rows(Some(other_site)).await.unwrap();
        assert_eq!(scoped.len(), 1);
        assert_eq!(scoped[0].job_number, "200");
    }

    #[tokio::test]
    async fn update_job_is_partial() {
        let pool = test_pool().await;
        let site_id = seed_site(&pool, "Acme Farms", "North Field").await;
        let repo = JobRepositoryImpl::new(pool);

        let job = repo
            .create_job(&JobFields {
                site_id: Some(site_id),
                job_number: Some("100".to_string()),
                status: Some("Scheduled".to_string()),
                start_date: Some("2024-01-01".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();

        let updated = repo
            .update_job(
                job.id,
                &JobFields {
                    status: Some("In Progress".to_string()),
                    end_date: Some("2024-01-05".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.job_number, "100");
        assert_eq!(updated.status.as_deref(), Some("In Progress"));
        assert_eq!(updated.start_date.as_deref(), Some("2024-01-01"));
        assert_eq!(updated.end_date.as_deref(), Some("2024-01-05"));

        assert!(matches!(
            repo.get_job(job.id + 1).await,
            Err(RepositoryError::NotFound(_))
        ));
    }
}
