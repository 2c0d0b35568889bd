use schedule::ScheduledJob;
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Job {
    pub id: i64,
    pub site_id: i64,
    pub job_number: String,
    pub job_category: Option<String>,
    pub status: Option<String>,
    pub description: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// A job joined with its site and customer, ready for the timeline.
#[derive(Debug, Clone, FromRow)]
pub struct JobRow {
    pub id: i64,
    pub site_id: i64,
    pub customer_id: Option<i64>,
    pub job_number: String,
    pub site_name: Option<String>,
    pub customer_name: Option<String>,
    pub job_category: Option<String>,
    pub status: Option<String>,
    pub description: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl From<JobRow> for ScheduledJob {
    fn from(row: JobRow) -> Self {
        Self {
            id: row.id,
            site_id: row.site_id,
            customer_id: row.customer_id,
            job_number: row.job_number,
            site_name: row.site_name,
            customer_name: row.customer_name,
            category: row.job_category,
            status: row.status,
            description: row.description,
            start_date: row.start_date,
            end_date: row.end_date,
        }
    }
}
