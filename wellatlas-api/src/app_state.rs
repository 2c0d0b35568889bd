use std::sync::Arc;

use sqlx::SqlitePool;

use crate::repositories::{
    CrewRepositoryImpl, CustomerRepositoryImpl, FileRepositoryImpl, JobRepositoryImpl,
    NoteRepositoryImpl, SiteRepositoryImpl,
};

/// Storage handles shared by every request. Handlers get what they need
/// from here instead of opening their own connections.
#[derive(Clone)]
pub struct AppState {
    pub customer_repo: Arc<CustomerRepositoryImpl>,
    pub site_repo: Arc<SiteRepositoryImpl>,
    pub job_repo: Arc<JobRepositoryImpl>,
    pub note_repo: Arc<NoteRepositoryImpl>,
    pub file_repo: Arc<FileRepositoryImpl>,
    pub crew_repo: Arc<CrewRepositoryImpl>,
    pub uploads_path: Arc<str>,
}

impl AppState {
    pub fn new(db_pool: SqlitePool, uploads_path: &str) -> Self {
        Self {
            customer_repo: Arc::new(CustomerRepositoryImpl::new(db_pool.clone())),
            site_repo: Arc::new(SiteRepositoryImpl::new(db_pool.clone())),
            job_repo: Arc::new(JobRepositoryImpl::new(db_pool.clone())),
            note_repo: Arc::new(NoteRepositoryImpl::new(db_pool.clone())),
            file_repo: Arc::new(FileRepositoryImpl::new(db_pool.clone())),
            crew_repo: Arc::new(CrewRepositoryImpl::new(db_pool)),
            uploads_path: Arc::from(uploads_path.trim_end_matches('/')),
        }
    }

    /// Public location of an attachment: one directory per job.
    pub fn upload_url(&self, job_id: i64, filename: &str) -> String {
        format!("{}/{}/{}", self.uploads_path, job_id, filename)
    }
}
