mod crew_repo;
mod customer_repo;
mod file_repo;
mod job_repo;
mod note_repo;
mod repo_error;
mod site_repo;

pub use crew_repo::*;
pub use customer_repo::*;
pub use file_repo::*;
pub use job_repo::*;
pub use note_repo::*;
pub use repo_error::RepositoryError;
pub use site_repo::*;
