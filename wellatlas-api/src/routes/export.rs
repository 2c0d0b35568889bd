use axum::{
    extract::{Path, Query, State},
    http::header,
    response::IntoResponse,
    routing::get,
    Router,
};
use serde::Serialize;
use tracing::instrument;

use super::{
    gantt::duties_for,
    jobs::{job_summaries, JobFilterQuery},
    sites::SiteQuery,
    ApiError,
};
use crate::{
    repositories::{JobRepository, NoteRepository, SiteRepository},
    AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/jobs.csv", get(export_jobs))
        .route("/sites.csv", get(export_sites))
        .route("/job/:id/tasks.csv", get(export_job_tasks))
}

/// Serialize `rows` with a header line taken from the row type's field names.
fn to_csv<T: Serialize>(rows: &[T]) -> Result<Vec<u8>, ApiError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in rows {
        writer.serialize(row)?;
    }

    writer
        .into_inner()
        .map_err(|e| ApiError::internal(format!("failed to flush csv: {}", e)))
}

fn csv_response(filename: &str, body: Vec<u8>) -> impl IntoResponse {
    (
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        body,
    )
}

#[instrument(name = "GET /api/export/jobs.csv", skip(app_state))]
async fn export_jobs(
    State(app_state): State<AppState>,
    Query(query): Query<JobFilterQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let jobs = job_summaries(&app_state, query).await?;

    Ok(csv_response("jobs.csv", to_csv(&jobs)?))
}

#[instrument(name = "GET /api/export/sites.csv", skip(app_state))]
async fn export_sites(
    State(app_state): State<AppState>,
    Query(query): Query<SiteQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let sites = app_state.site_repo.get_sites(&query.into()).await?;

    Ok(csv_response("sites.csv", to_csv(&sites)?))
}

#[instrument(name = "GET /api/export/job/:id/tasks.csv", skip(app_state))]
async fn export_job_tasks(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let job = app_state.job_repo.get_job(id).await?;
    let notes = app_state.note_repo.get_notes(id).await?;
    let duties = duties_for(&notes, job.description.as_deref());

    Ok(csv_response(
        &format!("job-{}-tasks.csv", id),
        to_csv(&duties)?,
    ))
}
