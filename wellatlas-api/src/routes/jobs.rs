use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use schedule::{filter_jobs, DateWindow, JobSummary, ScheduleError, ScheduledJob, TimelineFilter};
use serde::Deserialize;
use serde_with::{serde_as, NoneAsEmptyString, PickFirst};
use time::OffsetDateTime;
use tracing::instrument;

use super::{
    error::{required, required_if_present},
    ApiError, JsonOrForm,
};
use crate::{
    domain::{Assignment, FileType, Job, JobFile, Note},
    repositories::{
        AssignmentScope, CrewRepository, FileRepository, JobFields, JobRepository, NewJobFile,
        NoteRepository, SiteRepository,
    },
    AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_jobs).post(create_job))
        .route("/:id", get(get_job).patch(update_job))
        .route("/:id/notes", get(list_notes).post(create_note))
        .route("/:id/files", get(list_files).post(create_file))
        .route("/:id/assignments", get(list_assignments))
}

/// Query string shared by every job listing: the jobs list, the timeline,
/// the calendar and the CSV export. Empty values count as absent.
#[serde_as]
#[derive(Debug, Default, Deserialize)]
pub struct JobFilterQuery {
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub customer_id: Option<i64>,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub site_id: Option<i64>,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub category: Option<String>,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub status: Option<String>,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub q: Option<String>,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub start_after: Option<String>,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub end_before: Option<String>,
}

impl JobFilterQuery {
    pub fn into_filter(self) -> Result<TimelineFilter, ScheduleError> {
        let window = DateWindow::parse(self.start_after.as_deref(), self.end_before.as_deref())?;

        Ok(TimelineFilter {
            customer_id: self.customer_id,
            site_id: self.site_id,
            category: self.category,
            status: self.status,
            query: self.q,
            window,
        })
    }
}

/// Jobs joined with their site and customer, narrowed to a single site
/// when the filter names one.
pub(crate) async fn scheduled_jobs(
    app_state: &AppState,
    filter: &TimelineFilter,
) -> Result<Vec<ScheduledJob>, ApiError> {
    let rows = app_state.job_repo.get_job_rows(filter.site_id).await?;

    Ok(rows.into_iter().map(ScheduledJob::from).collect())
}

/// Rows of the jobs list view, also used by the CSV export.
pub(crate) async fn job_summaries(
    app_state: &AppState,
    query: JobFilterQuery,
) -> Result<Vec<JobSummary>, ApiError> {
    let filter = query.into_filter()?;
    let jobs = scheduled_jobs(app_state, &filter).await?;
    let today = OffsetDateTime::now_utc().date();

    Ok(filter_jobs(jobs, &filter)
        .iter()
        .map(|job| job.summarize(today))
        .collect())
}

#[serde_as]
#[derive(Debug, Deserialize)]
struct JobPayload {
    #[serde_as(as = "PickFirst<(_, NoneAsEmptyString)>")]
    #[serde(default)]
    site_id: Option<i64>,
    job_number: Option<String>,
    job_category: Option<String>,
    status: Option<String>,
    description: Option<String>,
    start_date: Option<String>,
    end_date: Option<String>,
}

impl From<JobPayload> for JobFields {
    fn from(payload: JobPayload) -> Self {
        Self {
            site_id: payload.site_id,
            job_number: payload.job_number,
            job_category: payload.job_category,
            status: payload.status,
            description: payload.description,
            start_date: payload.start_date,
            end_date: payload.end_date,
        }
    }
}

#[instrument(name = "GET /api/jobs", skip(app_state))]
async fn list_jobs(
    State(app_state): State<AppState>,
    Query(query): Query<JobFilterQuery>,
) -> Result<Json<Vec<JobSummary>>, ApiError> {
    let jobs = job_summaries(&app_state, query).await?;

    Ok(Json(jobs))
}

#[instrument(name = "GET /api/jobs/:id", skip(app_state))]
async fn get_job(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Job>, ApiError> {
    let job = app_state.job_repo.get_job(id).await?;

    Ok(Json(job))
}

#[instrument(name = "POST /api/jobs", skip(app_state, payload))]
async fn create_job(
    State(app_state): State<AppState>,
    JsonOrForm(payload): JsonOrForm<JobPayload>,
) -> Result<(StatusCode, Json<Job>), ApiError> {
    let site_id = payload
        .site_id
        .ok_or_else(|| ApiError::bad_request("site_id is required"))?;
    let job_number = required(payload.job_number.clone(), "job_number")?;
    app_state.site_repo.get_site(site_id).await?;

    let fields = JobFields {
        job_number: Some(job_number),
        ..payload.into()
    };
    let job = app_state.job_repo.create_job(&fields).await?;
    tracing::info!("Created job {} ({}) on site {}", job.id, job.job_number, site_id);

    Ok((StatusCode::CREATED, Json(job)))
}

#[instrument(name = "PATCH /api/jobs/:id", skip(app_state, payload))]
async fn update_job(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
    JsonOrForm(payload): JsonOrForm<JobPayload>,
) -> Result<Json<Job>, ApiError> {
    let job_number = required_if_present(payload.job_number.clone(), "job_number")?;
    if let Some(site_id) = payload.site_id {
        app_state.site_repo.get_site(site_id).await?;
    }
    let fields = JobFields {
        job_number,
        ..payload.into()
    };
    let job = app_state.job_repo.update_job(id, &fields).await?;

    Ok(Json(job))
}

#[instrument(name = "GET /api/jobs/:id/notes", skip(app_state))]
async fn list_notes(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<Note>>, ApiError> {
    app_state.job_repo.get_job(id).await?;
    let notes = app_state.note_repo.get_notes(id).await?;

    Ok(Json(notes))
}

#[derive(Debug, Deserialize)]
struct NotePayload {
    content: Option<String>,
}

#[instrument(name = "POST /api/jobs/:id/notes", skip(app_state, payload))]
async fn create_note(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
    JsonOrForm(payload): JsonOrForm<NotePayload>,
) -> Result<(StatusCode, Json<Note>), ApiError> {
    let content = required(payload.content, "content")?;
    app_state.job_repo.get_job(id).await?;
    let note = app_state.note_repo.create_note(id, &content).await?;

    Ok((StatusCode::CREATED, Json(note)))
}

#[instrument(name = "GET /api/jobs/:id/files", skip(app_state))]
async fn list_files(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<JobFile>>, ApiError> {
    app_state.job_repo.get_job(id).await?;
    let files = app_state.file_repo.get_files(id).await?;

    Ok(Json(files))
}

#[derive(Debug, Deserialize)]
struct FilePayload {
    filename: Option<String>,
    url: Option<String>,
}

#[instrument(name = "POST /api/jobs/:id/files", skip(app_state, payload))]
async fn create_file(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
    JsonOrForm(payload): JsonOrForm<FilePayload>,
) -> Result<(StatusCode, Json<JobFile>), ApiError> {
    let filename = required(payload.filename, "filename")?;
    app_state.job_repo.get_job(id).await?;

    let url = payload
        .url
        .filter(|url| !url.trim().is_empty())
        .unwrap_or_else(|| app_state.upload_url(id, &filename));
    let new_file = NewJobFile {
        job_id: id,
        file_type: FileType::from_filename(&filename),
        filename,
        url,
    };
    let file = app_state.file_repo.create_file(&new_file).await?;

    Ok((StatusCode::CREATED, Json(file)))
}

#[instrument(name = "GET /api/jobs/:id/assignments", skip(app_state))]
async fn list_assignments(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<Assignment>>, ApiError> {
    app_state.job_repo.get_job(id).await?;
    let assignments = app_state
        .crew_repo
        .get_assignments(AssignmentScope::Job(id))
        .await?;

    Ok(Json(assignments))
}
