use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use schedule::{job_duties, timeline, Duty, ScheduledJob, TimelineEntry, TimelineFilter};
use serde::Serialize;
use tracing::instrument;

use super::ApiError;
use crate::{
    domain::Note,
    repositories::{JobRepository, NoteRepository, SiteRepository},
    AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/site/:id", get(site_gantt))
        .route("/job/:id", get(job_gantt))
}

#[derive(Debug, Serialize)]
struct SiteHeader {
    id: i64,
    name: String,
}

#[derive(Debug, Serialize)]
struct SiteGantt {
    site: SiteHeader,
    items: Vec<TimelineEntry>,
}

#[derive(Debug, Serialize)]
struct JobHeader {
    id: i64,
    number: String,
    title: Option<String>,
    category: Option<String>,
    site_id: i64,
}

#[derive(Debug, Serialize)]
struct JobGantt {
    job: JobHeader,
    items: Vec<Duty>,
}

#[instrument(name = "GET /api/gantt/site/:id", skip(app_state))]
async fn site_gantt(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<SiteGantt>, ApiError> {
    let site = app_state.site_repo.get_site(id).await?;
    let rows = app_state.job_repo.get_job_rows(Some(id)).await?;
    let items = timeline(rows.into_iter().map(ScheduledJob::from), &TimelineFilter::for_site(id));

    Ok(Json(SiteGantt {
        site: SiteHeader {
            id: site.id,
            name: site.name,
        },
        items,
    }))
}

#[instrument(name = "GET /api/gantt/job/:id", skip(app_state))]
async fn job_gantt(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<JobGantt>, ApiError> {
    let job = app_state.job_repo.get_job(id).await?;
    let notes = app_state.note_repo.get_notes(id).await?;
    let items = duties_for(&notes, job.description.as_deref());
    tracing::debug!("Parsed {} duties for job {}", items.len(), id);

    Ok(Json(JobGantt {
        job: JobHeader {
            id: job.id,
            number: job.job_number,
            title: job.description,
            category: job.job_category,
            site_id: job.site_id,
        },
        items,
    }))
}

/// Duties from notes, oldest first, falling back to the job description.
pub(crate) fn duties_for(notes: &[Note], description: Option<&str>) -> Vec<Duty> {
    job_duties(notes.iter().map(|note| note.content.as_str()), description)
}
