use axum::{
    extract::{Query, State},
    http::header,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use schedule::{render_ics, timeline, TimelineEntry};
use time::OffsetDateTime;
use tracing::instrument;

use super::{jobs::{scheduled_jobs, JobFilterQuery}, ApiError};
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/jobs_timeline", get(jobs_timeline))
        .route("/calendar/events", get(calendar_events))
        .route("/calendar.ics", get(calendar_ics))
}

async fn timeline_entries(
    app_state: &AppState,
    query: JobFilterQuery,
) -> Result<Vec<TimelineEntry>, ApiError> {
    let filter = query.into_filter()?;
    let jobs = scheduled_jobs(app_state, &filter).await?;

    Ok(timeline(jobs, &filter))
}

#[instrument(name = "GET /api/jobs_timeline", skip(app_state))]
async fn jobs_timeline(
    State(app_state): State<AppState>,
    Query(query): Query<JobFilterQuery>,
) -> Result<Json<Vec<TimelineEntry>>, ApiError> {
    let entries = timeline_entries(&app_state, query).await?;

    Ok(Json(entries))
}

#[instrument(name = "GET /api/calendar/events", skip(app_state))]
async fn calendar_events(
    State(app_state): State<AppState>,
    Query(query): Query<JobFilterQuery>,
) -> Result<Json<Vec<TimelineEntry>>, ApiError> {
    let entries = timeline_entries(&app_state, query).await?;

    Ok(Json(entries))
}

#[instrument(name = "GET /api/calendar.ics", skip(app_state))]
async fn calendar_ics(
    State(app_state): State<AppState>,
    Query(query): Query<JobFilterQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let entries = timeline_entries(&app_state, query).await?;
    let body = render_ics(&entries, OffsetDateTime::now_utc())?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/calendar; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"wellatlas.ics\"",
            ),
        ],
        body,
    ))
}
