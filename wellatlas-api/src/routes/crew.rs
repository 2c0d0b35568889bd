use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_with::{serde_as, NoneAsEmptyString, PickFirst};
use tracing::instrument;

use super::{error::required, ApiError, JsonOrForm};
use crate::{
    domain::{Assignment, CrewMember},
    repositories::{AssignmentScope, CrewRepository, JobRepository, NewAssignment, NewCrewMember},
    AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_crew).post(create_crew_member))
        .route("/:id/assignments", get(list_assignments))
}

pub fn assignments_router() -> Router<AppState> {
    Router::new().route("/", post(create_assignment))
}

#[derive(Debug, Deserialize)]
struct CrewPayload {
    name: Option<String>,
    role: Option<String>,
    phone: Option<String>,
}

#[serde_as]
#[derive(Debug, Deserialize)]
struct AssignmentPayload {
    #[serde_as(as = "PickFirst<(_, NoneAsEmptyString)>")]
    #[serde(default)]
    crew_id: Option<i64>,
    #[serde_as(as = "PickFirst<(_, NoneAsEmptyString)>")]
    #[serde(default)]
    job_id: Option<i64>,
    start_date: Option<String>,
    end_date: Option<String>,
    role: Option<String>,
}

#[instrument(name = "GET /api/crew", skip(app_state))]
async fn list_crew(State(app_state): State<AppState>) -> Result<Json<Vec<CrewMember>>, ApiError> {
    let crew = app_state.crew_repo.get_crew().await?;

    Ok(Json(crew))
}

#[instrument(name = "POST /api/crew", skip(app_state, payload))]
async fn create_crew_member(
    State(app_state): State<AppState>,
    JsonOrForm(payload): JsonOrForm<CrewPayload>,
) -> Result<(StatusCode, Json<CrewMember>), ApiError> {
    let member = NewCrewMember {
        name: required(payload.name, "name")?,
        role: payload.role,
        phone: payload.phone,
    };
    let member = app_state.crew_repo.create_crew_member(&member).await?;

    Ok((StatusCode::CREATED, Json(member)))
}

#[instrument(name = "GET /api/crew/:id/assignments", skip(app_state))]
async fn list_assignments(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<Assignment>>, ApiError> {
    app_state.crew_repo.get_crew_member(id).await?;
    let assignments = app_state
        .crew_repo
        .get_assignments(AssignmentScope::Crew(id))
        .await?;

    Ok(Json(assignments))
}

#[instrument(name = "POST /api/assignments", skip(app_state, payload))]
async fn create_assignment(
    State(app_state): State<AppState>,
    JsonOrForm(payload): JsonOrForm<AssignmentPayload>,
) -> Result<(StatusCode, Json<Assignment>), ApiError> {
    let crew_id = payload
        .crew_id
        .ok_or_else(|| ApiError::bad_request("crew_id is required"))?;
    let job_id = payload
        .job_id
        .ok_or_else(|| ApiError::bad_request("job_id is required"))?;
    let start_date = required(payload.start_date, "start_date")?;
    let end_date = required(payload.end_date, "end_date")?;

    app_state.crew_repo.get_crew_member(crew_id).await?;
    app_state.job_repo.get_job(job_id).await?;

    let assignment = NewAssignment {
        crew_id,
        job_id,
        start_date,
        end_date,
        role: payload.role,
    };
    let assignment = app_state.crew_repo.create_assignment(&assignment).await?;
    tracing::info!(
        "Assigned {} to job {} ({} to {})",
        assignment.crew_name,
        assignment.job_number,
        assignment.start_date,
        assignment.end_date
    );

    Ok((StatusCode::CREATED, Json(assignment)))
}
