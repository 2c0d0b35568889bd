use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_with::{serde_as, NoneAsEmptyString, PickFirst};
use tracing::instrument;

use super::{
    error::{required, required_if_present},
    ApiError, JsonOrForm,
};
use crate::{
    domain::Site,
    repositories::{CustomerRepository, SiteFields, SiteFilter, SiteRepository},
    AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_sites).post(create_site))
        .route("/:id", get(get_site).patch(update_site))
}

#[serde_as]
#[derive(Debug, Default, Deserialize)]
pub struct SiteQuery {
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub customer_id: Option<i64>,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub q: Option<String>,
}

impl From<SiteQuery> for SiteFilter {
    fn from(query: SiteQuery) -> Self {
        Self {
            customer_id: query.customer_id,
            query: query.q,
        }
    }
}

/// Numeric fields take JSON numbers or form strings. Blank form values count as absent.
#[serde_as]
#[derive(Debug, Deserialize)]
struct SitePayload {
    #[serde_as(as = "PickFirst<(_, NoneAsEmptyString)>")]
    #[serde(default)]
    customer_id: Option<i64>,
    name: Option<String>,
    description: Option<String>,
    address: Option<String>,
    city: Option<String>,
    state: Option<String>,
    zip: Option<String>,
    #[serde_as(as = "PickFirst<(_, NoneAsEmptyString)>")]
    #[serde(default)]
    latitude: Option<f64>,
    #[serde_as(as = "PickFirst<(_, NoneAsEmptyString)>")]
    #[serde(default)]
    longitude: Option<f64>,
    notes: Option<String>,
}

impl From<SitePayload> for SiteFields {
    fn from(payload: SitePayload) -> Self {
        Self {
            customer_id: payload.customer_id,
            name: payload.name,
            description: payload.description,
            address: payload.address,
            city: payload.city,
            state: payload.state,
            zip: payload.zip,
            latitude: payload.latitude,
            longitude: payload.longitude,
            notes: payload.notes,
        }
    }
}

#[instrument(name = "GET /api/sites", skip(app_state))]
async fn list_sites(
    State(app_state): State<AppState>,
    Query(query): Query<SiteQuery>,
) -> Result<Json<Vec<Site>>, ApiError> {
    let sites = app_state.site_repo.get_sites(&query.into()).await?;

    Ok(Json(sites))
}

#[instrument(name = "GET /api/sites/:id", skip(app_state))]
async fn get_site(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Site>, ApiError> {
    let site = app_state.site_repo.get_site(id).await?;

    Ok(Json(site))
}

#[instrument(name = "POST /api/sites", skip(app_state, payload))]
async fn create_site(
    State(app_state): State<AppState>,
    JsonOrForm(payload): JsonOrForm<SitePayload>,
) -> Result<(StatusCode, Json<Site>), ApiError> {
    let name = required(payload.name.clone(), "name")?;
    if let Some(customer_id) = payload.customer_id {
        app_state.customer_repo.get_customer(customer_id).await?;
    }

    let fields = SiteFields {
        name: Some(name),
        ..payload.into()
    };
    let site = app_state.site_repo.create_site(&fields).await?;
    tracing::info!("Created site {}: {}", site.id, site.name);

    Ok((StatusCode::CREATED, Json(site)))
}

#[instrument(name = "PATCH /api/sites/:id", skip(app_state, payload))]
async fn update_site(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
    JsonOrForm(payload): JsonOrForm<SitePayload>,
) -> Result<Json<Site>, ApiError> {
    let name = required_if_present(payload.name.clone(), "name")?;
    if let Some(customer_id) = payload.customer_id {
        app_state.customer_repo.get_customer(customer_id).await?;
    }
    let fields = SiteFields {
        name,
        ..payload.into()
    };
    let site = app_state.site_repo.update_site(id, &fields).await?;

    Ok(Json(site))
}
