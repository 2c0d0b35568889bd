use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use tracing::instrument;

use super::{
    error::{required, required_if_present},
    ApiError, JsonOrForm,
};
use crate::{
    domain::Customer,
    repositories::{CustomerRepository, NewCustomer, UpdateCustomer},
    AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_customers).post(create_customer))
        .route("/:id", get(get_customer).patch(update_customer))
}

#[derive(Debug, Deserialize)]
struct CustomerPayload {
    name: Option<String>,
    notes: Option<String>,
}

#[instrument(name = "GET /api/customers", skip(app_state))]
async fn list_customers(
    State(app_state): State<AppState>,
) -> Result<Json<Vec<Customer>>, ApiError> {
    let customers = app_state.customer_repo.get_customers().await?;

    Ok(Json(customers))
}

#[instrument(name = "GET /api/customers/:id", skip(app_state))]
async fn get_customer(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Customer>, ApiError> {
    let customer = app_state.customer_repo.get_customer(id).await?;

    Ok(Json(customer))
}

#[instrument(name = "POST /api/customers", skip(app_state, payload))]
async fn create_customer(
    State(app_state): State<AppState>,
    JsonOrForm(payload): JsonOrForm<CustomerPayload>,
) -> Result<(StatusCode, Json<Customer>), ApiError> {
    let new_customer = NewCustomer {
        name: required(payload.name, "name")?,
        notes: payload.notes,
    };
    let customer = app_state.customer_repo.create_customer(&new_customer).await?;
    tracing::info!("Created customer {}: {}", customer.id, customer.name);

    Ok((StatusCode::CREATED, Json(customer)))
}

#[instrument(name = "PATCH /api/customers/:id", skip(app_state, payload))]
async fn update_customer(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
    JsonOrForm(payload): JsonOrForm<CustomerPayload>,
) -> Result<Json<Customer>, ApiError> {
    let update = UpdateCustomer {
        name: required_if_present(payload.name, "name")?,
        notes: payload.notes,
    };
    let customer = app_state.customer_repo.update_customer(id, &update).await?;

    Ok(Json(customer))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::test_support::{send, send_form, test_app};

    #[tokio::test]
    async fn create_and_fetch_customer() {
        let (app, _) = test_app().await;

        let (status, created) =
            send(&app, "POST", "/api/customers", Some(json!({"name": "Acme Farms"}))).await;
        assert_eq!(status, StatusCode::CREATED);
        let id = created["id"].as_i64().unwrap();

        let (status, fetched) = send(&app, "GET", &format!("/api/customers/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched["name"], "Acme Farms");

        let (status, patched) = send(
            &app,
            "PATCH",
            &format!("/api/customers/{id}"),
            Some(json!({"notes": "gate code 1234"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(patched["name"], "Acme Farms");
        assert_eq!(patched["notes"], "gate code 1234");
    }

    #[tokio::test]
    async fn form_posts_are_accepted() {
        let (app, _) = test_app().await;

        let (status, created) = send_form(&app, "/api/customers", "name=Bolt+Dairy&notes=").await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["name"], "Bolt Dairy");

        let (_, list) = send(&app, "GET", "/api/customers", None).await;
        assert_eq!(list.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn missing_name_is_bad_request() {
        let (app, _) = test_app().await;

        let (status, body) = send(&app, "POST", "/api/customers", Some(json!({"notes": "x"}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "name is required");
    }

    #[tokio::test]
    async fn blank_name_cannot_be_patched_in() {
        let (app, _) = test_app().await;
        let (_, created) = send(&app, "POST", "/api/customers", Some(json!({"name": "Acme"}))).await;
        let uri = format!("/api/customers/{}", created["id"]);

        let (status, body) = send(&app, "PATCH", &uri, Some(json!({"name": "   "}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "name is required");

        let (_, fetched) = send(&app, "GET", &uri, None).await;
        assert_eq!(fetched["name"], "Acme");
    }

    #[tokio::test]
    async fn unknown_customer_is_not_found() {
        let (app, _) = test_app().await;

        let (status, _) = send(&app, "GET", "/api/customers/42", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) =
            send(&app, "PATCH", "/api/customers/42", Some(json!({"name": "Nobody"}))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
