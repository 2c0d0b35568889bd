use axum::{
    async_trait,
    extract::{FromRequest, Request},
    http::header::CONTENT_TYPE,
    Form, Json, RequestExt,
};
use serde::de::DeserializeOwned;

use super::ApiError;

/// Request body accepted either as JSON or as an HTML form post.
pub struct JsonOrForm<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonOrForm<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Send + 'static,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, _state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default();
        let is_json = content_type.starts_with("application/json");
        let is_form = content_type.starts_with("application/x-www-form-urlencoded");

        if is_json {
            let Json(payload) = req
                .extract::<Json<T>, _>()
                .await
                .map_err(|rejection| ApiError::new(rejection.status(), rejection.body_text()))?;
            return Ok(Self(payload));
        }

        if is_form {
            let Form(payload) = req
                .extract::<Form<T>, _>()
                .await
                .map_err(|rejection| ApiError::new(rejection.status(), rejection.body_text()))?;
            return Ok(Self(payload));
        }

        Err(ApiError::unsupported_media_type(
            "expected application/json or application/x-www-form-urlencoded",
        ))
    }
}
