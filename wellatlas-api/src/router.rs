use axum::{
    http::{header, Method},
    routing::get,
    Router,
};
use sqlx::SqlitePool;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::{DefaultMakeSpan, TraceLayer},
};

use crate::{app_state::AppState, config::Settings, routes};

pub fn create(connection_pool: SqlitePool, config: &Settings) -> Router<()> {
    let api = Router::new()
        .nest("/customers", routes::customers::router())
        .nest("/sites", routes::sites::router())
        .nest("/jobs", routes::jobs::router())
        .nest("/crew", routes::crew::router())
        .nest("/assignments", routes::crew::assignments_router())
        .nest("/gantt", routes::gantt::router())
        .nest("/export", routes::export::router())
        .merge(routes::timeline::router());

    let app_state = AppState::new(connection_pool, &config.storage.uploads_path);

    let app_url = config.application.app_url.clone();
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PATCH])
        .allow_headers([header::CONTENT_TYPE])
        .allow_origin(AllowOrigin::predicate(move |origin, _| {
            origin.to_str().is_ok_and(|origin| origin == app_url)
        }));

    Router::new()
        .route("/", get(|| async { "WellAtlas is running" }))
        .nest("/api", api)
        .with_state(app_state)
        .layer(cors)
        .layer(TraceLayer::new_for_http().make_span_with(DefaultMakeSpan::default()))
}
