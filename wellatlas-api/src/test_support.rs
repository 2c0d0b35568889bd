use axum::{
    body::Body,
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    SqlitePool,
};
use tower::ServiceExt;

use crate::{
    config::{ApplicationSettings, DatabaseSettings, Settings, StorageSettings},
    router,
};

/// Fresh in-memory database with migrations applied. A single connection
/// keeps every query on the same memory database.
pub async fn test_pool() -> SqlitePool {
    let options = SqliteConnectOptions::new()
        .in_memory(true)
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
        .unwrap();
    sqlx::migrate!("./migrations").run(&pool).await.unwrap();
    pool
}

pub async fn seed_site(pool: &SqlitePool, customer_name: &str, site_name: &str) -> i64 {
    let customer_id = sqlx::query("INSERT INTO customers (name) VALUES (?)")
        .bind(customer_name)
        .execute(pool)
        .await
        .unwrap()
        .last_insert_rowid();

    sqlx::query("INSERT INTO sites (customer_id, name) VALUES (?, ?)")
        .bind(customer_id)
        .bind(site_name)
        .execute(pool)
        .await
        .unwrap()
        .last_insert_rowid()
}

/// Job on a site of its own.
pub async fn seed_job(
    pool: &SqlitePool,
    job_number: &str,
    start: Option<&str>,
    end: Option<&str>,
) -> i64 {
    let site_id = seed_site(pool, "Seed Customer", &format!("Site {}", job_number)).await;

    sqlx::query(
        "INSERT INTO jobs (site_id, job_number, start_date, end_date) VALUES (?, ?, ?, ?)",
    )
    .bind(site_id)
    .bind(job_number)
    .bind(start)
    .bind(end)
    .execute(pool)
    .await
    .unwrap()
    .last_insert_rowid()
}

pub fn test_settings() -> Settings {
    Settings {
        application: ApplicationSettings {
            port: 0,
            host: "127.0.0.1".to_string(),
            app_url: "http://localhost:5173".to_string(),
        },
        database: DatabaseSettings {
            path: ":memory:".to_string(),
            create_if_missing: true,
        },
        storage: StorageSettings {
            uploads_path: "/uploads/".to_string(),
        },
    }
}

pub async fn test_app() -> (Router, SqlitePool) {
    let pool = test_pool().await;
    let app = router::create(pool.clone(), &test_settings());
    (app, pool)
}

async fn call(app: &Router, request: Request<Body>) -> (StatusCode, HeaderMap, String) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, headers, String::from_utf8(bytes.to_vec()).unwrap())
}

fn json_body(body: &str) -> Value {
    serde_json::from_str(body).unwrap_or(Value::Null)
}

/// Send an optional JSON body and parse the JSON answer.
pub async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let method = Method::from_bytes(method.as_bytes()).unwrap();
    let request = match body {
        Some(body) => Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => Request::builder().method(method).uri(uri).body(Body::empty()),
    }
    .unwrap();

    let (status, _, body) = call(app, request).await;
    (status, json_body(&body))
}

pub async fn send_form(app: &Router, uri: &str, form: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(form.to_string()))
        .unwrap();

    let (status, _, body) = call(app, request).await;
    (status, json_body(&body))
}

pub async fn get_raw(app: &Router, uri: &str) -> (StatusCode, HeaderMap, String) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    call(app, request).await
}
