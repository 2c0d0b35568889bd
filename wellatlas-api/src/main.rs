use anyhow::Context;
use sqlx::sqlite::SqlitePoolOptions;
use tracing_subscriber::{
    fmt::time::LocalTime, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

mod app_state;
mod config;
mod domain;
mod repositories;
mod router;
mod routes;
#[cfg(test)]
mod test_support;

pub use app_state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wellatlas_api=debug,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_timer(LocalTime::rfc_3339()))
        .init();

    let config = config::read_config().context("failed to read configuration")?;

    if let Some(parent) = std::path::Path::new(&config.database.path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
    }

    let connection_pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(config.database.connect_options())
        .await
        .context("failed to open database")?;
    tracing::info!("Opened database at {}", config.database.path);

    sqlx::migrate!("./migrations")
        .run(&connection_pool)
        .await
        .context("failed to run migrations")?;

    let app = router::create(connection_pool, &config);

    let addr = format!("{}:{}", config.application.host, config.application.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    tracing::info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Received shutdown signal, shutting down"),
        Err(e) => tracing::error!("Unable to listen for shutdown signal: {}", e),
    }
}
