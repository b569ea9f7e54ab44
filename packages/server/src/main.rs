use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use exam_server::config::AppConfig;
use exam_server::state::AppState;
use exam_server::{build_router, database, seed};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = AppConfig::load().context("Failed to load configuration")?;

    let db = database::init_db(&config.database)
        .await
        .context("Failed to initialize database")?;
    seed::ensure_indexes(&db)
        .await
        .context("Failed to create indexes")?;
    if config.database.seed_subjects {
        seed::seed_subjects(&db)
            .await
            .context("Failed to seed subjects")?;
    }

    let addr = config.bind_addr();
    let state = AppState { db, config };
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Exam server listening on http://{addr}");
    info!("API docs at http://{addr}/swagger-ui and http://{addr}/scalar");

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
