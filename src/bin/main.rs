use std::net::SocketAddr;

use migration::{Migrator, MigratorTrait};
use student_service::bootstrap::initialize_instructor_account;
use student_service::static_service::get_database_connection;
use student_service::{app, config::APP_CONFIG, utils::tracing::init_standard_tracing};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    init_standard_tracing(env!("CARGO_CRATE_NAME"));

    tracing::info!("Starting application...");

    // Initialize database connection
    let db_connection = get_database_connection().await;

    tracing::info!("Running pending migrations...");
    Migrator::up(db_connection, None).await?;

    // Seed the default instructor account
    tracing::info!("Checking instructor account...");
    if let Err(e) = initialize_instructor_account(db_connection).await {
        tracing::error!("Failed to initialize instructor account: {}", e);
        tracing::warn!("Continuing without instructor account initialization...");
    }

    let app = app::create_app().await?;

    let http_address = format!("0.0.0.0:{}", APP_CONFIG.port);
    tracing::info!("HTTP server listening on {}", &http_address);

    let listener = tokio::net::TcpListener::bind(http_address).await?;

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
