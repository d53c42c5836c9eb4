use biblio_app::{
    adapters::{memory_dependencies, postgres::run_migrations, postgres_dependencies},
    api::{handlers::AppState, router::create_router},
    config::{AppConfig, StorageBackend},
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Variables in .env are optional
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "biblio_app=debug,tower_http=debug,axum=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;

    // Wire repositories for the configured storage
    let service_deps = match (config.storage, config.database.url.as_deref()) {
        (StorageBackend::Postgres, Some(database_url)) => {
            let pool = sqlx::postgres::PgPoolOptions::new()
                .max_connections(config.database.max_connections)
                .connect(database_url)
                .await?;
            run_migrations(&pool).await?;
            tracing::info!("Using PostgreSQL storage");
            postgres_dependencies(pool)
        }
        _ => {
            tracing::warn!("Using in-memory storage; data is lost on shutdown");
            memory_dependencies()
        }
    };

    // Create application state
    let app_state = Arc::new(AppState { service_deps });

    // Create router
    let app = create_router(app_state);

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on {}", addr);

    // Start server
    axum::serve(listener, app).await?;

    Ok(())
}
