use dunex::config::Config;
use dunex::services::{default_manifest, CatalogService, PythonScorer, SheetClient};
use dunex::AppState;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dunex=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env().map_err(|e| format!("Failed to load configuration: {}", e))?;

    tracing::info!("Starting Dune-X API server");
    tracing::info!("Configuration loaded successfully");

    // Stage catalog, loaded lazily and revalidated on a fixed window
    let catalog = CatalogService::new(
        config.stages_dir.clone(),
        default_manifest(),
        config.catalog_revalidate_secs,
    );
    match catalog.stages().await {
        Ok(stages) => tracing::info!("Stage catalog ready: {} stages", stages.len()),
        Err(e) => tracing::warn!("Stage catalog not loadable at startup: {}", e),
    }

    let scorer = PythonScorer::new(&config.scorer);
    if !scorer.script_exists() {
        tracing::warn!(
            "Scoring script {} not found, tournament scoring will fail",
            config.scorer.script.display()
        );
    }

    if config.admin_password.is_none() {
        tracing::warn!("ADMIN_PASSWORD not set, admin login is disabled");
    }

    let sheet = config.tournament_sheet_url.clone().map(SheetClient::new);
    if sheet.is_none() {
        tracing::info!("TOURNAMENT_SHEET_URL not configured. Tournament data proxy disabled.");
    }

    // Create application state
    let state = Arc::new(AppState {
        catalog,
        scorer: Arc::new(scorer),
        sheet,
        admin_password: config.admin_password.clone(),
        metrics: config.metrics.clone(),
    });

    // Build router with CORS and tracing
    let app = dunex::routes::create_router(state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http());

    // Start server
    let addr = config.server_address();
    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
