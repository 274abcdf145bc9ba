use std::sync::Arc;

use teetime::application::AgentService;
use teetime::config::Config;
use teetime::domain::call_task::CallTaskRepository;
use teetime::domain::provider::VoiceProvider;
use teetime::infrastructure::persistence::{
    create_pool, run_migrations, DatabaseConfig, PgCallTaskRepository,
};
use teetime::infrastructure::vapi::VapiClient;
use teetime::interface::api::{build_router, init_metrics, AppState};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting teetime call scheduling service");

    // Load configuration
    let config = Config::from_env();
    if config.vapi.api_key.is_empty() {
        warn!("VAPI_API_KEY is not set; AI agent calls will fail");
    }

    // Initialize database
    let db_config = DatabaseConfig {
        url: config.database.url.clone(),
        ..Default::default()
    };
    let pool = create_pool(&db_config).await?;
    run_migrations(&pool).await?;

    // Wire repositories and services
    let call_repository: Arc<dyn CallTaskRepository> =
        Arc::new(PgCallTaskRepository::new(pool.clone()));
    let provider: Arc<dyn VoiceProvider> =
        Arc::new(VapiClient::new(config.vapi.clone(), reqwest::Client::new()));
    let agent_service = Arc::new(AgentService::new(
        call_repository.clone(),
        provider,
        config.vapi.course_name.clone(),
    ));

    // Initialize metrics exporter
    let prometheus_handle = init_metrics();

    let state = AppState {
        call_repository,
        agent_service,
    };
    let app = build_router(state, prometheus_handle);

    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!("REST API server started on {}", bind_addr);

    let server_handle = tokio::spawn(async move {
        axum::serve(listener, app).await.expect("API server failed");
    });

    // Keep the server running
    tokio::signal::ctrl_c().await?;
    info!("Shutting down...");
    server_handle.abort();

    Ok(())
}
