use bank_desk_advisor::{
    advisor::Advisor,
    api::{start_server, ApiState},
    config::AppConfig,
    desks::create_default_registry,
    gemini::GeminiClient,
};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load environment variables
    dotenv::dotenv().ok();

    let config = AppConfig::from_env()?;

    info!("🏦 Bank Desk Advisor");
    info!("📍 Port: {}", config.port);
    info!("🤖 Model: {}", config.model);

    let client = GeminiClient::from_config(&config)?;
    let advisor = Advisor::new(Arc::new(client)).with_redacted_errors(config.redact_errors);

    let state = ApiState {
        registry: Arc::new(create_default_registry()),
        advisor,
    };

    info!("✅ Desks initialized");
    info!("📡 Starting server...");

    start_server(state, config.port).await?;

    Ok(())
}
