use anyhow::Result;
use candidate_intake::environment::EnvironmentConfig;
use candidate_intake::start_web_server;
use tracing::info;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or(EnvFilter::new("candidate_intake=info,rocket::server=off")),
        )
        .init();

    let port = match std::env::var("ROCKET_PORT") {
        Ok(value) => value
            .parse::<u16>()
            .map_err(|_| anyhow::anyhow!("ROCKET_PORT must be a valid port number"))?,
        Err(_) => 8000,
    };

    let config = EnvironmentConfig::load()?;
    config.ensure_directories().await?;

    info!("Starting Candidate Intake API Server");
    info!(
        "Environment: {}",
        std::env::var("INTAKE_ENV").unwrap_or_else(|_| "local".to_string())
    );
    info!("Database: {}", config.database_path.display());
    info!("Server: http://0.0.0.0:{}", port);

    start_web_server(config.database_path, port).await
}
