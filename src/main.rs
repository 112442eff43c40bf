use anyhow::Result;
use localmind::{config, server};
use tracing::{info, warn};

/// Validates that a log level string is valid
fn validate_log_level(level: &str) -> Result<()> {
    level
        .parse::<tracing_subscriber::filter::LevelFilter>()
        .map_err(|_| {
            anyhow::anyhow!(
                "Invalid log level: '{}'. Valid levels: error, warn, info, debug, trace",
                level
            )
        })?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (before logging setup)
    let config = match config::load().await {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    // RUST_LOG may carry a full filter directive; only a bare config level is validated
    let log_level = match std::env::var("RUST_LOG") {
        Ok(filter) => filter,
        Err(_) => {
            if let Err(e) = validate_log_level(&config.server.logs.level) {
                eprintln!("{}", e);
                std::process::exit(1);
            }
            config.server.logs.level.clone()
        }
    };

    let filter = match tracing_subscriber::EnvFilter::try_new(&log_level) {
        Ok(filter) => filter,
        Err(e) => {
            eprintln!("Invalid log filter '{}': {}", log_level, e);
            std::process::exit(1);
        }
    };

    tracing_subscriber::fmt().with_env_filter(filter).json().init();

    info!("Starting LocalMind AI backend with log level: {}", log_level);
    info!("Configuration loaded successfully");

    if config.llm.credential().is_none() {
        warn!("GEMINI_API_KEY not found in environment variables.");
    }

    server::run(config).await?;

    Ok(())
}
