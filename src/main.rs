use anyhow::Result;
use banana_studio::{config, server};
use tracing::info;
use tracing_subscriber::filter::LevelFilter;

/// Validates that a log level string is valid
fn validate_log_level(level: &str) -> Result<LevelFilter> {
    level.parse::<LevelFilter>().map_err(|_| {
        anyhow::anyhow!(
            "Invalid log level: '{}'. Valid levels: error, warn, info, debug, trace",
            level
        )
    })
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

    // RUST_LOG wins over the configured level
    let env_filter = match tracing_subscriber::EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => match validate_log_level(&config.server.logs.level) {
            Ok(level) => tracing_subscriber::EnvFilter::default().add_directive(level.into()),
            Err(e) => {
                eprintln!("{}", e);
                std::process::exit(1);
            }
        },
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .json()
        .init();

    info!("Starting Banana Studio server");
    info!("Configuration loaded successfully");

    server::run(config).await?;

    Ok(())
}
