//! msgpub - publish one notification to a pub/sub topic
//!
//! Reads connection settings from `msgpub.toml`, `MSGPUB_*` environment
//! variables and command-line flags, then publishes the event described on
//! the command line with the standard retry budget.

use anyhow::Result;
use clap::Parser;
use msgpub::{cli::Cli, config::Config, credentials::EnvCredentials, Publisher};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration by layering sources: defaults, file, environment, and CLI args.
    let config = Config::load(&cli).unwrap_or_else(|err| {
        // Initialize a default logger for this specific error
        tracing_subscriber::fmt().init();
        error!("Failed to load configuration: {}", err);
        std::process::exit(1);
    });

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .init();

    info!("-------------------- Configuration --------------------");
    info!("Log Level: {}", config.log_level);
    info!("Region: {}", config.messaging.region);
    info!("Topic ARN: {}", config.messaging.topic_arn);
    info!("Source: {}", config.messaging.source);
    info!(
        "Endpoint: {}",
        config.messaging.endpoint.as_deref().unwrap_or("Default")
    );
    info!("Max Attempts: {}", config.messaging.retry.max_attempts);
    info!("Backoff: {}ms", config.messaging.retry.backoff_ms);
    info!("-------------------------------------------------------");

    let payload = cli.payload()?;
    let publisher = Publisher::connect(config.messaging, &EnvCredentials::default()).await?;

    if let Err(e) = publisher.publish(&payload).await {
        error!("{}", e);
        std::process::exit(1);
    }

    info!(
        "Notification '{}' published.",
        payload.event_type.as_deref().unwrap_or_default()
    );
    Ok(())
}
