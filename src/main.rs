//! Blu-Reserve terminal client
//!
//! Signs in against the booking service, polls the seat map and renders it
//! in the terminal. Logs go to stderr; the screen goes to stdout.

use std::sync::Arc;

use anyhow::Result;
use blu_reserve::api::HttpBackend;
use blu_reserve::client::{ClientSettings, DeskClient};
use blu_reserve::config;
use blu_reserve::ui::{terminal, RenderOptions};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "blu_reserve=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::info!("Starting Blu-Reserve");

    // Load configuration
    let config = config::load_config()?;
    tracing::info!(
        base_url = %config.base_url,
        poll_interval_ms = config.poll_interval_ms,
        "Configuration loaded"
    );

    let backend = HttpBackend::from_config(&config)?;
    let client = Arc::new(DeskClient::new(
        Arc::new(backend),
        ClientSettings::from(&config),
    ));

    let options = RenderOptions {
        color: config.color,
        ..Default::default()
    };
    terminal::run(client, options).await
}
