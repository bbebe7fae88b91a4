mod config;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use counter_logging::{counter_info, counter_warn};
use counter_service::{bind, router, serve, MessageCounter};

use crate::config::ConfigSource;

const DEFAULT_CONFIG: &str = "counter.ron";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config_path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG));
    let config = config::load(&config_path);

    if !counter_logging::initialize(config.log_destination, config.log_level) {
        eprintln!("Warning: A logger was already installed; log settings ignored");
    }
    match &config.source {
        ConfigSource::File(path) => counter_info!("Loaded config from {:?}", path),
        ConfigSource::Defaults => counter_info!("Using default config"),
    }
    for warning in &config.warnings {
        counter_warn!("{}", warning);
    }

    let settings = config.service;
    let listener = bind(&settings)
        .await
        .with_context(|| format!("failed to bind {}", settings.bind_addr))?;

    let counter = Arc::new(MessageCounter::new());
    let app = router(counter, &settings);

    serve(listener, app, shutdown_signal())
        .await
        .context("server error")?;
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => counter_info!("Shutdown requested"),
        Err(err) => {
            // Without a signal handler the server runs until killed.
            counter_warn!("Failed to listen for Ctrl-C: {}", err);
            std::future::pending::<()>().await;
        }
    }
}
