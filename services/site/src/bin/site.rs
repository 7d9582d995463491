//! services/site/src/bin/site.rs

use site_lib::{
    adapters::ToastQueue,
    config::Config,
    error::SiteError,
    host::{run, SiteState},
};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), SiteError> {
    // --- 1. Load Configuration & Set Up Logging ---
    // Logs go to stderr; stdout carries the view updates.
    let config = Config::from_env()?;
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
    info!("Configuration loaded. Mounting widgets...");

    // --- 2. Build the Page State ---
    let toasts = Arc::new(ToastQueue::new());
    let mut state = SiteState::init(&config, toasts.clone())?;
    info!(
        tasks = state.tasks.len(),
        products = state.catalog.len(),
        storage_key = state.tasks.storage_key(),
        "Page state ready"
    );

    // --- 3. Run the Event Loop over stdin/stdout ---
    run(&mut state, &toasts, tokio::io::stdin(), tokio::io::stdout()).await?;

    Ok(())
}
