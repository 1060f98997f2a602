//! magline-sd (Station Densifier) - survey traverse densification service
//!
//! Accepts survey jobs over HTTP, synthesizes station geometry, delegates
//! value prediction to an external endpoint, and serves merged results.

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use magline_common::config::ensure_data_root;
use magline_sd::config::{CliArgs, ServiceConfig};
use magline_sd::jobs::JobRunner;
use magline_sd::predictor::HttpPredictor;
use magline_sd::store::FsStore;
use magline_sd::{build_router, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    // Log build identification immediately after tracing init
    info!(
        "Starting Magline Station Densifier (magline-sd) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let cli = CliArgs::parse();
    let config = ServiceConfig::resolve(&cli)?;

    ensure_data_root(&config.data_root)?;
    info!("Data root: {}", config.data_root.display());
    info!("Predictor endpoint: {}", config.predictor_url);

    let store = Arc::new(FsStore::new(&config.data_root));
    let predictor = Arc::new(HttpPredictor::new(config.predictor_url.clone())?);
    let runner = Arc::new(JobRunner::new(store, predictor));

    let state = AppState::new(runner);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!("magline-sd listening on http://{}", config.bind_addr);
    info!("Health check: http://{}/health", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
