#![forbid(unsafe_code)]

use anyhow::Result;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::{
    config::Config,
    server::{build_router, AppState},
    store::InMemoryTaskStore,
};

pub mod client;
pub mod config;
pub mod server;
pub mod store;
pub mod types;

pub use types::Task;

pub fn build_state(config: Config) -> AppState {
    let store = if config.seed_tasks {
        InMemoryTaskStore::seeded()
    } else {
        InMemoryTaskStore::new()
    };
    AppState::new(config, store)
}

pub fn build_app(config: Config) -> axum::Router {
    build_router(build_state(config))
}

pub async fn serve(config: Config) -> Result<()> {
    let listener = TcpListener::bind(config.bind_addr).await?;
    serve_on(listener, config).await
}

/// Runs the API on an already bound listener until Ctrl-C.
pub async fn serve_on(listener: TcpListener, config: Config) -> Result<()> {
    info!(
        service = %config.service_name,
        bind_addr = %listener.local_addr()?,
        seeded = config.seed_tasks,
        "task service listening"
    );
    axum::serve(listener, build_app(config))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("task service stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        warn!(%error, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
}
