//! HTTP server for place-distance
//!
//! Provides a JSON API over the search orchestrator.

pub mod routes;
pub mod state;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::geo::RegionHint;
use routes::create_router;
use state::AppState;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

/// Start the HTTP server
///
/// Never returns unless the server shuts down
pub async fn run(config: Config, region: Option<RegionHint>) -> Result<()> {
    let addr = config.server_addr();
    run_on(&addr, config, region).await
}

/// Start the HTTP server on a specific address, overriding config
pub async fn run_on(addr: &str, config: Config, region: Option<RegionHint>) -> Result<()> {
    let addr: SocketAddr = addr
        .parse()
        .map_err(|e| Error::Server(format!("Invalid server address: {}", e)))?;

    let state = Arc::new(AppState::from_config(config, region)?);
    let app = create_router(state);

    info!("Starting server on {}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| Error::Server(format!("Failed to bind to {}: {}", addr, e)))?;

    axum::serve(listener, app)
        .await
        .map_err(|e| Error::Server(format!("Server error: {}", e)))?;

    Ok(())
}
