//! Server shared state
//!
//! Holds configuration and the search orchestrator shared by all requests.

use crate::config::Config;
use crate::geo::nominatim::NominatimClient;
use crate::geo::transport::HttpTransport;
use crate::geo::{get_geocoder, GeoBackend, RegionHint};
use crate::error::Result;
use crate::search::SearchOrchestrator;
use std::time::Instant;

/// Shared state for the HTTP server
pub struct AppState<G> {
    /// Configuration
    pub config: Config,

    /// Search orchestrator; holds no per-request state
    pub orchestrator: SearchOrchestrator<G>,

    started: Instant,
}

impl AppState<NominatimClient<HttpTransport>> {
    /// State backed by the configured Nominatim geocoder
    pub fn from_config(config: Config, region: Option<RegionHint>) -> Result<Self> {
        let geocoder = get_geocoder(&config)?;
        Ok(Self::new(config, SearchOrchestrator::new(geocoder, region)))
    }
}

impl<G: GeoBackend> AppState<G> {
    /// Create new application state
    pub fn new(config: Config, orchestrator: SearchOrchestrator<G>) -> Self {
        Self {
            config,
            orchestrator,
            started: Instant::now(),
        }
    }

    /// Seconds since the state was created
    pub fn uptime_secs(&self) -> u64 {
        self.started.elapsed().as_secs()
    }
}
