//! Geocoding module
//!
//! Resolves free-text place names to coordinates through an HTTP transport,
//! with retry/backoff and region-scoped fallback.

pub mod nominatim;
pub mod retry;
pub mod transport;

use crate::config::Config;
use crate::error::{GeocodeError, Result};
use serde::{Deserialize, Serialize};

/// A geocoded location result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoResult {
    /// Latitude
    pub lat: f64,
    /// Longitude
    pub lng: f64,
    /// Display name (address or description)
    pub display_name: String,
}

/// Regional qualifier used by the region-scoped lookup strategy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionHint {
    /// Appended to the query text, e.g. "India"
    pub name: String,
    /// ISO 3166-1 alpha-2 code results are restricted to, e.g. "in"
    pub country_code: String,
}

impl RegionHint {
    pub fn new(name: impl Into<String>, country_code: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            country_code: country_code.into().to_lowercase(),
        }
    }
}

impl std::str::FromStr for RegionHint {
    type Err = String;

    /// Parses `"Name:cc"`, e.g. `"India:in"`
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let (name, code) = s
            .rsplit_once(':')
            .ok_or_else(|| format!("Region must look like 'Name:cc', got: {}", s))?;
        let (name, code) = (name.trim(), code.trim());
        if name.is_empty() || code.len() != 2 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(format!("Invalid region: {}", s));
        }
        Ok(Self::new(name, code))
    }
}

/// Trait for geocoding backends
pub trait GeoBackend: Send + Sync {
    /// Geocode a place name to coordinates
    ///
    /// Returns the best match for the query, `None` if nothing matched, or a
    /// classified error when the provider could not be queried.
    fn geocode(
        &self,
        query: &str,
        region: Option<&RegionHint>,
    ) -> impl std::future::Future<Output = std::result::Result<Option<GeoResult>, GeocodeError>> + Send;
}

/// Build the default geocoder from config
pub fn get_geocoder(
    config: &Config,
) -> Result<nominatim::NominatimClient<transport::HttpTransport>> {
    let transport = transport::HttpTransport::new(config.geocoder.request_timeout())?;
    Ok(nominatim::NominatimClient::new(transport, config))
}
