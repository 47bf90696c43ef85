//! place-distance: straight-line distance between two named places
//!
//! A library and CLI tool that geocodes two free-text place names through
//! Nominatim and reports the great-circle distance between them.
//!
//! ## Features
//!
//! - Region-scoped lookup with a plain fallback
//! - Retry with exponential backoff on rate limits and network errors
//! - Concurrent lookups classified into success, not-found or failure
//! - Stale-result discard for overlapping searches
//! - Text, JSON, GeoJSON, GPX and map-link output
//! - HTTP API + CLI interface
//!
//! ## Quick Start
//!
//! ```rust
//! use place_distance::distance::{format_distance, great_circle_distance_km, DistanceUnit};
//!
//! let km = great_circle_distance_km(28.6139, 77.2090, 19.0760, 72.8777);
//! println!("{}", format_distance(km, DistanceUnit::Km));
//! ```

pub mod cli;
pub mod config;
pub mod constants;
pub mod distance;
pub mod error;
pub mod format;
pub mod geo;
pub mod map;
pub mod search;
pub mod server;

// Re-export commonly used types
pub use config::Config;
pub use distance::{great_circle_distance_km, DistanceUnit};
pub use error::{Error, ErrorKind, GeocodeError, Result};
pub use geo::{GeoBackend, GeoResult, RegionHint};
pub use search::{SearchOrchestrator, SearchOutcome};
