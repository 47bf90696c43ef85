//! Centralized constants for the place-distance crate
//!
//! This module consolidates constants that are used across multiple modules
//! to avoid duplication and ensure consistency.

/// Geographic constants
pub mod geo {
    /// Mean Earth radius in kilometers
    pub const EARTH_RADIUS_KM: f64 = 6371.0;

    /// Miles per kilometer
    pub const MILES_PER_KM: f64 = 0.621371;
}

/// External API endpoints
pub mod api {
    /// OpenStreetMap Nominatim geocoding API
    pub const NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org";

    /// Example contact address shipped in the default config.
    ///
    /// Nominatim's usage policy asks every client to identify itself; this
    /// value must be replaced before real use.
    pub const PLACEHOLDER_CONTACT: &str = "your-email@example.com";

    /// User agent sent with every geocoding request
    pub const USER_AGENT: &str = concat!("place-distance/", env!("CARGO_PKG_VERSION"));
}

/// Map view settings
pub mod map {
    /// Default view center (India)
    pub const DEFAULT_CENTER: (f64, f64) = (20.5937, 78.9629);

    /// Default zoom level
    pub const DEFAULT_ZOOM: u8 = 5;

    /// Padding applied to each side of a fitted viewport, as a fraction of its span
    pub const FIT_PADDING: f64 = 0.25;
}
