//! Great-circle distance math
//!
//! Pure functions only. Inputs are decimal degrees and are not validated here;
//! geocoder results are trusted.

use crate::constants::geo::{EARTH_RADIUS_KM, MILES_PER_KM};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Distance between two points in kilometers (Haversine formula)
///
/// # Arguments
/// * `lat1`, `lon1` - First point in decimal degrees
/// * `lat2`, `lon2` - Second point in decimal degrees
///
/// # Returns
/// Distance in kilometers, never negative
pub fn great_circle_distance_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let to_rad = |deg: f64| deg * PI / 180.0;

    let delta_lat = to_rad(lat2 - lat1);
    let delta_lon = to_rad(lon2 - lon1);

    let a = (delta_lat / 2.0).sin().powi(2)
        + to_rad(lat1).cos() * to_rad(lat2).cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    (EARTH_RADIUS_KM * c).max(0.0)
}

/// Convert kilometers to miles
pub fn km_to_miles(km: f64) -> f64 {
    km * MILES_PER_KM
}

/// Convert miles to kilometers
pub fn miles_to_km(miles: f64) -> f64 {
    miles / MILES_PER_KM
}

/// Unit used when presenting a distance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceUnit {
    #[default]
    Km,
    Miles,
}

impl DistanceUnit {
    /// Express a kilometer value in this unit
    pub fn from_km(&self, km: f64) -> f64 {
        match self {
            Self::Km => km,
            Self::Miles => km_to_miles(km),
        }
    }

    /// Unit label used in display text
    pub fn label(&self) -> &'static str {
        match self {
            Self::Km => "km",
            Self::Miles => "miles",
        }
    }
}

impl std::fmt::Display for DistanceUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl std::str::FromStr for DistanceUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "km" | "kilometers" | "kilometres" => Ok(Self::Km),
            "mi" | "mile" | "miles" => Ok(Self::Miles),
            _ => Err(format!("Unknown distance unit: {}", s)),
        }
    }
}

/// Render a distance for display, e.g. `"1153.24 km (straight-line)"`
pub fn format_distance(km: f64, unit: DistanceUnit) -> String {
    format!("{:.2} {} (straight-line)", unit.from_km(km), unit.label())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::str::FromStr;

    const DELHI: (f64, f64) = (28.6139, 77.2090);
    const MUMBAI: (f64, f64) = (19.0760, 72.8777);

    #[test]
    fn test_identical_points_are_zero() {
        for &(lat, lon) in &[(0.0, 0.0), DELHI, (-89.9, 179.9), (51.5074, -0.1278)] {
            assert_eq!(great_circle_distance_km(lat, lon, lat, lon), 0.0);
        }
    }

    #[test]
    fn test_symmetric() {
        let pairs = [
            (DELHI, MUMBAI),
            ((40.7128, -74.0060), (51.5074, -0.1278)),
            ((-33.8688, 151.2093), (35.6762, 139.6503)),
        ];
        for ((lat1, lon1), (lat2, lon2)) in pairs {
            let ab = great_circle_distance_km(lat1, lon1, lat2, lon2);
            let ba = great_circle_distance_km(lat2, lon2, lat1, lon1);
            assert_relative_eq!(ab, ba, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_delhi_mumbai_reference() {
        let km = great_circle_distance_km(DELHI.0, DELHI.1, MUMBAI.0, MUMBAI.1);
        // Known great-circle distance is roughly 1150-1165 km
        let known = 1155.0;
        assert!(
            (km - known).abs() / known < 0.01,
            "Distance {} is not within 1% of {}",
            km,
            known
        );
    }

    #[test]
    fn test_one_degree_latitude() {
        let km = great_circle_distance_km(40.7128, -74.0060, 41.7128, -74.0060);
        assert!((km - 111.19).abs() < 0.1, "Distance {} should be ~111.19", km);
    }

    #[test]
    fn test_antipodal_points() {
        let km = great_circle_distance_km(0.0, 0.0, 0.0, 180.0);
        assert_relative_eq!(km, PI * EARTH_RADIUS_KM, epsilon = 1e-6);
    }

    #[test]
    fn test_unit_conversion_roundtrip() {
        for x in [0.0, 1.0, 42.5, 1155.0, 20_015.0] {
            assert_relative_eq!(miles_to_km(km_to_miles(x)), x, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_miles_monotonic() {
        let values: Vec<f64> = (0..100).map(|i| km_to_miles(i as f64 * 12.5)).collect();
        assert!(values.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_unit_parsing() {
        assert_eq!(DistanceUnit::from_str("km").unwrap(), DistanceUnit::Km);
        assert_eq!(DistanceUnit::from_str("Miles").unwrap(), DistanceUnit::Miles);
        assert_eq!(DistanceUnit::from_str("mi").unwrap(), DistanceUnit::Miles);
        assert!(DistanceUnit::from_str("furlongs").is_err());
    }

    #[test]
    fn test_format_distance() {
        assert_eq!(format_distance(100.0, DistanceUnit::Km), "100.00 km (straight-line)");
        assert_eq!(
            format_distance(100.0, DistanceUnit::Miles),
            "62.14 miles (straight-line)"
        );
    }
}
