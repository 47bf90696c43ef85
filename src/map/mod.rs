//! Map model
//!
//! A `MapSession` is the state of one map view: two markers, the line
//! joining them, and the viewport. Presenters mutate a session that the
//! caller owns; renderers in `format` turn it into GeoJSON, GPX or links.

use crate::constants::map::{DEFAULT_CENTER, DEFAULT_ZOOM, FIT_PADDING};
use crate::geo::GeoResult;
use serde::{Deserialize, Serialize};

/// A labelled map marker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub lat: f64,
    pub lng: f64,
    /// Short label, normally the text the user typed
    pub label: String,
    /// Longer popup text, normally the provider's display name
    pub popup: String,
}

impl Marker {
    /// Marker for a resolved place, labelled with the query that found it
    pub fn for_place(query: &str, place: &GeoResult) -> Self {
        Self {
            lat: place.lat,
            lng: place.lng,
            label: query.to_string(),
            popup: place.display_name.clone(),
        }
    }
}

/// Geographic bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl Bounds {
    /// Smallest box containing both points
    pub fn around(a: (f64, f64), b: (f64, f64)) -> Self {
        Self {
            south: a.0.min(b.0),
            west: a.1.min(b.1),
            north: a.0.max(b.0),
            east: a.1.max(b.1),
        }
    }

    /// Grow each side by `ratio` of the box's span, clamped to valid ranges
    pub fn pad(&self, ratio: f64) -> Self {
        let lat_pad = (self.north - self.south) * ratio;
        let lng_pad = (self.east - self.west) * ratio;
        Self {
            south: (self.south - lat_pad).max(-90.0),
            west: (self.west - lng_pad).max(-180.0),
            north: (self.north + lat_pad).min(90.0),
            east: (self.east + lng_pad).min(180.0),
        }
    }

    pub fn center(&self) -> (f64, f64) {
        ((self.south + self.north) / 2.0, (self.west + self.east) / 2.0)
    }
}

/// Current map viewport
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Viewport {
    /// Fixed center and zoom
    Center { lat: f64, lng: f64, zoom: u8 },
    /// Fitted to a bounding box
    Fit { bounds: Bounds },
}

impl Default for Viewport {
    fn default() -> Self {
        Self::Center {
            lat: DEFAULT_CENTER.0,
            lng: DEFAULT_CENTER.1,
            zoom: DEFAULT_ZOOM,
        }
    }
}

/// State of one map view, owned by whoever drives the UI
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MapSession {
    pub markers: Vec<Marker>,
    /// Straight line between the two markers
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<[(f64, f64); 2]>,
    pub viewport: Viewport,
}

impl MapSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty() && self.line.is_none()
    }
}

/// Draws two resolved places on a map
pub trait MapPresenter: Send + Sync {
    /// Show both markers, fit the viewport to them and join them with a line
    fn plot(&self, session: &mut MapSession, a: Marker, b: Marker);

    /// Remove markers and line, restoring the default view
    fn clear(&self, session: &mut MapSession);
}

/// Presenter that keeps everything in the session itself
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionPresenter;

impl MapPresenter for SessionPresenter {
    fn plot(&self, session: &mut MapSession, a: Marker, b: Marker) {
        let bounds = Bounds::around((a.lat, a.lng), (b.lat, b.lng)).pad(FIT_PADDING);

        session.line = Some([(a.lat, a.lng), (b.lat, b.lng)]);
        session.markers = vec![a, b];
        session.viewport = Viewport::Fit { bounds };
    }

    fn clear(&self, session: &mut MapSession) {
        *session = MapSession::default();
    }
}
