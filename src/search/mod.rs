//! Two-place search
//!
//! Resolves both places concurrently and classifies the result into exactly
//! one terminal `SearchOutcome`.
//!
//! Per invocation the search moves through
//! `Validating -> (RejectedInput | Validated)` and
//! `Validated -> AwaitingBothGeocodes -> (Succeeded | NotFound | Failed)`.

pub mod controller;
pub mod debounce;
pub mod messages;
pub mod report;

use crate::distance::great_circle_distance_km;
use crate::error::{Error, ErrorKind, GeocodeError, Result};
use crate::geo::{GeoBackend, GeoResult, RegionHint};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A non-empty, trimmed place name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PlaceQuery(String);

impl PlaceQuery {
    /// Trim `raw` and reject it if nothing is left
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(Error::InvalidInput("place name must not be empty".to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for PlaceQuery {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<PlaceQuery> for String {
    fn from(query: PlaceQuery) -> Self {
        query.0
    }
}

impl std::fmt::Display for PlaceQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Validate both inputs of a search
pub fn parse_pair(a: &str, b: &str) -> Result<(PlaceQuery, PlaceQuery)> {
    Ok((PlaceQuery::parse(a)?, PlaceQuery::parse(b)?))
}

/// Which of the two places the provider had no match for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Missing {
    First,
    Second,
    Both,
}

impl std::fmt::Display for Missing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::First => write!(f, "first"),
            Self::Second => write!(f, "second"),
            Self::Both => write!(f, "both"),
        }
    }
}

/// Terminal result of one search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SearchOutcome {
    /// Both places resolved
    Success {
        a: GeoResult,
        b: GeoResult,
        distance_km: f64,
    },
    /// The provider was reached but matched nothing for one or both places
    NotFound { which_missing: Missing },
    /// A geocode call failed
    Failure { kind: ErrorKind, message: String },
}

impl SearchOutcome {
    /// Build a success, computing the distance from the two places
    pub fn success(a: GeoResult, b: GeoResult) -> Self {
        let distance_km = great_circle_distance_km(a.lat, a.lng, b.lat, b.lng);
        Self::Success { a, b, distance_km }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn distance_km(&self) -> Option<f64> {
        match self {
            Self::Success { distance_km, .. } => Some(*distance_km),
            _ => None,
        }
    }

    /// Phase this outcome terminates in
    pub fn phase(&self) -> SearchPhase {
        match self {
            Self::Success { .. } => SearchPhase::Succeeded,
            Self::NotFound { .. } => SearchPhase::NotFound,
            Self::Failure { .. } => SearchPhase::Failed,
        }
    }
}

impl From<GeocodeError> for SearchOutcome {
    fn from(err: GeocodeError) -> Self {
        Self::Failure {
            kind: err.kind,
            message: err.message,
        }
    }
}

/// Lifecycle of a single search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchPhase {
    #[default]
    Idle,
    Validating,
    RejectedInput,
    Validated,
    AwaitingBothGeocodes,
    Succeeded,
    NotFound,
    Failed,
}

impl SearchPhase {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::RejectedInput | Self::Succeeded | Self::NotFound | Self::Failed
        )
    }
}

/// Runs two-place searches against a geocoder
///
/// Holds no per-search state; every call starts from scratch.
#[derive(Debug, Clone)]
pub struct SearchOrchestrator<G> {
    geocoder: G,
    region: Option<RegionHint>,
}

impl<G: GeoBackend> SearchOrchestrator<G> {
    /// Create an orchestrator; `region` is passed to every geocode call
    pub fn new(geocoder: G, region: Option<RegionHint>) -> Self {
        Self { geocoder, region }
    }

    pub fn region(&self) -> Option<&RegionHint> {
        self.region.as_ref()
    }

    pub fn geocoder(&self) -> &G {
        &self.geocoder
    }

    /// Validate both inputs, then search
    ///
    /// Empty input is rejected with `Error::InvalidInput` before any request
    /// is made; every other end state is a `SearchOutcome`.
    pub async fn search(&self, a: &str, b: &str) -> Result<SearchOutcome> {
        debug!(phase = ?SearchPhase::Validating, "Search started");
        let (a, b) = match parse_pair(a, b) {
            Ok(pair) => pair,
            Err(err) => {
                debug!(phase = ?SearchPhase::RejectedInput, error = %err, "Search input rejected");
                return Err(err);
            }
        };
        debug!(phase = ?SearchPhase::Validated, first = %a, second = %b);

        Ok(self.search_queries(&a, &b).await)
    }

    /// Search two already-validated queries
    ///
    /// Both lookups run concurrently and both are awaited before the outcome
    /// is decided. When both fail, the first query's error is reported.
    pub async fn search_queries(&self, a: &PlaceQuery, b: &PlaceQuery) -> SearchOutcome {
        debug!(phase = ?SearchPhase::AwaitingBothGeocodes);

        let region = self.region.as_ref();
        let (first, second) = tokio::join!(
            self.geocoder.geocode(a.as_str(), region),
            self.geocoder.geocode(b.as_str(), region),
        );

        let outcome = Self::classify(first, second);
        debug!(phase = ?outcome.phase(), "Search settled");
        outcome
    }

    fn classify(
        first: std::result::Result<Option<GeoResult>, GeocodeError>,
        second: std::result::Result<Option<GeoResult>, GeocodeError>,
    ) -> SearchOutcome {
        match (first, second) {
            (Err(err), _) | (Ok(_), Err(err)) => err.into(),
            (Ok(Some(a)), Ok(Some(b))) => SearchOutcome::success(a, b),
            (Ok(None), Ok(None)) => SearchOutcome::NotFound {
                which_missing: Missing::Both,
            },
            (Ok(None), Ok(Some(_))) => SearchOutcome::NotFound {
                which_missing: Missing::First,
            },
            (Ok(Some(_)), Ok(None)) => SearchOutcome::NotFound {
                which_missing: Missing::Second,
            },
        }
    }
}
