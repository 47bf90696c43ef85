//! A settled search, ready to be rendered

use crate::distance::DistanceUnit;
use crate::map::{MapPresenter, MapSession, Marker, SessionPresenter};
use crate::search::messages::outcome_message;
use crate::search::{PlaceQuery, SearchOutcome};
use serde::{Deserialize, Serialize};

/// Everything a front end needs to show one finished search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchReport {
    /// Unique ID for this search
    pub id: String,
    /// When the search settled (RFC 3339)
    pub timestamp: String,
    pub from: PlaceQuery,
    pub to: PlaceQuery,
    pub unit: DistanceUnit,
    #[serde(flatten)]
    pub outcome: SearchOutcome,
    /// Display text for the outcome
    pub message: String,
    /// Map state after the outcome was applied
    pub map: MapSession,
}

impl SearchReport {
    pub fn new(
        from: PlaceQuery,
        to: PlaceQuery,
        unit: DistanceUnit,
        outcome: SearchOutcome,
        map: MapSession,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            message: outcome_message(&outcome, unit),
            from,
            to,
            unit,
            outcome,
            map,
        }
    }

    /// Report for a search with no surrounding display, plotted on a fresh map
    pub fn standalone(
        from: PlaceQuery,
        to: PlaceQuery,
        unit: DistanceUnit,
        outcome: SearchOutcome,
    ) -> Self {
        let mut map = MapSession::new();
        if let SearchOutcome::Success { a, b, .. } = &outcome {
            SessionPresenter.plot(
                &mut map,
                Marker::for_place(from.as_str(), a),
                Marker::for_place(to.as_str(), b),
            );
        }
        Self::new(from, to, unit, outcome, map)
    }

    /// Distance expressed in the report's unit, if the search succeeded
    pub fn distance(&self) -> Option<f64> {
        self.outcome.distance_km().map(|km| self.unit.from_km(km))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::Missing;

    fn report(outcome: SearchOutcome) -> SearchReport {
        SearchReport::new(
            PlaceQuery::parse("Agra").unwrap(),
            PlaceQuery::parse("Jaipur").unwrap(),
            DistanceUnit::Miles,
            outcome,
            MapSession::new(),
        )
    }

    #[test]
    fn test_report_message_and_ids() {
        let a = report(SearchOutcome::NotFound {
            which_missing: Missing::Both,
        });
        let b = report(SearchOutcome::NotFound {
            which_missing: Missing::Both,
        });

        assert_ne!(a.id, b.id);
        assert_eq!(a.message, "Neither place was found. Try different keywords.");
        assert!(a.distance().is_none());
    }

    #[test]
    fn test_standalone_plots_success() {
        let place = |lat| crate::geo::GeoResult {
            lat,
            lng: 75.0,
            display_name: format!("{}", lat),
        };
        let report = SearchReport::standalone(
            PlaceQuery::parse("Agra").unwrap(),
            PlaceQuery::parse("Jaipur").unwrap(),
            DistanceUnit::Km,
            SearchOutcome::success(place(27.0), place(26.0)),
        );

        assert_eq!(report.map.markers.len(), 2);
        assert_eq!(report.map.markers[1].label, "Jaipur");
        assert!(report.map.line.is_some());
        approx::assert_relative_eq!(report.distance().unwrap(), 111.19, epsilon = 0.01);
    }

    #[test]
    fn test_report_flattens_outcome() {
        let report = report(SearchOutcome::NotFound {
            which_missing: Missing::First,
        });
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["status"], "not_found");
        assert_eq!(json["which_missing"], "first");
        assert_eq!(json["from"], "Agra");
        assert_eq!(json["unit"], "miles");
        assert!(json["map"]["markers"].as_array().unwrap().is_empty());
    }
}
