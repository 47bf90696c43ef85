//! GeoJSON output formatter

use crate::config::Config;
use crate::error::Result;
use crate::format::OutputFormatter;
use crate::search::report::SearchReport;
use serde_json::{json, Value};

/// GeoJSON formatter - markers as Points, the connecting line as a LineString
pub struct GeoJsonFormatter;

impl GeoJsonFormatter {
    /// Build the FeatureCollection for a report's map session
    pub fn feature_collection(report: &SearchReport) -> Value {
        let mut features: Vec<Value> = report
            .map
            .markers
            .iter()
            .map(|marker| {
                json!({
                    "type": "Feature",
                    "geometry": {
                        "type": "Point",
                        "coordinates": [marker.lng, marker.lat],
                    },
                    "properties": {
                        "label": marker.label,
                        "name": marker.popup,
                    },
                })
            })
            .collect();

        if let Some([start, end]) = report.map.line {
            let mut properties = json!({ "kind": "straight-line" });
            if let Some(km) = report.outcome.distance_km() {
                properties["distance_km"] = json!(km);
                properties["distance"] = json!(report.message);
            }
            features.push(json!({
                "type": "Feature",
                "geometry": {
                    "type": "LineString",
                    "coordinates": [[start.1, start.0], [end.1, end.0]],
                },
                "properties": properties,
            }));
        }

        json!({
            "type": "FeatureCollection",
            "features": features,
        })
    }
}

impl OutputFormatter for GeoJsonFormatter {
    fn name(&self) -> &str {
        "geojson"
    }

    fn description(&self) -> &str {
        "GeoJSON FeatureCollection of both places and the line between them"
    }

    fn format(&self, report: &SearchReport, _config: &Config) -> Result<String> {
        Ok(serde_json::to_string_pretty(&Self::feature_collection(report))?)
    }
}
