//! GPX output formatter

use crate::config::Config;
use crate::error::Result;
use crate::format::OutputFormatter;
use crate::search::report::SearchReport;

/// GPX formatter - outputs both places as waypoints plus a two-point route
pub struct GpxFormatter;

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

impl OutputFormatter for GpxFormatter {
    fn name(&self) -> &str {
        "gpx"
    }

    fn description(&self) -> &str {
        "GPX waypoints and route"
    }

    fn format(&self, report: &SearchReport, _config: &Config) -> Result<String> {
        let mut gpx = String::new();

        gpx.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
        gpx.push('\n');
        gpx.push_str(r#"<gpx version="1.1" creator="place-distance">"#);
        gpx.push('\n');

        gpx.push_str("  <metadata>\n");
        gpx.push_str(&format!(
            "    <name>{} to {}</name>\n",
            escape(report.from.as_str()),
            escape(report.to.as_str())
        ));
        gpx.push_str(&format!("    <desc>{}</desc>\n", escape(&report.message)));
        gpx.push_str(&format!("    <time>{}</time>\n", report.timestamp));
        gpx.push_str("  </metadata>\n");

        for marker in &report.map.markers {
            gpx.push_str(&format!(r#"  <wpt lat="{}" lon="{}">"#, marker.lat, marker.lng));
            gpx.push('\n');
            gpx.push_str(&format!("    <name>{}</name>\n", escape(&marker.label)));
            gpx.push_str(&format!("    <desc>{}</desc>\n", escape(&marker.popup)));
            gpx.push_str("  </wpt>\n");
        }

        if let Some(line) = report.map.line {
            gpx.push_str("  <rte>\n");
            gpx.push_str("    <name>Straight line</name>\n");
            for (lat, lng) in line {
                gpx.push_str(&format!(r#"    <rtept lat="{}" lon="{}"/>"#, lat, lng));
                gpx.push('\n');
            }
            gpx.push_str("  </rte>\n");
        }

        gpx.push_str("</gpx>\n");
        Ok(gpx)
    }
}
