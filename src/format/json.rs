//! JSON output formatter

use crate::config::Config;
use crate::error::Result;
use crate::format::OutputFormatter;
use crate::search::report::SearchReport;

/// JSON formatter - outputs the full report as pretty-printed JSON
pub struct JsonFormatter;

impl OutputFormatter for JsonFormatter {
    fn name(&self) -> &str {
        "json"
    }

    fn description(&self) -> &str {
        "Full JSON report"
    }

    fn format(&self, report: &SearchReport, _config: &Config) -> Result<String> {
        Ok(serde_json::to_string_pretty(report)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::DistanceUnit;
    use crate::format::tests::{not_found_report, success_report};

    #[test]
    fn test_json_format() {
        let report = success_report(DistanceUnit::Km);
        let output = JsonFormatter.format(&report, &Config::default()).unwrap();

        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["id"], report.id.as_str());
        assert_eq!(parsed["status"], "success");
        assert_eq!(parsed["a"]["display_name"], "Delhi, India");
        assert_eq!(parsed["map"]["markers"].as_array().unwrap().len(), 2);
        assert_eq!(parsed["map"]["viewport"]["type"], "fit");
    }

    #[test]
    fn test_json_not_found() {
        let output = JsonFormatter
            .format(&not_found_report(), &Config::default())
            .unwrap();

        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["status"], "not_found");
        assert_eq!(parsed["message"], "First place not found.");
    }

    #[test]
    fn test_json_formatter_info() {
        assert_eq!(JsonFormatter.name(), "json");
        assert!(!JsonFormatter.description().is_empty());
    }
}
