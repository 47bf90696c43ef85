//! Human-readable text output formatter

use crate::config::Config;
use crate::error::Result;
use crate::format::OutputFormatter;
use crate::search::report::SearchReport;
use crate::search::SearchOutcome;

/// Text formatter - outputs a short human-readable summary
pub struct TextFormatter;

impl OutputFormatter for TextFormatter {
    fn name(&self) -> &str {
        "text"
    }

    fn description(&self) -> &str {
        "Human-readable text"
    }

    fn format(&self, report: &SearchReport, _config: &Config) -> Result<String> {
        let mut output = String::new();

        match &report.outcome {
            SearchOutcome::Success { a, b, .. } => {
                output.push_str(&format!(
                    "From: {} ({:.4}, {:.4})\n",
                    a.display_name, a.lat, a.lng
                ));
                output.push_str(&format!(
                    "To:   {} ({:.4}, {:.4})\n",
                    b.display_name, b.lat, b.lng
                ));
                output.push_str(&format!("Distance: {}\n", report.message));
            }
            SearchOutcome::NotFound { .. } | SearchOutcome::Failure { .. } => {
                output.push_str(&report.message);
                output.push('\n');
            }
        }

        Ok(output)
    }
}
