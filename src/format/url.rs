//! URL output formatter

use crate::config::Config;
use crate::error::{Error, Result};
use crate::format::OutputFormatter;
use crate::search::report::SearchReport;
use crate::search::SearchOutcome;

/// URL formatter - outputs a directions link between the two places
#[derive(Debug, Clone, Default)]
pub struct UrlFormatter {
    /// Provider name; the configured default when unset
    pub provider: Option<String>,
}

impl UrlFormatter {
    pub fn with_provider(provider: impl Into<String>) -> Self {
        Self {
            provider: Some(provider.into()),
        }
    }
}

impl OutputFormatter for UrlFormatter {
    fn name(&self) -> &str {
        "url"
    }

    fn description(&self) -> &str {
        "Map link between both places"
    }

    fn format(&self, report: &SearchReport, config: &Config) -> Result<String> {
        match &report.outcome {
            SearchOutcome::Success { a, b, .. } => config.format_url(self.provider.as_deref(), a, b),
            _ => Err(Error::NoMapLink(report.message.clone())),
        }
    }
}
