//! User-facing text for every way a search can end

use crate::distance::{format_distance, DistanceUnit};
use crate::error::ErrorKind;
use crate::search::{Missing, SearchOutcome};

/// Shown when either input is blank
pub const EMPTY_INPUT: &str = "Please enter both places.";

/// Shown for failures that fit no other message
pub const GENERIC_FAILURE: &str = "An error occurred while finding places. Try again later.";

pub fn not_found(missing: Missing) -> &'static str {
    match missing {
        Missing::Both => "Neither place was found. Try different keywords.",
        Missing::First => "First place not found.",
        Missing::Second => "Second place not found.",
    }
}

pub fn failure(kind: ErrorKind) -> String {
    match kind {
        ErrorKind::RateLimited => {
            "The geocoding service is busy (too many requests). Wait a moment and try again."
                .to_string()
        }
        ErrorKind::Blocked => {
            "The geocoding service refused the request. Check the configured contact address."
                .to_string()
        }
        ErrorKind::NetworkError => {
            "Could not reach the geocoding service. Check your connection and try again."
                .to_string()
        }
        ErrorKind::HttpError { status } => format!(
            "The geocoding service returned an error (HTTP {}). Try again later.",
            status
        ),
        ErrorKind::InvalidResponse => GENERIC_FAILURE.to_string(),
    }
}

/// Text describing `outcome`, with distances in `unit`
pub fn outcome_message(outcome: &SearchOutcome, unit: DistanceUnit) -> String {
    match outcome {
        SearchOutcome::Success { distance_km, .. } => format_distance(*distance_km, unit),
        SearchOutcome::NotFound { which_missing } => not_found(*which_missing).to_string(),
        SearchOutcome::Failure { kind, .. } => failure(*kind),
    }
}
