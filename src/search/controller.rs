//! Search controller
//!
//! Owns the map session and the currently displayed report. Every accepted
//! search gets a sequence token; when it settles, its result is applied only
//! if no newer search (or reset) has been issued since. Superseded searches
//! are left to finish and their results are dropped.

use crate::distance::DistanceUnit;
use crate::error::Result;
use crate::geo::GeoBackend;
use crate::map::{MapPresenter, MapSession, Marker, SessionPresenter};
use crate::search::report::SearchReport;
use crate::search::{parse_pair, SearchOrchestrator, SearchOutcome, SearchPhase};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, warn};

/// What happened to a submitted search
#[derive(Debug, Clone, PartialEq)]
pub enum Submission {
    /// The search was the latest one; its report is now displayed
    Applied(SearchReport),
    /// A newer search or a reset was issued while this one ran
    Superseded { token: u64 },
}

#[derive(Debug, Default)]
struct DisplayState {
    session: MapSession,
    current: Option<SearchReport>,
    phase: SearchPhase,
}

/// Drives searches and keeps what is on screen consistent
#[derive(Debug)]
pub struct SearchController<G, P = SessionPresenter> {
    orchestrator: SearchOrchestrator<G>,
    presenter: P,
    latest_token: AtomicU64,
    in_flight: AtomicUsize,
    state: Mutex<DisplayState>,
}

/// Decrements the in-flight counter when a search ends, however it ends
struct InFlight<'a>(&'a AtomicUsize);

impl<'a> InFlight<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl<G: GeoBackend> SearchController<G, SessionPresenter> {
    pub fn new(orchestrator: SearchOrchestrator<G>) -> Self {
        Self::with_presenter(orchestrator, SessionPresenter)
    }
}

impl<G: GeoBackend, P: MapPresenter> SearchController<G, P> {
    pub fn with_presenter(orchestrator: SearchOrchestrator<G>, presenter: P) -> Self {
        Self {
            orchestrator,
            presenter,
            latest_token: AtomicU64::new(0),
            in_flight: AtomicUsize::new(0),
            state: Mutex::new(DisplayState::default()),
        }
    }

    fn state(&self) -> MutexGuard<'_, DisplayState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Run a search and display its result unless it has been superseded
    ///
    /// Blank input is rejected before a token is issued and leaves the
    /// display untouched.
    pub async fn submit(&self, from: &str, to: &str, unit: DistanceUnit) -> Result<Submission> {
        let (from, to) = match parse_pair(from, to) {
            Ok(pair) => pair,
            Err(err) => {
                self.state().phase = SearchPhase::RejectedInput;
                return Err(err);
            }
        };

        let token = self.latest_token.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(token, from = %from, to = %to, "Search issued");

        let outcome = {
            let _guard = InFlight::enter(&self.in_flight);
            self.state().phase = SearchPhase::AwaitingBothGeocodes;
            self.orchestrator.search_queries(&from, &to).await
        };

        let mut state = self.state();
        let latest = self.latest_token.load(Ordering::SeqCst);
        if token != latest {
            warn!(token, latest, "Discarding result of superseded search");
            return Ok(Submission::Superseded { token });
        }

        if let SearchOutcome::Success { a, b, .. } = &outcome {
            self.presenter.plot(
                &mut state.session,
                Marker::for_place(from.as_str(), a),
                Marker::for_place(to.as_str(), b),
            );
        }

        state.phase = outcome.phase();
        let report = SearchReport::new(from, to, unit, outcome, state.session.clone());
        state.current = Some(report.clone());

        Ok(Submission::Applied(report))
    }

    /// Clear the map and displayed result; searches still running are superseded
    pub fn reset(&self) {
        let mut state = self.state();
        self.latest_token.fetch_add(1, Ordering::SeqCst);
        self.presenter.clear(&mut state.session);
        state.current = None;
        state.phase = SearchPhase::Idle;
        debug!("Search display reset");
    }

    /// Whether any search is still running
    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }

    /// Report currently on display
    pub fn current(&self) -> Option<SearchReport> {
        self.state().current.clone()
    }

    /// Snapshot of the map session
    pub fn session(&self) -> MapSession {
        self.state().session.clone()
    }

    /// Phase of the most recently applied or started search
    pub fn phase(&self) -> SearchPhase {
        self.state().phase
    }

    pub fn orchestrator(&self) -> &SearchOrchestrator<G> {
        &self.orchestrator
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, ErrorKind};
    use crate::search::tests::StubGeocoder;
    use crate::search::Missing;
    use std::sync::Arc;
    use std::time::Duration;

    fn controller(geocoder: StubGeocoder) -> Arc<SearchController<StubGeocoder>> {
        Arc::new(SearchController::new(SearchOrchestrator::new(geocoder, None)))
    }

    fn applied(submission: Submission) -> SearchReport {
        match submission {
            Submission::Applied(report) => report,
            other => panic!("expected applied search, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_success_plots_map() {
        let controller = controller(
            StubGeocoder::default()
                .found("Delhi", 28.6139, 77.2090)
                .found("Mumbai", 19.0760, 72.8777),
        );

        let report = applied(controller.submit("Delhi", "Mumbai", DistanceUnit::Km).await.unwrap());

        assert!(report.outcome.is_success());
        assert_eq!(report.map.markers.len(), 2);
        assert_eq!(report.map.markers[0].label, "Delhi");
        assert_eq!(controller.session(), report.map);
        assert_eq!(controller.current(), Some(report));
        assert_eq!(controller.phase(), SearchPhase::Succeeded);
        assert!(!controller.is_busy());
    }

    #[tokio::test]
    async fn test_not_found_keeps_previous_map() {
        let controller = controller(
            StubGeocoder::default()
                .found("A", 1.0, 1.0)
                .found("B", 2.0, 2.0)
                .missing("C"),
        );

        applied(controller.submit("A", "B", DistanceUnit::Km).await.unwrap());
        let before = controller.session();

        let report = applied(controller.submit("C", "B", DistanceUnit::Km).await.unwrap());

        assert_eq!(
            report.outcome,
            SearchOutcome::NotFound {
                which_missing: Missing::First
            }
        );
        assert_eq!(controller.session(), before);
        assert_eq!(controller.phase(), SearchPhase::NotFound);
    }

    #[tokio::test]
    async fn test_failure_is_displayed() {
        let controller = controller(
            StubGeocoder::default()
                .failing("A", ErrorKind::Blocked)
                .found("B", 2.0, 2.0),
        );

        let report = applied(controller.submit("A", "B", DistanceUnit::Km).await.unwrap());

        assert!(matches!(
            report.outcome,
            SearchOutcome::Failure {
                kind: ErrorKind::Blocked,
                ..
            }
        ));
        assert_eq!(controller.phase(), SearchPhase::Failed);
    }

    #[tokio::test]
    async fn test_blank_input_rejected() {
        let geocoder = StubGeocoder::default();
        let controller = controller(geocoder.clone());

        let err = controller.submit(" ", "B", DistanceUnit::Km).await.unwrap_err();

        assert!(matches!(err, Error::InvalidInput(_)));
        assert_eq!(geocoder.call_count(), 0);
        assert_eq!(controller.phase(), SearchPhase::RejectedInput);
        assert!(controller.current().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_result_discarded() {
        let controller = controller(
            StubGeocoder::default()
                .found("Slow", 10.0, 10.0)
                .found("Fast", 20.0, 20.0)
                .found("B", 0.0, 0.0)
                .delayed("Slow", Duration::from_secs(3)),
        );

        let slow = tokio::spawn({
            let controller = controller.clone();
            async move { controller.submit("Slow", "B", DistanceUnit::Km).await }
        });
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(controller.is_busy());

        let fast = applied(controller.submit("Fast", "B", DistanceUnit::Km).await.unwrap());
        let slow = slow.await.unwrap().unwrap();

        assert_eq!(slow, Submission::Superseded { token: 1 });
        assert_eq!(controller.current(), Some(fast.clone()));
        assert_eq!(controller.session().markers[0].label, "Fast");
        assert!(!controller.is_busy());
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_supersedes_running_search() {
        let controller = controller(
            StubGeocoder::default()
                .found("A", 1.0, 1.0)
                .found("B", 2.0, 2.0)
                .delayed("A", Duration::from_secs(1)),
        );

        let running = tokio::spawn({
            let controller = controller.clone();
            async move { controller.submit("A", "B", DistanceUnit::Km).await }
        });
        tokio::time::sleep(Duration::from_millis(10)).await;
        controller.reset();

        let result = running.await.unwrap().unwrap();

        assert!(matches!(result, Submission::Superseded { .. }));
        assert!(controller.session().is_empty());
        assert!(controller.current().is_none());
        assert_eq!(controller.phase(), SearchPhase::Idle);
    }

    #[tokio::test]
    async fn test_reset_clears_display() {
        let controller = controller(StubGeocoder::default().found("A", 1.0, 1.0).found("B", 2.0, 2.0));

        applied(controller.submit("A", "B", DistanceUnit::Miles).await.unwrap());
        controller.reset();

        assert!(controller.current().is_none());
        assert_eq!(controller.session(), MapSession::default());
    }
}
