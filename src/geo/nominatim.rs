//! Nominatim geocoding backend (OpenStreetMap)
//!
//! Each lookup tries a region-scoped query first and falls back to the plain
//! query when the scoped one matches nothing. Every request asks for a single
//! result with address details and carries the configured contact address.

use crate::config::Config;
use crate::error::{ErrorKind, GeocodeError};
use crate::geo::retry::RetryPolicy;
use crate::geo::transport::Transport;
use crate::geo::{GeoBackend, GeoResult, RegionHint};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

/// Nominatim geocoding client
#[derive(Debug, Clone)]
pub struct NominatimClient<T> {
    transport: T,
    search_url: String,
    contact_email: String,
    policy: RetryPolicy,
    call_timeout: Duration,
}

/// Nominatim search response item
#[derive(Debug, Deserialize)]
struct NominatimResult {
    lat: String,
    lon: String,
    display_name: String,
}

/// One way of asking the provider about a place
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupStrategy {
    /// Free-text query sent to the provider
    pub text: String,
    /// Country restriction, if any
    pub country_code: Option<String>,
}

impl LookupStrategy {
    /// Ordered strategies for a query: region-scoped first, then plain
    pub fn for_query(query: &str, region: Option<&RegionHint>) -> Vec<Self> {
        let plain = Self {
            text: query.to_string(),
            country_code: None,
        };

        match region {
            Some(region) => vec![
                Self {
                    text: format!("{}, {}", query, region.name),
                    country_code: Some(region.country_code.clone()),
                },
                plain,
            ],
            None => vec![plain],
        }
    }

    fn params(&self, contact_email: &str) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("format", "json".to_string()),
            ("limit", "1".to_string()),
            ("addressdetails", "1".to_string()),
            ("q", self.text.clone()),
        ];
        if let Some(code) = &self.country_code {
            params.push(("countrycodes", code.clone()));
        }
        params.push(("email", contact_email.to_string()));
        params
    }
}

impl<T: Transport> NominatimClient<T> {
    /// Create a new Nominatim client from config
    ///
    /// Logs a warning when the contact address is still the placeholder;
    /// requests are sent regardless.
    pub fn new(transport: T, config: &Config) -> Self {
        if config.geocoder.contact_is_placeholder() {
            warn!(
                contact = %config.geocoder.contact_email,
                "Geocoder contact address is not configured; set geocoder.contact_email \
                 to comply with the Nominatim usage policy"
            );
        }

        Self {
            transport,
            search_url: format!("{}/search", config.geocoder.base_url.trim_end_matches('/')),
            contact_email: config.geocoder.contact_email.clone(),
            policy: RetryPolicy::from(&config.retry),
            call_timeout: config.geocoder.call_timeout(),
        }
    }

    /// Retry policy used for each strategy
    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Parse lat/lng strings to f64
    fn parse_coords(lat: &str, lng: &str) -> Result<(f64, f64), GeocodeError> {
        let invalid = |what: &str, value: &str| {
            GeocodeError::new(ErrorKind::InvalidResponse, format!("Invalid {}: {}", what, value))
        };
        let lat: f64 = lat.trim().parse().map_err(|_| invalid("latitude", lat))?;
        let lng: f64 = lng.trim().parse().map_err(|_| invalid("longitude", lng))?;
        Ok((lat, lng))
    }

    /// Map the first entry of a search response, if any
    fn first_result(body: serde_json::Value) -> Result<Option<GeoResult>, GeocodeError> {
        let results: Vec<NominatimResult> = serde_json::from_value(body).map_err(|e| {
            GeocodeError::new(
                ErrorKind::InvalidResponse,
                format!("Failed to parse Nominatim response: {}", e),
            )
        })?;

        match results.into_iter().next() {
            Some(result) => {
                let (lat, lng) = Self::parse_coords(&result.lat, &result.lon)?;
                Ok(Some(GeoResult {
                    lat,
                    lng,
                    display_name: result.display_name,
                }))
            }
            None => Ok(None),
        }
    }

    /// Run one strategy under the retry policy
    async fn lookup(&self, strategy: &LookupStrategy) -> Result<Option<GeoResult>, GeocodeError> {
        let params = strategy.params(&self.contact_email);
        let url = self.search_url.as_str();
        let params = params.as_slice();
        let transport = &self.transport;

        let body = self
            .policy
            .run(move || async move {
                transport
                    .get_json(url, params)
                    .await
                    .map_err(GeocodeError::from)
            })
            .await?;

        Self::first_result(body)
    }

    async fn try_strategies(
        &self,
        query: &str,
        region: Option<&RegionHint>,
    ) -> Result<Option<GeoResult>, GeocodeError> {
        for strategy in LookupStrategy::for_query(query, region) {
            debug!(
                query = %strategy.text,
                country = strategy.country_code.as_deref().unwrap_or("any"),
                "Geocoding lookup"
            );

            if let Some(result) = self.lookup(&strategy).await? {
                debug!(query = %strategy.text, found = %result.display_name, "Geocoding match");
                return Ok(Some(result));
            }
        }

        debug!(query, "No geocoding match");
        Ok(None)
    }
}

impl<T: Transport> GeoBackend for NominatimClient<T> {
    async fn geocode(
        &self,
        query: &str,
        region: Option<&RegionHint>,
    ) -> Result<Option<GeoResult>, GeocodeError> {
        match tokio::time::timeout(self.call_timeout, self.try_strategies(query, region)).await {
            Ok(result) => result,
            Err(_) => Err(GeocodeError::new(
                ErrorKind::NetworkError,
                format!(
                    "Geocoding '{}' did not finish within {}s",
                    query,
                    self.call_timeout.as_secs()
                ),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::transport::TransportError;
    use serde_json::{json, Value};
    use std::collections::{HashMap, VecDeque};
    use std::sync::Mutex;
    use tokio::time::Instant;

    /// Transport that replays scripted responses and records every call
    #[derive(Default)]
    struct ScriptedTransport {
        responses: Mutex<VecDeque<Result<Value, TransportError>>>,
        fallback: Option<Result<Value, TransportError>>,
        hang: bool,
        calls: Mutex<Vec<(Instant, HashMap<String, String>)>>,
    }

    impl ScriptedTransport {
        fn new(responses: Vec<Result<Value, TransportError>>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                ..Default::default()
            }
        }

        fn always(response: Result<Value, TransportError>) -> Self {
            Self {
                fallback: Some(response),
                ..Default::default()
            }
        }

        fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }

        fn params(&self, call: usize) -> HashMap<String, String> {
            self.calls.lock().unwrap()[call].1.clone()
        }

        fn call_times(&self) -> Vec<Instant> {
            self.calls.lock().unwrap().iter().map(|(t, _)| *t).collect()
        }
    }

    impl Transport for ScriptedTransport {
        async fn get_json(
            &self,
            _url: &str,
            query: &[(&str, String)],
        ) -> Result<Value, TransportError> {
            let params = query
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect();
            self.calls.lock().unwrap().push((Instant::now(), params));

            if self.hang {
                std::future::pending::<()>().await;
            }

            let next = self.responses.lock().unwrap().pop_front();
            next.or_else(|| self.fallback.clone())
                .unwrap_or_else(|| Ok(json!([])))
        }
    }

    fn hit(name: &str) -> Result<Value, TransportError> {
        Ok(json!([{ "lat": "18.5204", "lon": "73.8567", "display_name": name }]))
    }

    fn empty() -> Result<Value, TransportError> {
        Ok(json!([]))
    }

    fn client(transport: ScriptedTransport) -> NominatimClient<ScriptedTransport> {
        NominatimClient::new(transport, &Config::default())
    }

    fn india() -> RegionHint {
        RegionHint::new("India", "in")
    }

    /// Shared buffer the test subscriber writes formatted events into
    #[derive(Clone, Default)]
    struct LogBuffer(std::sync::Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    /// Warnings logged while `build` runs
    fn warnings_during(build: impl FnOnce()) -> String {
        let buffer = LogBuffer::default();
        let writer = buffer.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::WARN)
            .finish();

        tracing::subscriber::with_default(subscriber, build);

        let bytes = buffer.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn test_placeholder_contact_warns() {
        let logs = warnings_during(|| {
            client(ScriptedTransport::default());
        });

        assert!(logs.contains("WARN"), "{}", logs);
        assert!(logs.contains("geocoder.contact_email"), "{}", logs);
        assert!(logs.contains("your-email@example.com"), "{}", logs);
    }

    #[test]
    fn test_configured_contact_is_quiet() {
        let mut config = Config::default();
        config.geocoder.contact_email = "maps@example.org".to_string();

        let logs = warnings_during(|| {
            NominatimClient::new(ScriptedTransport::default(), &config);
        });

        assert!(logs.is_empty(), "{}", logs);
    }

    #[tokio::test]
    async fn test_blank_input_sends_no_requests() {
        let orchestrator =
            crate::search::SearchOrchestrator::new(client(ScriptedTransport::always(hit("X"))), Some(india()));

        for (a, b) in [("", "Pune"), ("Pune", "   "), (" \t", "")] {
            let result = orchestrator.search(a, b).await;
            assert!(matches!(result, Err(crate::error::Error::InvalidInput(_))));
        }
        assert_eq!(orchestrator.geocoder().transport.call_count(), 0);

        let outcome = orchestrator.search("Pune", "Pune").await.unwrap();
        assert!(outcome.is_success());
        assert_eq!(orchestrator.geocoder().transport.call_count(), 2);
    }

    #[test]
    fn test_strategies_order() {
        let strategies = LookupStrategy::for_query("Pune", Some(&india()));
        assert_eq!(strategies.len(), 2);
        assert_eq!(strategies[0].text, "Pune, India");
        assert_eq!(strategies[0].country_code.as_deref(), Some("in"));
        assert_eq!(strategies[1].text, "Pune");
        assert!(strategies[1].country_code.is_none());

        let strategies = LookupStrategy::for_query("Pune", None);
        assert_eq!(strategies.len(), 1);
    }

    #[test]
    fn test_parse_coords() {
        let (lat, lng) =
            NominatimClient::<ScriptedTransport>::parse_coords("40.7128", "-74.0060").unwrap();
        assert!((lat - 40.7128).abs() < 0.0001);
        assert!((lng - (-74.0060)).abs() < 0.0001);
    }

    #[test]
    fn test_parse_coords_invalid() {
        let err = NominatimClient::<ScriptedTransport>::parse_coords("north", "0").unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidResponse);
        assert!(NominatimClient::<ScriptedTransport>::parse_coords("0", "east").is_err());
    }

    #[tokio::test]
    async fn test_region_match_short_circuits() {
        let client = client(ScriptedTransport::new(vec![hit("Pune, Maharashtra, India")]));

        let result = client.geocode("Pune", Some(&india())).await.unwrap().unwrap();

        assert_eq!(result.display_name, "Pune, Maharashtra, India");
        assert!((result.lat - 18.5204).abs() < 1e-9);
        assert_eq!(client.transport.call_count(), 1);

        let params = client.transport.params(0);
        assert_eq!(params["q"], "Pune, India");
        assert_eq!(params["countrycodes"], "in");
        assert_eq!(params["limit"], "1");
        assert_eq!(params["addressdetails"], "1");
        assert_eq!(params["format"], "json");
        assert_eq!(params["email"], "your-email@example.com");
    }

    #[tokio::test]
    async fn test_falls_back_to_plain_query() {
        let client = client(ScriptedTransport::new(vec![empty(), hit("Paris, France")]));

        let result = client.geocode("Paris", Some(&india())).await.unwrap().unwrap();

        assert_eq!(result.display_name, "Paris, France");
        assert_eq!(client.transport.call_count(), 2);

        let params = client.transport.params(1);
        assert_eq!(params["q"], "Paris");
        assert!(!params.contains_key("countrycodes"));
    }

    #[tokio::test]
    async fn test_no_match_is_none() {
        let client = client(ScriptedTransport::new(vec![empty(), empty()]));

        let result = client.geocode("Xyzzyville", Some(&india())).await.unwrap();

        assert!(result.is_none());
        assert_eq!(client.transport.call_count(), 2);
    }

    #[tokio::test]
    async fn test_without_region_uses_plain_only() {
        let client = client(ScriptedTransport::new(vec![empty()]));

        assert!(client.geocode("Atlantis", None).await.unwrap().is_none());
        assert_eq!(client.transport.call_count(), 1);
        assert_eq!(client.transport.params(0)["q"], "Atlantis");
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_limit_backoff_then_success() {
        let client = client(ScriptedTransport::new(vec![
            Err(TransportError::Status(429)),
            Err(TransportError::Status(429)),
            hit("Pune, Maharashtra, India"),
        ]));

        let result = client.geocode("Pune", Some(&india())).await.unwrap();

        assert!(result.is_some());
        assert_eq!(client.transport.call_count(), 3);

        let times = client.transport.call_times();
        let first = times[1] - times[0];
        let second = times[2] - times[1];
        assert!(first >= Duration::from_millis(700) && first < Duration::from_millis(750));
        assert!(second >= Duration::from_millis(1400) && second < Duration::from_millis(1450));
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_limit_exhausted() {
        let client = client(ScriptedTransport::always(Err(TransportError::Status(429))));

        let err = client.geocode("Pune", Some(&india())).await.unwrap_err();

        assert_eq!(err.kind, ErrorKind::RateLimited);
        // 1 initial attempt + 3 retries, no fallback to the plain query
        assert_eq!(client.transport.call_count(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_network_error_exhausted() {
        let client = client(ScriptedTransport::always(Err(TransportError::Network(
            "dns failure".into(),
        ))));

        let err = client.geocode("Pune", None).await.unwrap_err();

        assert_eq!(err.kind, ErrorKind::NetworkError);
        assert_eq!(client.transport.call_count(), 4);
    }

    #[tokio::test]
    async fn test_forbidden_is_not_retried() {
        let client = client(ScriptedTransport::always(Err(TransportError::Status(403))));

        let err = client.geocode("Pune", Some(&india())).await.unwrap_err();

        assert_eq!(err.kind, ErrorKind::Blocked);
        assert_eq!(client.transport.call_count(), 1);
    }

    #[tokio::test]
    async fn test_other_status_is_http_error() {
        let client = client(ScriptedTransport::always(Err(TransportError::Status(503))));

        let err = client.geocode("Pune", Some(&india())).await.unwrap_err();

        assert_eq!(err.kind, ErrorKind::HttpError { status: 503 });
        assert_eq!(err.kind.status_code(), Some(503));
        assert_eq!(client.transport.call_count(), 1);
    }

    #[tokio::test]
    async fn test_malformed_body() {
        let client = client(ScriptedTransport::new(vec![Ok(json!({ "error": "nope" }))]));

        let err = client.geocode("Pune", None).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidResponse);
    }

    #[tokio::test(start_paused = true)]
    async fn test_call_timeout() {
        let transport = ScriptedTransport {
            hang: true,
            ..Default::default()
        };
        let client = client(transport);

        let err = client.geocode("Pune", None).await.unwrap_err();

        assert_eq!(err.kind, ErrorKind::NetworkError);
        assert!(err.message.contains("30s"));
    }

    #[tokio::test]
    async fn test_base_url_trailing_slash() {
        let mut config = Config::default();
        config.geocoder.base_url = "http://localhost:8080/".to_string();
        let client = NominatimClient::new(ScriptedTransport::default(), &config);
        assert_eq!(client.search_url, "http://localhost:8080/search");
    }
}
