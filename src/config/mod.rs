//! Configuration management
//!
//! Loads and saves configuration from XDG-compliant paths.
//! Config location: ~/.config/place-distance/config.toml

pub mod defaults;

use crate::constants::api::{NOMINATIM_URL, PLACEHOLDER_CONTACT};
use crate::error::{Error, Result};
use crate::geo::{GeoResult, RegionHint};
use defaults::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Geocoding provider settings
    #[serde(default)]
    pub geocoder: GeocoderConfig,

    /// Backoff policy for retryable failures
    #[serde(default)]
    pub retry: RetryConfig,

    /// Search trigger settings
    #[serde(default)]
    pub search: SearchConfig,

    /// Default presentation values
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// Server settings
    #[serde(default)]
    pub server: ServerConfig,

    /// URL generation settings
    #[serde(default)]
    pub url: UrlConfig,
}

/// Geocoding provider settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocoderConfig {
    /// Provider base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Contact address sent with every request (provider usage policy)
    #[serde(default = "default_contact_email")]
    pub contact_email: String,

    /// Region name appended to region-scoped queries
    #[serde(default = "default_region_name")]
    pub region_name: String,

    /// Country code region-scoped queries are restricted to
    #[serde(default = "default_country_code")]
    pub country_code: String,

    /// Try a region-scoped query before the plain one
    #[serde(default = "default_true")]
    pub use_region: bool,

    /// Timeout for a single HTTP attempt
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Cap for one geocode call including all retries
    #[serde(default = "default_call_timeout")]
    pub call_timeout_secs: u64,
}

/// Backoff policy settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Delay before the first retry in milliseconds
    #[serde(default = "default_initial_delay")]
    pub initial_delay_ms: u64,

    /// Multiplier applied to each subsequent delay
    #[serde(default = "default_multiplier")]
    pub multiplier: f64,

    /// Retries after the initial attempt
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Upper bound for any single delay in milliseconds
    #[serde(default = "default_max_delay")]
    pub max_delay_ms: u64,

    /// Random spread applied to delays (0.0 to 1.0)
    #[serde(default)]
    pub jitter_factor: f64,
}

/// Search trigger settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Quiet period used to coalesce rapid triggers, in milliseconds
    #[serde(default = "default_debounce")]
    pub debounce_ms: u64,
}

/// Default presentation values
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Distance unit (km or miles)
    #[serde(default = "default_unit")]
    pub unit: String,

    /// Output format
    #[serde(default = "default_format")]
    pub format: String,
}

/// Server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

/// URL generation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UrlConfig {
    /// Default URL provider
    #[serde(default = "default_url_provider")]
    pub default: String,

    /// URL provider templates with {lat1} {lng1} {lat2} {lng2} placeholders,
    /// plus {name1} {name2} for URL-encoded display names
    #[serde(default = "default_url_providers")]
    pub providers: HashMap<String, String>,
}

// Default value functions for serde
fn default_base_url() -> String {
    NOMINATIM_URL.to_string()
}
fn default_contact_email() -> String {
    PLACEHOLDER_CONTACT.to_string()
}
fn default_region_name() -> String {
    DEFAULT_REGION_NAME.to_string()
}
fn default_country_code() -> String {
    DEFAULT_COUNTRY_CODE.to_string()
}
fn default_true() -> bool {
    true
}
fn default_request_timeout() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}
fn default_call_timeout() -> u64 {
    DEFAULT_CALL_TIMEOUT_SECS
}
fn default_initial_delay() -> u64 {
    DEFAULT_INITIAL_DELAY_MS
}
fn default_multiplier() -> f64 {
    DEFAULT_MULTIPLIER
}
fn default_max_retries() -> u32 {
    DEFAULT_MAX_RETRIES
}
fn default_max_delay() -> u64 {
    DEFAULT_MAX_DELAY_MS
}
fn default_debounce() -> u64 {
    DEFAULT_DEBOUNCE_MS
}
fn default_unit() -> String {
    DEFAULT_UNIT.to_string()
}
fn default_format() -> String {
    DEFAULT_FORMAT.to_string()
}
fn default_host() -> String {
    DEFAULT_HOST.to_string()
}
fn default_port() -> u16 {
    DEFAULT_PORT
}
fn default_url_provider() -> String {
    DEFAULT_URL_PROVIDER.to_string()
}
fn default_url_providers() -> HashMap<String, String> {
    let mut providers = HashMap::new();
    providers.insert(
        "openstreetmap".to_string(),
        "https://www.openstreetmap.org/directions?route={lat1}%2C{lng1}%3B{lat2}%2C{lng2}"
            .to_string(),
    );
    providers.insert(
        "google".to_string(),
        "https://www.google.com/maps/dir/{lat1},{lng1}/{lat2},{lng2}".to_string(),
    );
    providers
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            contact_email: default_contact_email(),
            region_name: default_region_name(),
            country_code: default_country_code(),
            use_region: true,
            request_timeout_secs: default_request_timeout(),
            call_timeout_secs: default_call_timeout(),
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            initial_delay_ms: default_initial_delay(),
            multiplier: default_multiplier(),
            max_retries: default_max_retries(),
            max_delay_ms: default_max_delay(),
            jitter_factor: 0.0,
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce(),
        }
    }
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            unit: default_unit(),
            format: default_format(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for UrlConfig {
    fn default() -> Self {
        Self {
            default: default_url_provider(),
            providers: default_url_providers(),
        }
    }
}

impl GeocoderConfig {
    /// Region used by the region-scoped strategy, if enabled
    pub fn region(&self) -> Option<RegionHint> {
        if !self.use_region || self.region_name.trim().is_empty() {
            return None;
        }
        Some(RegionHint::new(self.region_name.trim(), self.country_code.trim()))
    }

    /// Whether the contact address is still the shipped example value
    pub fn contact_is_placeholder(&self) -> bool {
        let contact = self.contact_email.trim();
        contact.is_empty() || contact == PLACEHOLDER_CONTACT
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn call_timeout(&self) -> Duration {
        Duration::from_secs(self.call_timeout_secs)
    }
}

impl SearchConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|p| p.join(APP_DIR_NAME))
            .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE_NAME))
    }

    /// Load configuration from the default path
    ///
    /// Creates default config if file doesn't exist
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from a specific path, creating it if missing
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = fs::read_to_string(path).map_err(|e| {
                Error::Config(format!("Failed to read config file: {}", e))
            })?;

            toml::from_str(&content).map_err(|e| {
                Error::Config(format!("Failed to parse config file: {}", e))
            })
        } else {
            let config = Config::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    /// Save configuration to the default path
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Save configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                Error::Config(format!("Failed to create config directory: {}", e))
            })?;
        }

        let content = toml::to_string_pretty(self).map_err(|e| {
            Error::Config(format!("Failed to serialize config: {}", e))
        })?;

        fs::write(path, content).map_err(|e| {
            Error::Config(format!("Failed to write config file: {}", e))
        })?;

        Ok(())
    }

    /// Get a configuration value by key path
    ///
    /// Key format: "section.key"
    /// Returns the value as a string, or None if not found
    pub fn get(&self, key: &str) -> Option<String> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["geocoder", "base_url"] => Some(self.geocoder.base_url.clone()),
            ["geocoder", "contact_email"] => Some(self.geocoder.contact_email.clone()),
            ["geocoder", "region_name"] => Some(self.geocoder.region_name.clone()),
            ["geocoder", "country_code"] => Some(self.geocoder.country_code.clone()),
            ["geocoder", "use_region"] => Some(self.geocoder.use_region.to_string()),
            ["geocoder", "request_timeout_secs"] => {
                Some(self.geocoder.request_timeout_secs.to_string())
            }
            ["geocoder", "call_timeout_secs"] => Some(self.geocoder.call_timeout_secs.to_string()),

            ["retry", "initial_delay_ms"] => Some(self.retry.initial_delay_ms.to_string()),
            ["retry", "multiplier"] => Some(self.retry.multiplier.to_string()),
            ["retry", "max_retries"] => Some(self.retry.max_retries.to_string()),
            ["retry", "max_delay_ms"] => Some(self.retry.max_delay_ms.to_string()),
            ["retry", "jitter_factor"] => Some(self.retry.jitter_factor.to_string()),

            ["search", "debounce_ms"] => Some(self.search.debounce_ms.to_string()),

            ["defaults", "unit"] => Some(self.defaults.unit.clone()),
            ["defaults", "format"] => Some(self.defaults.format.clone()),

            ["server", "host"] => Some(self.server.host.clone()),
            ["server", "port"] => Some(self.server.port.to_string()),

            ["url", "default"] => Some(self.url.default.clone()),

            _ => None,
        }
    }

    /// Set a configuration value by key path
    ///
    /// Key format: "section.key"
    /// Returns error if key is invalid or value type is wrong
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        fn parse<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
            value
                .parse()
                .map_err(|_| Error::Config(format!("Invalid value for {}: {}", key, value)))
        }

        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["geocoder", "base_url"] => self.geocoder.base_url = value.to_string(),
            ["geocoder", "contact_email"] => self.geocoder.contact_email = value.to_string(),
            ["geocoder", "region_name"] => self.geocoder.region_name = value.to_string(),
            ["geocoder", "country_code"] => {
                self.geocoder.country_code = value.to_lowercase();
            }
            ["geocoder", "use_region"] => self.geocoder.use_region = parse(key, value)?,
            ["geocoder", "request_timeout_secs"] => {
                self.geocoder.request_timeout_secs = parse(key, value)?;
            }
            ["geocoder", "call_timeout_secs"] => {
                self.geocoder.call_timeout_secs = parse(key, value)?;
            }

            ["retry", "initial_delay_ms"] => self.retry.initial_delay_ms = parse(key, value)?,
            ["retry", "multiplier"] => {
                let multiplier: f64 = parse(key, value)?;
                if !multiplier.is_finite() || multiplier < 1.0 {
                    return Err(Error::Config(format!(
                        "multiplier must be at least 1: {}",
                        value
                    )));
                }
                self.retry.multiplier = multiplier;
            }
            ["retry", "max_retries"] => self.retry.max_retries = parse(key, value)?,
            ["retry", "max_delay_ms"] => self.retry.max_delay_ms = parse(key, value)?,
            ["retry", "jitter_factor"] => {
                let factor: f64 = parse(key, value)?;
                if !(0.0..=1.0).contains(&factor) {
                    return Err(Error::Config(format!(
                        "jitter_factor must be between 0 and 1: {}",
                        value
                    )));
                }
                self.retry.jitter_factor = factor;
            }

            ["search", "debounce_ms"] => self.search.debounce_ms = parse(key, value)?,

            ["defaults", "unit"] => {
                let unit: crate::distance::DistanceUnit =
                    value.parse().map_err(Error::Config)?;
                self.defaults.unit = unit.to_string();
            }
            ["defaults", "format"] => {
                if crate::format::get_formatter(value).is_none() {
                    return Err(Error::Config(format!("Unknown format: {}", value)));
                }
                self.defaults.format = value.to_lowercase();
            }

            ["server", "host"] => self.server.host = value.to_string(),
            ["server", "port"] => self.server.port = parse(key, value)?,

            ["url", "default"] => self.url.default = value.to_string(),

            _ => {
                return Err(Error::Config(format!("Unknown config key: {}", key)));
            }
        }

        Ok(())
    }

    /// List all available config keys
    pub fn available_keys() -> Vec<&'static str> {
        vec![
            "geocoder.base_url",
            "geocoder.contact_email",
            "geocoder.region_name",
            "geocoder.country_code",
            "geocoder.use_region",
            "geocoder.request_timeout_secs",
            "geocoder.call_timeout_secs",
            "retry.initial_delay_ms",
            "retry.multiplier",
            "retry.max_retries",
            "retry.max_delay_ms",
            "retry.jitter_factor",
            "search.debounce_ms",
            "defaults.unit",
            "defaults.format",
            "server.host",
            "server.port",
            "url.default",
        ]
    }

    /// Format a two-point map URL using the specified provider
    ///
    /// Replaces coordinate placeholders and the URL-encoded {name1} and {name2}
    pub fn format_url(&self, provider: Option<&str>, a: &GeoResult, b: &GeoResult) -> Result<String> {
        let provider_name = provider.unwrap_or(&self.url.default);

        let template = self.url.providers.get(provider_name).ok_or_else(|| {
            Error::Config(format!("Unknown URL provider: {}", provider_name))
        })?;

        Ok(template
            .replace("{lat1}", &a.lat.to_string())
            .replace("{lng1}", &a.lng.to_string())
            .replace("{lat2}", &b.lat.to_string())
            .replace("{lng2}", &b.lng.to_string())
            .replace("{name1}", &urlencoding::encode(&a.display_name))
            .replace("{name2}", &urlencoding::encode(&b.display_name)))
    }

    /// Get server address as "host:port"
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
