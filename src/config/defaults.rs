//! Default configuration values
//!
//! Named constants for all tunable parameters

/// Default region name appended to region-scoped queries
pub const DEFAULT_REGION_NAME: &str = "India";

/// Default country code for region-scoped queries
pub const DEFAULT_COUNTRY_CODE: &str = "in";

/// Timeout for a single HTTP attempt in seconds
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Wall-clock cap for one geocode call, retries included, in seconds
pub const DEFAULT_CALL_TIMEOUT_SECS: u64 = 30;

/// Delay before the first retry in milliseconds
pub const DEFAULT_INITIAL_DELAY_MS: u64 = 700;

/// Backoff multiplier
pub const DEFAULT_MULTIPLIER: f64 = 2.0;

/// Retries after the initial attempt
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Upper bound for a single backoff delay in milliseconds
pub const DEFAULT_MAX_DELAY_MS: u64 = 10_000;

/// Quiet period before a burst of triggers runs one search, in milliseconds
pub const DEFAULT_DEBOUNCE_MS: u64 = 500;

/// Default distance unit
pub const DEFAULT_UNIT: &str = "km";

/// Default output format
pub const DEFAULT_FORMAT: &str = "text";

/// Default server host
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default server port
pub const DEFAULT_PORT: u16 = 7879;

/// Default URL provider
pub const DEFAULT_URL_PROVIDER: &str = "openstreetmap";

/// Config file name
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Application directory name (for XDG paths)
pub const APP_DIR_NAME: &str = "place-distance";
