//! Default configuration values
//!
//! Named constants for all tunable parameters

/// Simulated compute latency of an optimization, in milliseconds
pub const DEFAULT_LATENCY_MS: u64 = 1000;

/// Default stale result policy
pub const DEFAULT_STALE_RESULTS: &str = "commit";

/// Default output format
pub const DEFAULT_FORMAT: &str = "text";

/// Default server host
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default server port
pub const DEFAULT_PORT: u16 = 7878;

/// Default idle lifetime of a server session, in seconds
pub const DEFAULT_SESSION_TTL_SECS: u64 = 1800;

/// Default grid type
pub const DEFAULT_GRID_TYPE: &str = "traditional";

/// Default budget range and selection
pub const DEFAULT_MIN_BUDGET: f64 = 1000.0;
pub const DEFAULT_MAX_BUDGET: f64 = 10_000.0;
pub const DEFAULT_SELECTED_BUDGET: f64 = 5000.0;

/// Default expected capacity in MW
pub const DEFAULT_EXPECTED_CAPACITY: f64 = 10.0;

/// Default URL provider
pub const DEFAULT_URL_PROVIDER: &str = "google";

/// Config file name
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Application directory name (for XDG paths)
pub const APP_DIR_NAME: &str = "gridplace";
