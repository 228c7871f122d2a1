//! Configuration management
//!
//! Loads and saves configuration from XDG-compliant paths.
//! Config location: ~/.config/gridplace/config.toml

pub mod defaults;

use crate::constants::map as map_consts;
use crate::error::{Error, Result};
use crate::session::planning::{GridType, PlanningInputs};
use crate::session::StaleResultPolicy;
use defaults::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Optimizer behaviour
    #[serde(default)]
    pub optimizer: OptimizerConfig,

    /// Default values for the CLI
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// Server settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Map display settings
    #[serde(default)]
    pub map: MapConfig,

    /// Initial planning inputs of a new session
    #[serde(default)]
    pub planning: PlanningConfig,

    /// URL generation settings
    #[serde(default)]
    pub url: UrlConfig,
}

/// Optimizer behaviour
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizerConfig {
    /// Simulated compute latency in milliseconds (0 disables it)
    #[serde(default = "default_latency_ms")]
    pub latency_ms: u64,

    /// What to do with a result that finishes after a clear: commit or discard
    #[serde(default = "default_stale_results")]
    pub stale_results: String,

    /// Reject points outside the valid latitude/longitude ranges
    #[serde(default)]
    pub validate_range: bool,
}

/// Default values for the CLI
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Default output format
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

    /// Idle seconds before a session is evicted
    #[serde(default = "default_session_ttl")]
    pub session_ttl_secs: u64,
}

/// Map display settings, handed to the front end as-is
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapConfig {
    #[serde(default = "default_center_lat")]
    pub center_lat: f64,

    #[serde(default = "default_center_lng")]
    pub center_lng: f64,

    #[serde(default = "default_zoom")]
    pub zoom: u8,

    /// Tile URL template with {s}, {z}, {x}, {y} placeholders
    #[serde(default = "default_tile_url")]
    pub tile_url: String,

    #[serde(default = "default_attribution")]
    pub attribution: String,

    /// Coverage circle radius around each grid, in meters
    #[serde(default = "default_coverage_radius")]
    pub coverage_radius_m: f64,
}

/// Initial planning inputs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanningConfig {
    #[serde(default = "default_grid_type")]
    pub grid_type: String,

    #[serde(default)]
    pub custom_grid_type: String,

    #[serde(default = "default_min_budget")]
    pub min_budget: f64,

    #[serde(default = "default_max_budget")]
    pub max_budget: f64,

    #[serde(default = "default_selected_budget")]
    pub selected_budget: f64,

    /// Expected capacity in MW
    #[serde(default = "default_expected_capacity")]
    pub expected_capacity: f64,
}

/// URL generation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UrlConfig {
    /// Default URL provider
    #[serde(default = "default_url_provider")]
    pub default: String,

    /// URL provider templates
    #[serde(default = "default_url_providers")]
    pub providers: HashMap<String, String>,
}

// Default value functions for serde
fn default_latency_ms() -> u64 {
    DEFAULT_LATENCY_MS
}
fn default_stale_results() -> String {
    DEFAULT_STALE_RESULTS.to_string()
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
fn default_session_ttl() -> u64 {
    DEFAULT_SESSION_TTL_SECS
}
fn default_center_lat() -> f64 {
    map_consts::CENTER_LAT
}
fn default_center_lng() -> f64 {
    map_consts::CENTER_LNG
}
fn default_zoom() -> u8 {
    map_consts::ZOOM
}
fn default_tile_url() -> String {
    map_consts::OSM_TILE_URL.to_string()
}
fn default_attribution() -> String {
    map_consts::OSM_ATTRIBUTION.to_string()
}
fn default_coverage_radius() -> f64 {
    map_consts::COVERAGE_RADIUS_METERS
}
fn default_grid_type() -> String {
    DEFAULT_GRID_TYPE.to_string()
}
fn default_min_budget() -> f64 {
    DEFAULT_MIN_BUDGET
}
fn default_max_budget() -> f64 {
    DEFAULT_MAX_BUDGET
}
fn default_selected_budget() -> f64 {
    DEFAULT_SELECTED_BUDGET
}
fn default_expected_capacity() -> f64 {
    DEFAULT_EXPECTED_CAPACITY
}
fn default_url_provider() -> String {
    DEFAULT_URL_PROVIDER.to_string()
}
fn default_url_providers() -> HashMap<String, String> {
    let mut providers = HashMap::new();
    providers.insert(
        "google".to_string(),
        "https://www.google.com/maps/@{lat},{lng},12z".to_string(),
    );
    providers.insert(
        "openstreetmap".to_string(),
        "https://www.openstreetmap.org/#map=12/{lat}/{lng}".to_string(),
    );
    providers.insert(
        "apple".to_string(),
        "https://maps.apple.com/?ll={lat},{lng}".to_string(),
    );
    providers
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            latency_ms: default_latency_ms(),
            stale_results: default_stale_results(),
            validate_range: false,
        }
    }
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            session_ttl_secs: default_session_ttl(),
        }
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            center_lat: default_center_lat(),
            center_lng: default_center_lng(),
            zoom: default_zoom(),
            tile_url: default_tile_url(),
            attribution: default_attribution(),
            coverage_radius_m: default_coverage_radius(),
        }
    }
}

impl Default for PlanningConfig {
    fn default() -> Self {
        Self {
            grid_type: default_grid_type(),
            custom_grid_type: String::new(),
            min_budget: default_min_budget(),
            max_budget: default_max_budget(),
            selected_budget: default_selected_budget(),
            expected_capacity: default_expected_capacity(),
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

fn parse_value<T: std::str::FromStr>(what: &str, value: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| Error::Config(format!("Invalid {} value: {}", what, value)))
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
        let path = Self::config_path()?;

        if path.exists() {
            let content = fs::read_to_string(&path).map_err(|e| {
                Error::Config(format!("Failed to read config file: {}", e))
            })?;

            toml::from_str(&content).map_err(|e| {
                Error::Config(format!("Failed to parse config file: {}", e))
            })
        } else {
            let config = Config::default();
            config.save()?;
            Ok(config)
        }
    }

    /// Save configuration to the default path
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                Error::Config(format!("Failed to create config directory: {}", e))
            })?;
        }

        let content = toml::to_string_pretty(self).map_err(|e| {
            Error::Config(format!("Failed to serialize config: {}", e))
        })?;

        fs::write(&path, content).map_err(|e| {
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
            ["optimizer", "latency_ms"] => Some(self.optimizer.latency_ms.to_string()),
            ["optimizer", "stale_results"] => Some(self.optimizer.stale_results.clone()),
            ["optimizer", "validate_range"] => Some(self.optimizer.validate_range.to_string()),

            ["defaults", "format"] => Some(self.defaults.format.clone()),

            ["server", "host"] => Some(self.server.host.clone()),
            ["server", "port"] => Some(self.server.port.to_string()),
            ["server", "session_ttl_secs"] => Some(self.server.session_ttl_secs.to_string()),

            ["map", "center_lat"] => Some(self.map.center_lat.to_string()),
            ["map", "center_lng"] => Some(self.map.center_lng.to_string()),
            ["map", "zoom"] => Some(self.map.zoom.to_string()),
            ["map", "tile_url"] => Some(self.map.tile_url.clone()),
            ["map", "attribution"] => Some(self.map.attribution.clone()),
            ["map", "coverage_radius_m"] => Some(self.map.coverage_radius_m.to_string()),

            ["planning", "grid_type"] => Some(self.planning.grid_type.clone()),
            ["planning", "custom_grid_type"] => Some(self.planning.custom_grid_type.clone()),
            ["planning", "min_budget"] => Some(self.planning.min_budget.to_string()),
            ["planning", "max_budget"] => Some(self.planning.max_budget.to_string()),
            ["planning", "selected_budget"] => Some(self.planning.selected_budget.to_string()),
            ["planning", "expected_capacity"] => Some(self.planning.expected_capacity.to_string()),

            ["url", "default"] => Some(self.url.default.clone()),

            _ => None,
        }
    }

    /// Set a configuration value by key path
    ///
    /// Key format: "section.key"
    /// Returns error if key is invalid or value type is wrong
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["optimizer", "latency_ms"] => {
                self.optimizer.latency_ms = parse_value("latency", value)?;
            }
            ["optimizer", "stale_results"] => {
                value.parse::<StaleResultPolicy>().map_err(Error::Config)?;
                self.optimizer.stale_results = value.to_lowercase();
            }
            ["optimizer", "validate_range"] => {
                self.optimizer.validate_range = parse_value("boolean", value)?;
            }

            ["defaults", "format"] => {
                self.defaults.format = value.to_string();
            }

            ["server", "host"] => {
                self.server.host = value.to_string();
            }
            ["server", "port"] => {
                self.server.port = parse_value("port", value)?;
            }
            ["server", "session_ttl_secs"] => {
                self.server.session_ttl_secs = parse_value("session_ttl_secs", value)?;
            }

            ["map", "center_lat"] => {
                self.map.center_lat = parse_value("latitude", value)?;
            }
            ["map", "center_lng"] => {
                self.map.center_lng = parse_value("longitude", value)?;
            }
            ["map", "zoom"] => {
                self.map.zoom = parse_value("zoom", value)?;
            }
            ["map", "tile_url"] => {
                self.map.tile_url = value.to_string();
            }
            ["map", "attribution"] => {
                self.map.attribution = value.to_string();
            }
            ["map", "coverage_radius_m"] => {
                self.map.coverage_radius_m = parse_value("radius", value)?;
            }

            ["planning", "grid_type"] => {
                value.parse::<GridType>().map_err(Error::Config)?;
                self.planning.grid_type = value.to_string();
            }
            ["planning", "custom_grid_type"] => {
                self.planning.custom_grid_type = value.to_string();
            }
            ["planning", "min_budget"] => {
                self.planning.min_budget = parse_value("budget", value)?;
            }
            ["planning", "max_budget"] => {
                self.planning.max_budget = parse_value("budget", value)?;
            }
            ["planning", "selected_budget"] => {
                self.planning.selected_budget = parse_value("budget", value)?;
            }
            ["planning", "expected_capacity"] => {
                self.planning.expected_capacity = parse_value("capacity", value)?;
            }

            ["url", "default"] => {
                self.url.default = value.to_string();
            }

            _ => {
                return Err(Error::Config(format!("Unknown config key: {}", key)));
            }
        }

        Ok(())
    }

    /// List all available config keys
    pub fn available_keys() -> Vec<&'static str> {
        vec![
            "optimizer.latency_ms",
            "optimizer.stale_results",
            "optimizer.validate_range",
            "defaults.format",
            "server.host",
            "server.port",
            "server.session_ttl_secs",
            "map.center_lat",
            "map.center_lng",
            "map.zoom",
            "map.tile_url",
            "map.attribution",
            "map.coverage_radius_m",
            "planning.grid_type",
            "planning.custom_grid_type",
            "planning.min_budget",
            "planning.max_budget",
            "planning.selected_budget",
            "planning.expected_capacity",
            "url.default",
        ]
    }

    /// Parsed stale result policy
    pub fn stale_result_policy(&self) -> Result<StaleResultPolicy> {
        self.optimizer
            .stale_results
            .parse()
            .map_err(Error::Config)
    }

    /// Planning inputs for a new session
    pub fn planning_inputs(&self) -> Result<PlanningInputs> {
        Ok(PlanningInputs {
            grid_type: self.planning.grid_type.parse().map_err(Error::Config)?,
            custom_grid_type: self.planning.custom_grid_type.clone(),
            min_budget: self.planning.min_budget,
            max_budget: self.planning.max_budget,
            selected_budget: self.planning.selected_budget,
            expected_capacity: self.planning.expected_capacity,
        })
    }

    /// Format a URL using the specified provider
    ///
    /// Replaces {lat} and {lng} placeholders with actual values
    pub fn format_url(&self, provider: Option<&str>, lat: f64, lng: f64) -> Result<String> {
        let provider_name = provider.unwrap_or(&self.url.default);

        let template = self.url.providers.get(provider_name).ok_or_else(|| {
            Error::Config(format!("Unknown URL provider: {}", provider_name))
        })?;

        Ok(template
            .replace("{lat}", &lat.to_string())
            .replace("{lng}", &lng.to_string()))
    }

    /// Get server address as "host:port"
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
