//! Output formatters
//!
//! Provides trait-based output formatting for session snapshots.

pub mod gpx;
pub mod json;
pub mod text;
pub mod url;

use crate::config::Config;
use crate::error::Result;
use crate::session::SessionSnapshot;
use serde::{Deserialize, Serialize};

/// Information about an output format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormatInfo {
    /// Format name
    pub name: String,
    /// Format description
    pub description: String,
    /// MIME type used when served over HTTP
    pub content_type: String,
}

/// Trait for output formatters
pub trait OutputFormatter: Send + Sync {
    /// Get the format name
    fn name(&self) -> &str;

    /// Get the format description
    fn description(&self) -> &str;

    /// MIME type of the produced output
    fn content_type(&self) -> &str {
        "text/plain; charset=utf-8"
    }

    /// Format a session snapshot
    ///
    /// # Arguments
    /// * `snapshot` - The session state to format
    /// * `config` - Application config (for url providers, etc.)
    fn format(&self, snapshot: &SessionSnapshot, config: &Config) -> Result<String>;
}

/// Get a formatter by name
pub fn get_formatter(name: &str) -> Option<Box<dyn OutputFormatter>> {
    match name.to_lowercase().as_str() {
        "json" => Some(Box::new(json::JsonFormatter)),
        "text" => Some(Box::new(text::TextFormatter)),
        "gpx" => Some(Box::new(gpx::GpxFormatter)),
        "url" => Some(Box::new(url::UrlFormatter)),
        _ => None,
    }
}

/// List all available formatters
pub fn available_formats() -> Vec<FormatInfo> {
    ["json", "text", "gpx", "url"]
        .iter()
        .filter_map(|name| get_formatter(name))
        .map(|f| FormatInfo {
            name: f.name().to_string(),
            description: f.description().to_string(),
            content_type: f.content_type().to_string(),
        })
        .collect()
}

#[cfg(test)]
pub(crate) fn sample_snapshot() -> SessionSnapshot {
    use crate::session::{optimize_now, Session, StaleResultPolicy};

    let mut session = Session::default();
    for (lat, lng) in [
        (5.60, -0.18),
        (6.69, -1.62),
        (5.61, -0.19),
        (6.70, -1.63),
        (5.62, -0.20),
        (6.71, -1.64),
    ] {
        session.add_point(crate::coord::Coordinates::new(lat, lng));
    }
    optimize_now(&mut session, StaleResultPolicy::Commit).unwrap();
    session.snapshot()
}
