//! URL output formatter

use crate::config::Config;
use crate::error::{Error, Result};
use crate::format::OutputFormatter;
use crate::session::SessionSnapshot;

/// URL formatter - one map link per grid location
pub struct UrlFormatter;

impl UrlFormatter {
    /// Format URLs with optional provider override
    pub fn format_with_provider(
        &self,
        snapshot: &SessionSnapshot,
        config: &Config,
        provider: Option<&str>,
    ) -> Result<String> {
        if snapshot.centroids.is_empty() {
            return Err(Error::InvalidInput(
                "No grid locations yet; run an optimization first".to_string(),
            ));
        }

        let urls = snapshot
            .centroids
            .iter()
            .map(|c| config.format_url(provider, c.lat, c.lng))
            .collect::<Result<Vec<_>>>()?;

        Ok(urls.join("\n"))
    }
}

impl OutputFormatter for UrlFormatter {
    fn name(&self) -> &str {
        "url"
    }

    fn description(&self) -> &str {
        "Map URL for each grid location"
    }

    fn format(&self, snapshot: &SessionSnapshot, config: &Config) -> Result<String> {
        self.format_with_provider(snapshot, config, None)
    }
}
