//! JSON output formatter

use crate::config::Config;
use crate::error::Result;
use crate::format::OutputFormatter;
use crate::session::SessionSnapshot;

/// JSON formatter - outputs the full snapshot as pretty-printed JSON
pub struct JsonFormatter;

impl OutputFormatter for JsonFormatter {
    fn name(&self) -> &str {
        "json"
    }

    fn description(&self) -> &str {
        "Full session snapshot as JSON"
    }

    fn content_type(&self) -> &str {
        "application/json"
    }

    fn format(&self, snapshot: &SessionSnapshot, _config: &Config) -> Result<String> {
        Ok(serde_json::to_string_pretty(snapshot)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::sample_snapshot;

    #[test]
    fn test_json_format() {
        let output = JsonFormatter
            .format(&sample_snapshot(), &Config::default())
            .unwrap();

        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["points"].as_array().unwrap().len(), 6);
        assert_eq!(parsed["centroids"].as_array().unwrap().len(), 2);
        assert_eq!(parsed["stats"]["total_grids"], 2);
        assert_eq!(parsed["details"]["efficiency"], "Optimized");
    }
}
