//! Human-readable text output formatter
//!
//! Mirrors the analytics and region details panels.

use crate::config::Config;
use crate::error::Result;
use crate::format::OutputFormatter;
use crate::session::SessionSnapshot;

/// Text formatter - outputs human-readable summary
pub struct TextFormatter;

impl OutputFormatter for TextFormatter {
    fn name(&self) -> &str {
        "text"
    }

    fn description(&self) -> &str {
        "Human-readable summary"
    }

    fn format(&self, snapshot: &SessionSnapshot, _config: &Config) -> Result<String> {
        let mut output = String::new();
        let stats = &snapshot.stats;
        let details = &snapshot.details;

        output.push_str("Live Analytics:\n");
        output.push_str(&format!("  Points:   {}\n", snapshot.points.len()));
        output.push_str(&format!("  Grids:    {}\n", stats.total_grids));
        output.push_str(&format!("  Coverage: {:.0}%\n", stats.estimated_coverage));
        output.push_str(&format!("  Power:    {:.1}MW\n\n", stats.power_capacity));

        output.push_str("Region Details:\n");
        output.push_str(&format!("  Grid Area:         {:.1} km²\n", details.area_km2));
        output.push_str(&format!("  Efficiency:        {}\n", details.efficiency));
        output.push_str(&format!("  Population Est.:   {:.0} people\n", details.population));
        output.push_str(&format!("  Grid Type:         {}\n", details.grid_type));
        output.push_str(&format!("  Installation Cost: ${:.0}\n", details.installation_cost));

        if !snapshot.centroids.is_empty() {
            output.push_str("\nGrid Locations:\n");
            for (i, c) in snapshot.centroids.iter().enumerate() {
                let members = snapshot.groups.get(i).map(|g| g.len()).unwrap_or(0);
                output.push_str(&format!("  {:>3}. {} ({} points)\n", i + 1, c, members));
            }
        }

        Ok(output)
    }
}
