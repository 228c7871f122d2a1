//! GPX output formatter

use crate::config::Config;
use crate::error::Result;
use crate::format::OutputFormatter;
use crate::session::SessionSnapshot;

/// GPX formatter - selected points and grid locations as waypoints
pub struct GpxFormatter;

impl OutputFormatter for GpxFormatter {
    fn name(&self) -> &str {
        "gpx"
    }

    fn description(&self) -> &str {
        "GPX waypoint file"
    }

    fn content_type(&self) -> &str {
        "application/gpx+xml"
    }

    fn format(&self, snapshot: &SessionSnapshot, config: &Config) -> Result<String> {
        let mut gpx = String::new();

        gpx.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
        gpx.push('\n');
        gpx.push_str(r#"<gpx version="1.1" creator="gridplace">"#);
        gpx.push('\n');

        gpx.push_str("  <metadata>\n");
        gpx.push_str("    <name>gridplace placement</name>\n");
        if let Some(time) = &snapshot.optimized_at {
            gpx.push_str(&format!("    <time>{}</time>\n", time));
        }
        gpx.push_str("  </metadata>\n");

        for (i, p) in snapshot.points.iter().enumerate() {
            gpx.push_str(&format!(r#"  <wpt lat="{}" lon="{}">"#, p.lat, p.lng));
            gpx.push('\n');
            gpx.push_str(&format!("    <name>Point {}</name>\n", i + 1));
            gpx.push_str("    <sym>flag</sym>\n");
            gpx.push_str("  </wpt>\n");
        }

        for (i, c) in snapshot.centroids.iter().enumerate() {
            gpx.push_str(&format!(r#"  <wpt lat="{}" lon="{}">"#, c.lat, c.lng));
            gpx.push('\n');
            gpx.push_str(&format!("    <name>Grid {}</name>\n", i + 1));
            gpx.push_str(&format!(
                "    <desc>coverage radius: {}m</desc>\n",
                config.map.coverage_radius_m
            ));
            gpx.push_str("    <sym>power</sym>\n");
            gpx.push_str("  </wpt>\n");
        }

        gpx.push_str("</gpx>\n");
        Ok(gpx)
    }
}
