//! Optimize command handler
//!
//! Collects points from the command line or a file, runs the placement and
//! prints the result in the chosen format.

use crate::config::Config;
use crate::error::{Error, Result};
use crate::format::{available_formats, get_formatter, url::UrlFormatter};
use crate::session::planning::{GridType, PlanningUpdate};
use crate::session::{CommitOutcome, Controller, ControllerSettings};
use clap::Args;
use std::str::FromStr;
use std::time::Duration;

/// Optimize command arguments
#[derive(Args)]
pub struct OptimizeArgs {
    /// Point as LAT,LNG (repeatable)
    #[arg(long = "point", short = 'P', value_name = "LAT,LNG", allow_hyphen_values = true)]
    pub points: Vec<String>,

    /// File with one LAT,LNG per line ('#' starts a comment)
    #[arg(long)]
    pub file: Option<String>,

    /// Output format
    #[arg(long, short = 'f')]
    pub format: Option<String>,

    /// URL provider for the url format
    #[arg(long)]
    pub provider: Option<String>,

    /// Write output to file
    #[arg(long, short = 'o')]
    pub output: Option<String>,

    /// Override the simulated optimization latency (milliseconds)
    #[arg(long)]
    pub latency_ms: Option<u64>,

    /// Grid type: traditional, all-weather or custom
    #[arg(long)]
    pub grid_type: Option<String>,

    /// Label for a custom grid type
    #[arg(long)]
    pub custom_grid_type: Option<String>,

    /// Selected budget
    #[arg(long)]
    pub budget: Option<f64>,

    /// Expected capacity in MW
    #[arg(long)]
    pub capacity: Option<f64>,

    /// List available formats
    #[arg(short = 'F', long = "list-formats")]
    pub list_formats: bool,
}

/// Run the optimize command
pub async fn run(args: OptimizeArgs) -> Result<()> {
    if args.list_formats {
        list_formats();
        return Ok(());
    }

    let mut config = Config::load()?;
    if let Some(latency) = args.latency_ms {
        config.optimizer.latency_ms = latency;
    }

    let controller = Controller::new(ControllerSettings::from_config(&config)?);

    let grid_type = args
        .grid_type
        .as_deref()
        .map(GridType::from_str)
        .transpose()
        .map_err(Error::Config)?;
    controller
        .update_planning(PlanningUpdate {
            grid_type,
            custom_grid_type: args.custom_grid_type.clone(),
            selected_budget: args.budget,
            expected_capacity: args.capacity,
            ..Default::default()
        })
        .await;

    let mut entries = args.points.clone();
    if let Some(path) = &args.file {
        let content = std::fs::read_to_string(path)?;
        entries.extend(read_entries(&content));
    }

    for entry in &entries {
        let (lat, lng) = split_entry(entry)?;
        controller.add_point_from_text(lat, lng).await?;
    }

    let latency = Duration::from_millis(config.optimizer.latency_ms);
    if !latency.is_zero() {
        eprintln!("Calculating...");
    }
    if let CommitOutcome::Discarded = controller.optimize().await? {
        eprintln!("Result discarded");
    }

    let snapshot = controller.snapshot().await;
    let format = args.format.unwrap_or(config.defaults.format.clone());
    let formatter = get_formatter(&format)
        .ok_or_else(|| Error::Config(format!("Unknown format: {}", format)))?;

    let output = match args.provider.as_deref() {
        Some(provider) if formatter.name() == "url" => {
            UrlFormatter.format_with_provider(&snapshot, &config, Some(provider))?
        }
        _ => formatter.format(&snapshot, &config)?,
    };

    if let Some(path) = args.output {
        std::fs::write(&path, &output)?;
        eprintln!("Output written to {}", path);
    } else {
        println!("{}", output);
    }

    Ok(())
}

/// Non-empty, non-comment lines of a points file
fn read_entries(content: &str) -> Vec<String> {
    content
        .lines()
        .map(|line| line.split('#').next().unwrap_or("").trim())
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Split "LAT,LNG" into its two text fields
fn split_entry(entry: &str) -> Result<(&str, &str)> {
    entry
        .split_once(',')
        .ok_or_else(|| Error::InvalidInput(format!("expected LAT,LNG but got '{}'", entry)))
}

/// Print available output formats
fn list_formats() {
    println!("Available output formats:");
    for format in available_formats() {
        println!("  {:6} - {}", format.name, format.description);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_entries() {
        let content = "# survey points\n5.60,-0.18\n\n  6.69, -1.62  # Kumasi\n";
        assert_eq!(read_entries(content), vec!["5.60,-0.18", "6.69, -1.62"]);
    }

    #[test]
    fn test_split_entry() {
        assert_eq!(split_entry("5.6,-0.18").unwrap(), ("5.6", "-0.18"));
        assert!(matches!(split_entry("5.6"), Err(Error::InvalidInput(_))));
    }
}
