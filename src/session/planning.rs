//! Planning inputs
//!
//! Grid type, budget and expected capacity are captured per session and shown
//! in the region details, but they never influence placement.

use crate::config::defaults::{
    DEFAULT_EXPECTED_CAPACITY, DEFAULT_MAX_BUDGET, DEFAULT_MIN_BUDGET, DEFAULT_SELECTED_BUDGET,
};
use crate::optimize::{RegionEstimate, Stats};
use serde::{Deserialize, Serialize};

/// Kind of solar grid being planned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GridType {
    #[default]
    Traditional,
    AllWeather,
    /// Hybrid mix described by a free-text label
    Custom,
}

impl std::fmt::Display for GridType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Traditional => write!(f, "traditional"),
            Self::AllWeather => write!(f, "all-weather"),
            Self::Custom => write!(f, "custom"),
        }
    }
}

impl std::str::FromStr for GridType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "traditional" => Ok(Self::Traditional),
            "all-weather" | "all_weather" | "allweather" => Ok(Self::AllWeather),
            "custom" | "hybrid" => Ok(Self::Custom),
            _ => Err(format!("Unknown grid type: {}", s)),
        }
    }
}

/// Descriptive planning fields held by a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanningInputs {
    pub grid_type: GridType,
    /// Label used when `grid_type` is `custom`
    pub custom_grid_type: String,
    pub min_budget: f64,
    pub max_budget: f64,
    pub selected_budget: f64,
    /// Expected capacity in MW
    pub expected_capacity: f64,
}

impl Default for PlanningInputs {
    fn default() -> Self {
        Self {
            grid_type: GridType::default(),
            custom_grid_type: String::new(),
            min_budget: DEFAULT_MIN_BUDGET,
            max_budget: DEFAULT_MAX_BUDGET,
            selected_budget: DEFAULT_SELECTED_BUDGET,
            expected_capacity: DEFAULT_EXPECTED_CAPACITY,
        }
    }
}

impl PlanningInputs {
    /// Label shown for the grid type
    pub fn grid_type_label(&self) -> String {
        match self.grid_type {
            GridType::Custom if self.custom_grid_type.is_empty() => "Custom".to_string(),
            GridType::Custom => self.custom_grid_type.clone(),
            other => other.to_string(),
        }
    }

    /// Apply a partial update; absent fields are left untouched
    ///
    /// Selecting a non-custom grid type drops the custom label.
    pub fn apply(&mut self, update: PlanningUpdate) {
        if let Some(label) = update.custom_grid_type {
            self.custom_grid_type = label;
        }
        if let Some(grid_type) = update.grid_type {
            self.grid_type = grid_type;
            if grid_type != GridType::Custom {
                self.custom_grid_type.clear();
            }
        }
        if let Some(v) = update.min_budget {
            self.min_budget = v;
        }
        if let Some(v) = update.max_budget {
            self.max_budget = v;
        }
        if let Some(v) = update.selected_budget {
            self.selected_budget = v;
        }
        if let Some(v) = update.expected_capacity {
            self.expected_capacity = v;
        }
    }
}

/// Partial update of planning inputs
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlanningUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grid_type: Option<GridType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_grid_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_budget: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_budget: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_budget: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_capacity: Option<f64>,
}

/// Region details panel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionDetails {
    pub area_km2: f64,
    pub population: f64,
    /// "Optimized" once grids are placed, "Pending" before
    pub efficiency: String,
    pub grid_type: String,
    pub installation_cost: f64,
}

impl RegionDetails {
    pub fn new(region: RegionEstimate, stats: &Stats, planning: &PlanningInputs) -> Self {
        let efficiency = if stats.total_grids > 0 {
            "Optimized"
        } else {
            "Pending"
        };
        Self {
            area_km2: region.area_km2,
            population: region.population,
            efficiency: efficiency.to_string(),
            grid_type: planning.grid_type_label(),
            installation_cost: planning.selected_budget,
        }
    }
}
