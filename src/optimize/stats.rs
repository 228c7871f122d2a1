//! Derived figures: placement statistics and region estimate

use crate::constants::placement::{COVERAGE_PER_GRID, MW_PER_GRID};
use crate::constants::region::{KM2_PER_POINT, PEOPLE_PER_KM2};
use serde::{Deserialize, Serialize};

/// Summary of one optimization run
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Stats {
    /// Number of placed grids (one per centroid)
    pub total_grids: usize,
    /// Estimated coverage, in percent
    pub estimated_coverage: f64,
    /// Estimated power capacity, in MW
    pub power_capacity: f64,
}

impl Stats {
    /// Derive stats from the number of centroids produced by a run
    pub fn from_centroid_count(count: usize) -> Self {
        Self {
            total_grids: count,
            estimated_coverage: count as f64 * COVERAGE_PER_GRID,
            power_capacity: count as f64 * MW_PER_GRID,
        }
    }
}

/// Display-only estimate of the selected region
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RegionEstimate {
    /// Area in km²
    pub area_km2: f64,
    /// Estimated population
    pub population: f64,
}

impl RegionEstimate {
    /// Estimate the region from the current number of selected points
    pub fn from_point_count(count: usize) -> Self {
        let area_km2 = count as f64 * KM2_PER_POINT;
        Self {
            area_km2,
            population: area_km2 * PEOPLE_PER_KM2,
        }
    }
}
