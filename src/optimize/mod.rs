//! Grid placement pipeline
//!
//! This module handles:
//! - Round-robin partitioning of the selected points
//! - Centroid calculation per group
//! - Deriving placement statistics and region estimates
//!
//! The pipeline is deterministic and linear in the number of points.

pub mod centroid;
pub mod partition;
pub mod stats;

use crate::coord::Coordinates;
use crate::error::Result;
use serde::{Deserialize, Serialize};

pub use stats::{RegionEstimate, Stats};

/// Output of a single placement run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    /// One grid location per group
    pub centroids: Vec<Coordinates>,
    /// Point indices assigned to each centroid, in selection order
    pub groups: Vec<Vec<usize>>,
    /// Figures derived from the centroid count
    pub stats: Stats,
}

/// Run partition, centroid and stats derivation over `points`
///
/// Fails with `Error::InsufficientPoints` when fewer than three points are
/// given; cannot fail otherwise.
pub fn run(points: &[Coordinates]) -> Result<Placement> {
    let groups = partition::partition_indices(points.len())?;

    let centroids: Vec<Coordinates> = groups
        .iter()
        .filter_map(|members| {
            let group: Vec<Coordinates> = members.iter().map(|&i| points[i]).collect();
            centroid::centroid(&group)
        })
        .collect();
    debug_assert_eq!(centroids.len(), groups.len());

    let stats = Stats::from_centroid_count(centroids.len());

    Ok(Placement {
        centroids,
        groups,
        stats,
    })
}
