//! Round-robin partitioning of the point sequence
//!
//! The point at index `i` lands in group `i % group_count`. This is a scatter
//! by selection order, not a spatial clustering: two points on opposite sides
//! of the map share a group whenever their indices are congruent.

use crate::constants::placement::{MIN_POINTS, POINTS_PER_GRID};
use crate::coord::Coordinates;
use crate::error::{Error, Result};

/// Number of groups for `point_count` points: `max(1, floor(n / 3))`
pub fn group_count(point_count: usize) -> usize {
    (point_count / POINTS_PER_GRID).max(1)
}

/// Partition the indices `0..point_count` into round-robin groups
///
/// Every index appears in exactly one group, and every group is non-empty
/// because `group_count(n) <= n` for `n >= 1`.
pub fn partition_indices(point_count: usize) -> Result<Vec<Vec<usize>>> {
    if point_count < MIN_POINTS {
        return Err(Error::InsufficientPoints {
            required: MIN_POINTS,
            actual: point_count,
        });
    }

    let count = group_count(point_count);
    let mut groups = vec![Vec::with_capacity(point_count / count + 1); count];
    for i in 0..point_count {
        groups[i % count].push(i);
    }
    Ok(groups)
}

/// Partition points into round-robin groups, preserving selection order
/// within each group
pub fn partition(points: &[Coordinates]) -> Result<Vec<Vec<Coordinates>>> {
    let groups = partition_indices(points.len())?;
    Ok(groups
        .into_iter()
        .map(|members| members.into_iter().map(|i| points[i]).collect())
        .collect())
}
