//! Session state
//!
//! A session is one page view of the optimizer: the selected points, the last
//! placement, and the planning inputs. `Session` holds the state and exposes
//! pure update functions; `controller::Controller` owns a session behind a lock
//! and adds the simulated compute latency.

pub mod controller;
pub mod planning;

use crate::coord::Coordinates;
use crate::error::{Error, Result};
use crate::optimize::{self, Placement, RegionEstimate, Stats};
use planning::{PlanningInputs, PlanningUpdate, RegionDetails};
use serde::{Deserialize, Serialize};

pub use controller::{Controller, ControllerSettings};

/// Ordered, append-only sequence of selected points
///
/// Insertion order decides group membership. Points can only be appended or
/// cleared all at once.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PointSet(Vec<Coordinates>);

impl PointSet {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn push(&mut self, point: Coordinates) {
        self.0.push(point);
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[Coordinates] {
        &self.0
    }

    /// Region estimate for the current point count
    pub fn region(&self) -> RegionEstimate {
        RegionEstimate::from_point_count(self.len())
    }
}

/// What to do with an in-flight result when the session was cleared while it
/// was computing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StaleResultPolicy {
    /// Last write wins: the result is published even after a clear
    #[default]
    Commit,
    /// Drop results whose input predates the latest clear
    Discard,
}

impl std::fmt::Display for StaleResultPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Commit => write!(f, "commit"),
            Self::Discard => write!(f, "discard"),
        }
    }
}

impl std::str::FromStr for StaleResultPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "commit" | "last_write_wins" => Ok(Self::Commit),
            "discard" => Ok(Self::Discard),
            _ => Err(format!("Unknown stale result policy: {}", s)),
        }
    }
}

/// Input frozen at the moment an optimization was requested
#[derive(Debug, Clone)]
pub struct PendingOptimization {
    /// Points as they were when the request was accepted
    pub points: Vec<Coordinates>,
    /// Clear epoch at request time
    pub epoch: u64,
}

/// Result of committing a finished optimization
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    Committed { total_grids: usize },
    Discarded,
}

/// Mutable state of one optimizer page view
#[derive(Debug, Clone, Default)]
pub struct Session {
    points: PointSet,
    placement: Option<Placement>,
    stats: Stats,
    is_calculating: bool,
    /// Incremented by every clear
    epoch: u64,
    planning: PlanningInputs,
    optimized_at: Option<String>,
}

impl Session {
    /// Create an empty session with the given planning inputs
    pub fn new(planning: PlanningInputs) -> Self {
        Self {
            planning,
            ..Default::default()
        }
    }

    /// Append a point
    pub fn add_point(&mut self, point: Coordinates) {
        self.points.push(point);
    }

    /// Empty the point set and reset centroids and stats
    ///
    /// Does not touch `is_calculating`: an in-flight optimization still
    /// completes.
    pub fn clear(&mut self) {
        self.points.clear();
        self.placement = None;
        self.stats = Stats::default();
        self.optimized_at = None;
        self.epoch += 1;
    }

    /// Accept an optimization request and freeze its input
    ///
    /// Rejected without any state change when a computation is already in
    /// flight or fewer than three points are selected.
    pub fn begin_optimize(&mut self) -> Result<PendingOptimization> {
        if self.is_calculating {
            return Err(Error::CalculationInProgress);
        }
        let required = crate::constants::placement::MIN_POINTS;
        if self.points.len() < required {
            return Err(Error::InsufficientPoints {
                required,
                actual: self.points.len(),
            });
        }

        self.is_calculating = true;
        Ok(PendingOptimization {
            points: self.points.as_slice().to_vec(),
            epoch: self.epoch,
        })
    }

    /// Publish a finished placement computed from `pending`
    pub fn commit(
        &mut self,
        pending: &PendingOptimization,
        placement: Placement,
        policy: StaleResultPolicy,
    ) -> CommitOutcome {
        self.is_calculating = false;

        if policy == StaleResultPolicy::Discard && pending.epoch != self.epoch {
            return CommitOutcome::Discarded;
        }

        let total_grids = placement.centroids.len();
        self.stats = placement.stats;
        self.placement = Some(placement);
        self.optimized_at = Some(chrono::Utc::now().to_rfc3339());
        CommitOutcome::Committed { total_grids }
    }

    /// Reset the calculating flag without publishing anything
    pub fn abandon(&mut self) {
        self.is_calculating = false;
    }

    pub fn update_planning(&mut self, update: PlanningUpdate) {
        self.planning.apply(update);
    }

    pub fn points(&self) -> &PointSet {
        &self.points
    }

    pub fn centroids(&self) -> &[Coordinates] {
        self.placement
            .as_ref()
            .map(|p| p.centroids.as_slice())
            .unwrap_or(&[])
    }

    pub fn stats(&self) -> Stats {
        self.stats
    }

    pub fn is_calculating(&self) -> bool {
        self.is_calculating
    }

    pub fn planning(&self) -> &PlanningInputs {
        &self.planning
    }

    /// Read-only view of the current state
    pub fn snapshot(&self) -> SessionSnapshot {
        let region = self.points.region();
        SessionSnapshot {
            points: self.points.as_slice().to_vec(),
            centroids: self.centroids().to_vec(),
            groups: self
                .placement
                .as_ref()
                .map(|p| p.groups.clone())
                .unwrap_or_default(),
            stats: self.stats,
            region,
            is_calculating: self.is_calculating,
            can_optimize: !self.is_calculating
                && self.points.len() >= crate::constants::placement::MIN_POINTS,
            details: RegionDetails::new(region, &self.stats, &self.planning),
            planning: self.planning.clone(),
            optimized_at: self.optimized_at.clone(),
        }
    }
}

/// Serializable view of a session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub points: Vec<Coordinates>,
    pub centroids: Vec<Coordinates>,
    /// Point indices behind each centroid
    pub groups: Vec<Vec<usize>>,
    pub stats: Stats,
    pub region: RegionEstimate,
    pub is_calculating: bool,
    /// Whether the Optimize action is currently enabled
    pub can_optimize: bool,
    pub details: RegionDetails,
    pub planning: PlanningInputs,
    /// RFC 3339 time of the last published placement
    #[serde(skip_serializing_if = "Option::is_none")]
    pub optimized_at: Option<String>,
}

/// Compute and commit in one step (no latency)
pub fn optimize_now(session: &mut Session, policy: StaleResultPolicy) -> Result<CommitOutcome> {
    let pending = session.begin_optimize()?;
    match optimize::run(&pending.points) {
        Ok(placement) => Ok(session.commit(&pending, placement, policy)),
        Err(e) => {
            session.abandon();
            Err(e)
        }
    }
}
