//! Session controller
//!
//! Owns one `Session` behind an async lock and dispatches user actions to it.
//! Optimization is split into `begin_optimize` and `complete` so the caller can
//! hold the frozen input across the simulated latency without holding the lock.

use crate::config::Config;
use crate::coord::Coordinates;
use crate::error::{Error, Result};
use crate::optimize;
use crate::session::planning::{PlanningInputs, PlanningUpdate};
use crate::session::{CommitOutcome, PendingOptimization, Session, SessionSnapshot, StaleResultPolicy};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Behaviour knobs for a controller
#[derive(Debug, Clone)]
pub struct ControllerSettings {
    /// Artificial delay before a placement is published
    pub latency: Duration,
    /// Race resolution between an in-flight optimization and a clear
    pub stale_results: StaleResultPolicy,
    /// Reject points outside [-90, 90] x [-180, 180]
    pub validate_range: bool,
    /// Planning inputs of a freshly created session
    pub planning: PlanningInputs,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            latency: Duration::from_millis(crate::config::defaults::DEFAULT_LATENCY_MS),
            stale_results: StaleResultPolicy::default(),
            validate_range: false,
            planning: PlanningInputs::default(),
        }
    }
}

impl ControllerSettings {
    /// Build settings from configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self {
            latency: Duration::from_millis(config.optimizer.latency_ms),
            stale_results: config.stale_result_policy()?,
            validate_range: config.optimizer.validate_range,
            planning: config.planning_inputs()?,
        })
    }

    /// Same settings without the artificial delay
    pub fn immediate(mut self) -> Self {
        self.latency = Duration::ZERO;
        self
    }
}

/// Cloneable handle to a single session
#[derive(Debug, Clone)]
pub struct Controller {
    session: Arc<RwLock<Session>>,
    settings: Arc<ControllerSettings>,
}

impl Controller {
    /// Create a controller around an empty session
    pub fn new(settings: ControllerSettings) -> Self {
        let session = Session::new(settings.planning.clone());
        Self {
            session: Arc::new(RwLock::new(session)),
            settings: Arc::new(settings),
        }
    }

    pub fn settings(&self) -> &ControllerSettings {
        &self.settings
    }

    /// Append a point (map click). Returns the new point count.
    pub async fn add_point(&self, lat: f64, lng: f64) -> Result<usize> {
        let point = Coordinates::finite(lat, lng)?;
        self.push(point).await
    }

    /// Append a point from manual-entry text. Returns the new point count.
    ///
    /// Unparseable text leaves the point set unchanged.
    pub async fn add_point_from_text(&self, lat: &str, lng: &str) -> Result<usize> {
        let point = Coordinates::from_text(lat, lng).map_err(|e| {
            warn!("Rejected manual entry ({:?}, {:?}): {}", lat, lng, e);
            e
        })?;
        self.push(point).await
    }

    async fn push(&self, point: Coordinates) -> Result<usize> {
        if self.settings.validate_range {
            point.validate()?;
        }
        let mut session = self.session.write().await;
        session.add_point(point);
        debug!("Added point {} ({} total)", point, session.points().len());
        Ok(session.points().len())
    }

    /// Clear points, centroids and stats
    pub async fn clear(&self) {
        let mut session = self.session.write().await;
        session.clear();
        debug!("Cleared session");
    }

    /// Update the inert planning inputs
    pub async fn update_planning(&self, update: PlanningUpdate) -> SessionSnapshot {
        let mut session = self.session.write().await;
        session.update_planning(update);
        session.snapshot()
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        self.session.read().await.snapshot()
    }

    /// Accept an optimization request and freeze the current points
    pub async fn begin_optimize(&self) -> Result<PendingOptimization> {
        let mut session = self.session.write().await;
        session.begin_optimize().map_err(|e| {
            warn!("Optimize rejected: {}", e);
            e
        })
    }

    /// Compute a placement from the frozen input and publish it
    pub async fn complete(&self, pending: PendingOptimization) -> Result<CommitOutcome> {
        let placement = optimize::run(&pending.points);

        let mut session = self.session.write().await;
        let placement = match placement {
            Ok(p) => p,
            Err(e) => {
                session.abandon();
                return Err(e);
            }
        };

        let outcome = session.commit(&pending, placement, self.settings.stale_results);
        match outcome {
            CommitOutcome::Committed { total_grids } => {
                info!(
                    "Placed {} grid(s) from {} point(s)",
                    total_grids,
                    pending.points.len()
                );
            }
            CommitOutcome::Discarded => {
                warn!("Discarded placement computed before the last clear");
            }
        }
        Ok(outcome)
    }

    /// Wait out the latency and publish on a detached task.
    ///
    /// The task owns the pending run, so dropping the returned handle (or the
    /// future awaiting it) does not leave the session stuck calculating.
    pub fn spawn_completion(
        &self,
        pending: PendingOptimization,
    ) -> JoinHandle<Result<CommitOutcome>> {
        let ctl = self.clone();
        tokio::spawn(async move {
            let latency = ctl.settings.latency;
            if !latency.is_zero() {
                tokio::time::sleep(latency).await;
            }
            ctl.complete(pending).await
        })
    }

    /// Full optimize action: accept, wait out the latency, publish
    pub async fn optimize(&self) -> Result<CommitOutcome> {
        let pending = self.begin_optimize().await?;
        self.spawn_completion(pending)
            .await
            .map_err(|e| Error::Server(format!("optimization task failed: {}", e)))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimize::Stats;

    fn controller() -> Controller {
        Controller::new(ControllerSettings::default().immediate())
    }

    async fn add_square(ctl: &Controller) {
        for (lat, lng) in [(0.0, 0.0), (0.0, 3.0), (3.0, 0.0), (3.0, 3.0), (1.5, 1.5)] {
            ctl.add_point(lat, lng).await.unwrap();
        }
    }

    #[tokio::test]
    async fn test_add_and_optimize() {
        let ctl = controller();
        add_square(&ctl).await;

        let outcome = ctl.optimize().await.unwrap();
        assert_eq!(outcome, CommitOutcome::Committed { total_grids: 1 });

        let snap = ctl.snapshot().await;
        assert_eq!(snap.centroids, vec![Coordinates::new(1.5, 1.5)]);
        assert_eq!(snap.stats, Stats::from_centroid_count(1));
    }

    #[tokio::test]
    async fn test_manual_entry_invalid() {
        let ctl = controller();
        ctl.add_point(1.0, 1.0).await.unwrap();

        let err = ctl.add_point_from_text("north", "1.0").await.unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
        assert_eq!(ctl.snapshot().await.points.len(), 1);

        assert_eq!(ctl.add_point_from_text("2.5", "-1.25").await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_non_finite_click_rejected() {
        let ctl = controller();
        assert!(ctl.add_point(f64::NAN, 0.0).await.is_err());
        assert!(ctl.snapshot().await.points.is_empty());
    }

    #[tokio::test]
    async fn test_range_validation_optional() {
        let ctl = controller();
        assert!(ctl.add_point(95.0, 0.0).await.is_ok());

        let mut settings = ControllerSettings::default().immediate();
        settings.validate_range = true;
        let strict = Controller::new(settings);
        let err = strict.add_point(95.0, 0.0).await.unwrap_err();
        assert!(matches!(err, Error::InvalidCoordinates(_)));
        assert!(strict.snapshot().await.points.is_empty());
    }

    #[tokio::test]
    async fn test_optimize_insufficient_points() {
        let ctl = controller();
        ctl.add_point(0.0, 0.0).await.unwrap();
        ctl.add_point(1.0, 1.0).await.unwrap();

        let err = ctl.optimize().await.unwrap_err();
        assert!(matches!(err, Error::InsufficientPoints { .. }));

        let snap = ctl.snapshot().await;
        assert!(snap.centroids.is_empty());
        assert_eq!(snap.stats, Stats::default());
        assert!(!snap.is_calculating);
    }

    #[tokio::test(start_paused = true)]
    async fn test_latency_shows_calculating_state() {
        let mut settings = ControllerSettings::default();
        settings.latency = Duration::from_secs(1);
        let ctl = Controller::new(settings);
        add_square(&ctl).await;

        let task = {
            let ctl = ctl.clone();
            tokio::spawn(async move { ctl.optimize().await })
        };
        while !ctl.snapshot().await.is_calculating {
            tokio::task::yield_now().await;
        }

        let snap = ctl.snapshot().await;
        assert!(snap.is_calculating);
        assert!(!snap.can_optimize);
        assert!(snap.centroids.is_empty());
        assert!(matches!(ctl.optimize().await, Err(Error::CalculationInProgress)));

        // Points added during the delay are not part of the computation
        for i in 0..4 {
            ctl.add_point(50.0 + i as f64, 50.0).await.unwrap();
        }

        let outcome = task.await.unwrap().unwrap();
        assert_eq!(outcome, CommitOutcome::Committed { total_grids: 1 });

        let snap = ctl.snapshot().await;
        assert!(!snap.is_calculating);
        assert_eq!(snap.points.len(), 9);
        assert_eq!(snap.centroids, vec![Coordinates::new(1.5, 1.5)]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_optimize_still_completes() {
        let mut settings = ControllerSettings::default();
        settings.latency = Duration::from_secs(1);
        let ctl = Controller::new(settings);
        add_square(&ctl).await;

        let caller = {
            let ctl = ctl.clone();
            tokio::spawn(async move { ctl.optimize().await })
        };
        while !ctl.snapshot().await.is_calculating {
            tokio::task::yield_now().await;
        }
        caller.abort();
        assert!(caller.await.unwrap_err().is_cancelled());

        tokio::time::sleep(Duration::from_secs(2)).await;

        let snap = ctl.snapshot().await;
        assert!(!snap.is_calculating);
        assert!(snap.can_optimize);
        assert_eq!(snap.centroids, vec![Coordinates::new(1.5, 1.5)]);

        let outcome = ctl.optimize().await.unwrap();
        assert_eq!(outcome, CommitOutcome::Committed { total_grids: 1 });
    }

    #[tokio::test]
    async fn test_clear_while_pending_commit_policy() {
        let ctl = controller();
        add_square(&ctl).await;

        let pending = ctl.begin_optimize().await.unwrap();
        ctl.clear().await;
        ctl.complete(pending).await.unwrap();

        let snap = ctl.snapshot().await;
        assert!(snap.points.is_empty());
        assert_eq!(snap.centroids.len(), 1);
    }

    #[tokio::test]
    async fn test_clear_while_pending_discard_policy() {
        let mut settings = ControllerSettings::default().immediate();
        settings.stale_results = StaleResultPolicy::Discard;
        let ctl = Controller::new(settings);
        add_square(&ctl).await;

        let pending = ctl.begin_optimize().await.unwrap();
        ctl.clear().await;
        let outcome = ctl.complete(pending).await.unwrap();

        assert_eq!(outcome, CommitOutcome::Discarded);
        let snap = ctl.snapshot().await;
        assert!(snap.centroids.is_empty());
        assert!(!snap.is_calculating);
    }

    #[tokio::test]
    async fn test_update_planning_does_not_touch_placement() {
        let ctl = controller();
        add_square(&ctl).await;
        ctl.optimize().await.unwrap();

        let snap = ctl
            .update_planning(PlanningUpdate {
                expected_capacity: Some(250.0),
                ..Default::default()
            })
            .await;

        assert_eq!(snap.planning.expected_capacity, 250.0);
        assert_eq!(snap.stats, Stats::from_centroid_count(1));
    }
}
