//! Server shared state
//!
//! Holds configuration and the live sessions, one per page view. A page view
//! that goes away without deleting its session is evicted once idle for
//! `server.session_ttl_secs`.

use crate::config::Config;
use crate::error::{Error, Result};
use crate::session::{Controller, ControllerSettings};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

struct SessionEntry {
    controller: Controller,
    last_access: tokio::time::Instant,
}

impl SessionEntry {
    fn new(controller: Controller) -> Self {
        Self {
            controller,
            last_access: tokio::time::Instant::now(),
        }
    }
}

/// Shared state for the HTTP server
pub struct AppState {
    /// Configuration
    pub config: Arc<RwLock<Config>>,

    /// Settings handed to every new session
    settings: ControllerSettings,

    /// Live sessions keyed by id
    sessions: RwLock<HashMap<Uuid, SessionEntry>>,

    /// Idle lifetime of a session; zero keeps sessions until deleted
    session_ttl: Duration,

    started: Instant,
}

impl AppState {
    /// Create new application state
    pub fn new(config: Config) -> Result<Self> {
        let settings = ControllerSettings::from_config(&config)?;
        Ok(Self::with_settings(config, settings))
    }

    /// Create state with explicit controller settings
    pub fn with_settings(config: Config, settings: ControllerSettings) -> Self {
        let session_ttl = Duration::from_secs(config.server.session_ttl_secs);
        Self {
            config: Arc::new(RwLock::new(config)),
            settings,
            sessions: RwLock::new(HashMap::new()),
            session_ttl,
            started: Instant::now(),
        }
    }

    /// Start a new session, evicting idle ones first
    pub async fn create_session(&self) -> (Uuid, Controller) {
        self.evict_idle().await;
        let id = Uuid::new_v4();
        let controller = Controller::new(self.settings.clone());
        self.sessions
            .write()
            .await
            .insert(id, SessionEntry::new(controller.clone()));
        (id, controller)
    }

    /// Look up a session by its textual id and mark it as used
    pub async fn session(&self, id: &str) -> Result<Controller> {
        let uuid = Uuid::parse_str(id).map_err(|_| Error::SessionNotFound(id.to_string()))?;
        let mut sessions = self.sessions.write().await;
        let entry = sessions
            .get_mut(&uuid)
            .ok_or_else(|| Error::SessionNotFound(id.to_string()))?;
        entry.last_access = tokio::time::Instant::now();
        Ok(entry.controller.clone())
    }

    /// Drop a session; returns false if it did not exist
    pub async fn remove_session(&self, id: &str) -> bool {
        match Uuid::parse_str(id) {
            Ok(uuid) => self.sessions.write().await.remove(&uuid).is_some(),
            Err(_) => false,
        }
    }

    /// Remove sessions idle for longer than the TTL. Returns how many went.
    pub async fn evict_idle(&self) -> usize {
        if self.session_ttl.is_zero() {
            return 0;
        }
        let ttl = self.session_ttl;
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, entry| entry.last_access.elapsed() < ttl);
        let evicted = before - sessions.len();
        if evicted > 0 {
            debug!("Evicted {} idle session(s)", evicted);
        }
        evicted
    }

    pub fn session_ttl(&self) -> Duration {
        self.session_ttl
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub fn uptime_secs(&self) -> u64 {
        self.started.elapsed().as_secs()
    }
}
