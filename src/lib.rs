//! gridplace: solar microgrid placement
//!
//! A library and CLI tool that turns a set of user-selected map points into
//! grid locations and summary figures.
//!
//! ## Features
//!
//! - Round-robin grouping of points by selection order
//! - Planar centroid per group
//! - Coverage, power and region estimates from fixed multipliers
//! - Session controller with simulated compute latency
//! - HTTP API + CLI interface
//!
//! ## Quick Start
//!
//! ```rust
//! use gridplace::coord::Coordinates;
//! use gridplace::optimize;
//!
//! let points = vec![
//!     Coordinates::new(0.0, 0.0),
//!     Coordinates::new(0.0, 3.0),
//!     Coordinates::new(3.0, 0.0),
//!     Coordinates::new(3.0, 3.0),
//!     Coordinates::new(1.5, 1.5),
//! ];
//!
//! let placement = optimize::run(&points).unwrap();
//! assert_eq!(placement.centroids, vec![Coordinates::new(1.5, 1.5)]);
//! assert_eq!(placement.stats.total_grids, 1);
//! ```

pub mod cli;
pub mod config;
pub mod constants;
pub mod coord;
pub mod error;
pub mod format;
pub mod optimize;
pub mod server;
pub mod session;

// Re-export commonly used types
pub use config::Config;
pub use coord::Coordinates;
pub use error::{Error, Result};
pub use optimize::{Placement, RegionEstimate, Stats};
pub use session::{Controller, ControllerSettings, Session, SessionSnapshot};
