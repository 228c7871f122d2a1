//! Centralized constants for the gridplace crate
//!
//! The placement multipliers are fixed values, not physically derived.
//! Changing them changes every reported figure.

/// Placement pipeline constants
pub mod placement {
    /// Minimum number of points before an optimization may run
    pub const MIN_POINTS: usize = 3;

    /// Points per grid when deriving the group count
    pub const POINTS_PER_GRID: usize = 3;

    /// Coverage percentage credited per placed grid
    pub const COVERAGE_PER_GRID: f64 = 12.0;

    /// Power capacity in MW credited per placed grid
    pub const MW_PER_GRID: f64 = 1.2;
}

/// Region estimate constants
pub mod region {
    /// Area in km² attributed to each selected point
    pub const KM2_PER_POINT: f64 = 3.0;

    /// Assumed population density (people per km²)
    pub const PEOPLE_PER_KM2: f64 = 120.0;
}

/// Map display constants
pub mod map {
    /// Public OpenStreetMap tile template
    pub const OSM_TILE_URL: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";

    /// Attribution required by the tile provider
    pub const OSM_ATTRIBUTION: &str = "© OpenStreetMap contributors";

    /// Initial map center (central Ghana)
    pub const CENTER_LAT: f64 = 7.9465;
    pub const CENTER_LNG: f64 = -1.0232;

    /// Initial zoom level
    pub const ZOOM: u8 = 6;

    /// Radius of the coverage circle drawn around each grid, in meters
    pub const COVERAGE_RADIUS_METERS: f64 = 10_000.0;
}
