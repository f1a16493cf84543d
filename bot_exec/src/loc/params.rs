//! Parameters structure for the localisation module

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Deserialize;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for the odometry and heading estimators.
#[derive(Debug, Clone, Deserialize)]
pub struct LocParams {
    /// Diameter of the drive wheels.
    ///
    /// Units: millimetres
    pub wheel_diameter_mm: f64,

    /// Distance between the contact points of the two drive wheels.
    ///
    /// Units: millimetres
    pub track_width_mm: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for LocParams {
    fn default() -> Self {
        Self {
            wheel_diameter_mm: 90.0,
            track_width_mm: 150.0,
        }
    }
}
