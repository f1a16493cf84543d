//! Parameters structure for drive control

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Deserialize;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for drive control.
///
/// The PID gains are tuned per deployment (floor surface, battery, motor wear) and must never be
/// hardcoded into the algorithm.
#[derive(Debug, Clone, Deserialize)]
pub struct Params {
    /// Proportional gain of the steering controller.
    pub k_p: f64,

    /// Integral gain of the steering controller.
    pub k_i: f64,

    /// Derivative gain of the steering controller.
    pub k_d: f64,

    /// Period of the control tick.
    ///
    /// Units: seconds
    pub tick_period_s: f64,

    /// Ramp rate the maneuvers use when accelerating and when braking to a stop.
    ///
    /// Units: power per tick
    pub mnvr_ramp_rate: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for Params {
    fn default() -> Self {
        Self {
            k_p: 0.30,
            k_i: 0.20,
            k_d: 0.0,
            tick_period_s: 0.004,
            mnvr_ramp_rate: 0.1,
        }
    }
}
