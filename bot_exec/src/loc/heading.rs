//! Heading estimator
//!
//! Integrates the difference of the per-wheel travels into a heading angle:
//! `heading += (360 / (2 * pi * track)) * (left_delta - right_delta)`.
//!
//! Right turns are positive. The heading is unwrapped - it is never normalised into a +/-180
//! range, so after several turns it can be far outside one revolution. Downstream code must
//! compare heading *deltas* against a reference captured at a known point, never absolute
//! values.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use super::LocParams;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Dead-reckoning heading estimator.
///
/// Must be updated after the odometry estimator in the same tick, using the odometry's freshly
/// computed per-wheel deltas. Updating in the wrong order uses the previous tick's deltas and
/// silently skews the heading.
#[derive(Debug, Clone)]
pub struct HeadingEstimator {
    /// Heading change per millimetre of wheel travel difference, degrees.
    deg_per_mm: f64,

    /// Unwrapped heading, degrees, right turn positive.
    heading_deg: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl HeadingEstimator {
    /// Create a new estimator with zero heading.
    pub fn new(params: &LocParams) -> Self {
        Self {
            deg_per_mm: 360.0 / (2.0 * std::f64::consts::PI * params.track_width_mm),
            heading_deg: 0.0,
        }
    }

    /// Zero the heading.
    pub fn reset(&mut self) {
        self.heading_deg = 0.0;
    }

    /// Integrate one tick of per-wheel travel deltas.
    pub fn update(&mut self, left_delta_mm: f64, right_delta_mm: f64) {
        self.heading_deg += self.deg_per_mm * (left_delta_mm - right_delta_mm);
    }

    /// Unwrapped heading since the last reset, degrees, right turn positive.
    pub fn heading_deg(&self) -> f64 {
        self.heading_deg
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
