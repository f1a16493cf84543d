//! # Monitor module
//!
//! The monitor is the background sampler of the control loop. Once per tick it refreshes, in a
//! fixed order, everything the foreground logic may read:
//!
//! 1. the odometry estimator (from the wheel encoder counts),
//! 2. the heading estimator (from the odometry's fresh per-wheel deltas),
//! 3. the cached sensor snapshot (colour, range, inclination).
//!
//! The foreground segment logic for a tick must run only after `sample` for that tick, so that
//! it never sees a mixture of old and new readings. All blocking loops in this crate follow the
//! same shape: `wait_tick`, `sample`, then decide.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

// External
use serde::Serialize;

// Internal
use crate::eqpt::{Eqpt, RgbRaw};
use crate::loc::{HeadingEstimator, LocParams, OdomEstimator};

// ------------------------------------------------------------------------------------------------
// DATA STRUCTURES
// ------------------------------------------------------------------------------------------------

/// The sensor readings cached by the monitor for the current tick.
///
/// Read-only to everything except the monitor itself.
#[derive(Debug, Default, Clone, Copy, Serialize)]
pub struct SensorSnapshot {
    /// Latest colour sensor reading.
    pub rgb: RgbRaw,

    /// Latest range sensor reading, centimetres.
    pub obstacle_cm: i16,

    /// Latest inclination sensor reading, degrees.
    pub tilt_deg: i16,
}

/// The background sampler.
pub struct Monitor {
    odom: OdomEstimator,
    heading: HeadingEstimator,
    snapshot: SensorSnapshot,

    /// Ticks sampled since the last reset.
    ticks: u32,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Monitor {
    /// Create a new monitor with zeroed estimators.
    pub fn new(params: &LocParams) -> Self {
        Self {
            odom: OdomEstimator::new(params),
            heading: HeadingEstimator::new(params),
            snapshot: SensorSnapshot::default(),
            ticks: 0,
        }
    }

    /// Reset the estimators and tick counter for a new control sequence (segment entry).
    ///
    /// The current encoder counts are captured as the new odometry reference and the sensor
    /// snapshot is refreshed so the first foreground decision never sees stale data.
    pub fn reset<E: Eqpt>(&mut self, eqpt: &E) {
        let (left, right) = eqpt.wheel_counts();
        self.odom.reset(left, right);
        self.heading.reset();
        self.refresh_snapshot(eqpt);
        self.ticks = 0;
    }

    /// Sample the equipment for this tick.
    ///
    /// Must be called exactly once per tick, before any foreground logic for the same tick.
    pub fn sample<E: Eqpt>(&mut self, eqpt: &E) {
        // Order matters: odometry first, then heading from the fresh deltas, then the snapshot
        let (left, right) = eqpt.wheel_counts();
        self.odom.update(left, right);
        self.heading
            .update(self.odom.left_delta_mm(), self.odom.right_delta_mm());
        self.refresh_snapshot(eqpt);

        self.ticks += 1;
    }

    /// Cumulative travel since the last reset, millimetres, signed.
    pub fn distance_mm(&self) -> f64 {
        self.odom.distance_mm()
    }

    /// Unwrapped heading since the last reset, degrees, right turn positive.
    pub fn heading_deg(&self) -> f64 {
        self.heading.heading_deg()
    }

    /// The sensor snapshot for the current tick.
    pub fn snapshot(&self) -> &SensorSnapshot {
        &self.snapshot
    }

    /// Ticks sampled since the last reset.
    pub fn ticks(&self) -> u32 {
        self.ticks
    }

    fn refresh_snapshot<E: Eqpt>(&mut self, eqpt: &E) {
        self.snapshot = SensorSnapshot {
            rgb: eqpt.rgb_raw(),
            obstacle_cm: eqpt.obstacle_cm(),
            tilt_deg: eqpt.tilt_deg(),
        };
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------
