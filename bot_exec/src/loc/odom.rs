//! Odometry estimator
//!
//! Integrates raw wheel encoder counts into cumulative travel. Per-wheel travel over one tick is
//! `(pi * wheel_diameter / 360) * (count - previous_count)`; the travel of the robot body is the
//! mean of the two wheels.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use super::LocParams;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Dead-reckoning distance estimator.
///
/// `update` must be called at most once per tick. Calling it twice in the same tick
/// double-counts nothing (the counts haven't changed) but skipping the serialisation through the
/// monitor and updating from two call sites in one tick will double-count travel - this is a
/// caller contract, not a runtime-checked invariant.
#[derive(Debug, Clone)]
pub struct OdomEstimator {
    /// Travel per degree of wheel rotation, millimetres.
    mm_per_deg: f64,

    /// Cumulative travel of the robot body, millimetres, signed.
    distance_mm: f64,

    /// Travel of the left wheel over the last update, millimetres.
    left_delta_mm: f64,

    /// Travel of the right wheel over the last update, millimetres.
    right_delta_mm: f64,

    /// Encoder counts at the last update, degrees.
    prev_left_count: i32,
    prev_right_count: i32,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl OdomEstimator {
    /// Create a new estimator with zeroed state.
    pub fn new(params: &LocParams) -> Self {
        Self {
            mm_per_deg: std::f64::consts::PI * params.wheel_diameter_mm / 360.0,
            distance_mm: 0.0,
            left_delta_mm: 0.0,
            right_delta_mm: 0.0,
            prev_left_count: 0,
            prev_right_count: 0,
        }
    }

    /// Zero the cumulative distance and per-wheel deltas, capturing the given raw counts as the
    /// new reference.
    pub fn reset(&mut self, left_count: i32, right_count: i32) {
        self.distance_mm = 0.0;
        self.left_delta_mm = 0.0;
        self.right_delta_mm = 0.0;
        self.prev_left_count = left_count;
        self.prev_right_count = right_count;
    }

    /// Integrate one tick of encoder counts.
    pub fn update(&mut self, left_count: i32, right_count: i32) {
        self.left_delta_mm = self.mm_per_deg * (left_count - self.prev_left_count) as f64;
        self.right_delta_mm = self.mm_per_deg * (right_count - self.prev_right_count) as f64;

        self.distance_mm += (self.left_delta_mm + self.right_delta_mm) / 2.0;

        self.prev_left_count = left_count;
        self.prev_right_count = right_count;
    }

    /// Cumulative travel since the last reset, millimetres, signed.
    pub fn distance_mm(&self) -> f64 {
        self.distance_mm
    }

    /// Travel of the left wheel over the last update, millimetres.
    pub fn left_delta_mm(&self) -> f64 {
        self.left_delta_mm
    }

    /// Travel of the right wheel over the last update, millimetres.
    pub fn right_delta_mm(&self) -> f64 {
        self.right_delta_mm
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    /// Millimetres of travel for one degree of a 90 mm wheel.
    const MM_PER_DEG: f64 = std::f64::consts::PI * 90.0 / 360.0;

    #[test]
    fn test_distance_accumulation() {
        let mut odom = OdomEstimator::new(&LocParams::default());

        // Scripted per-tick counts: both wheels advance 10 degrees per tick for 5 ticks
        for i in 1..=5 {
            odom.update(i * 10, i * 10);
        }

        let expected = 50.0 * MM_PER_DEG;
        assert!((odom.distance_mm() - expected).abs() < 1e-9);
        assert!((odom.left_delta_mm() - 10.0 * MM_PER_DEG).abs() < 1e-9);
        assert!((odom.right_delta_mm() - 10.0 * MM_PER_DEG).abs() < 1e-9);
    }

    #[test]
    fn test_unequal_wheels_average() {
        let mut odom = OdomEstimator::new(&LocParams::default());

        // Left advances 20 deg, right stands still: body travel is the mean
        odom.update(20, 0);

        assert!((odom.distance_mm() - 10.0 * MM_PER_DEG).abs() < 1e-9);
    }

    #[test]
    fn test_repeated_update_without_count_change() {
        let mut odom = OdomEstimator::new(&LocParams::default());

        odom.update(90, 90);
        let after_first = odom.distance_mm();

        // A second update with unchanged counts yields zero deltas and no distance change
        odom.update(90, 90);
        odom.update(90, 90);

        assert_eq!(odom.distance_mm(), after_first);
        assert_eq!(odom.left_delta_mm(), 0.0);
        assert_eq!(odom.right_delta_mm(), 0.0);
    }

    #[test]
    fn test_reset_captures_reference() {
        let mut odom = OdomEstimator::new(&LocParams::default());

        odom.update(100, 100);
        assert!(odom.distance_mm() > 0.0);

        // Reset against the current counts: no phantom travel on the next update
        odom.reset(100, 100);
        assert_eq!(odom.distance_mm(), 0.0);

        odom.update(100, 100);
        assert_eq!(odom.distance_mm(), 0.0);
    }

    #[test]
    fn test_reverse_travel_is_negative() {
        let mut odom = OdomEstimator::new(&LocParams::default());

        odom.update(-40, -40);

        assert!((odom.distance_mm() + 40.0 * MM_PER_DEG).abs() < 1e-9);
    }
}
