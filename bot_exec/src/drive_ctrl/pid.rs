//! Steering PID controller

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use util::maths;

use super::{Params, TURN_MAX, TURN_MIN};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A PID controller producing turn demands from a sensor deviation.
///
/// The controller runs at the fixed control tick, so rather than timestamping each call the
/// integral and derivative use the configured tick period directly: the integral accumulates by
/// trapezoidal integration, the derivative is a backward difference.
#[derive(Debug, Clone)]
pub struct SteeringPid {
    k_p: f64,
    k_i: f64,
    k_d: f64,

    /// Control tick period, seconds.
    dt_s: f64,

    /// Error at the previous update.
    prev_error: f64,

    /// Trapezoidal integral accumulation.
    integral: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl SteeringPid {
    /// Create a new controller from the drive control parameters.
    pub fn new(params: &Params) -> Self {
        Self {
            k_p: params.k_p,
            k_i: params.k_i,
            k_d: params.k_d,
            dt_s: params.tick_period_s,
            prev_error: 0.0,
            integral: 0.0,
        }
    }

    /// Zero the accumulated state (segment entry).
    pub fn reset(&mut self) {
        self.prev_error = 0.0;
        self.integral = 0.0;
    }

    /// Get the turn demand for the given sensor reading and target value.
    ///
    /// The output is clamped to the turn command range and rounded to the nearest integer.
    pub fn turn_for(&mut self, sensor_val: u16, target_val: u16) -> i16 {
        let error = sensor_val as f64 - target_val as f64;

        self.integral += (error + self.prev_error) / 2.0 * self.dt_s;

        let p = self.k_p * error;
        let i = self.k_i * self.integral;
        let d = self.k_d * (error - self.prev_error) / self.dt_s;

        self.prev_error = error;

        maths::clamp(p + i + d, TURN_MIN as f64, TURN_MAX as f64).round() as i16
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    fn p_only() -> SteeringPid {
        SteeringPid::new(&Params {
            k_p: 1.0,
            k_i: 0.0,
            k_d: 0.0,
            ..Params::default()
        })
    }

    #[test]
    fn test_zero_deviation_zero_turn() {
        let mut pid = SteeringPid::new(&Params::default());

        for _ in 0..10 {
            assert_eq!(pid.turn_for(64, 64), 0);
        }
    }

    #[test]
    fn test_proportional_response() {
        let mut pid = p_only();

        assert_eq!(pid.turn_for(74, 64), 10);
        assert_eq!(pid.turn_for(54, 64), -10);
    }

    #[test]
    fn test_output_is_clamped() {
        let mut pid = SteeringPid::new(&Params {
            k_p: 100.0,
            k_i: 0.0,
            k_d: 0.0,
            ..Params::default()
        });

        assert_eq!(pid.turn_for(200, 0), 200);
        assert_eq!(pid.turn_for(0, 200), -200);
    }

    #[test]
    fn test_integral_accumulates() {
        let mut pid = SteeringPid::new(&Params {
            k_p: 0.0,
            k_i: 100.0,
            k_d: 0.0,
            tick_period_s: 0.004,
            ..Params::default()
        });

        // First trapezoid spans from the initial zero error: (10 + 0)/2 * 0.004 * 100 = 2
        assert_eq!(pid.turn_for(74, 64), 2);
        // Second spans two equal errors: 2 + (10 + 10)/2 * 0.004 * 100 = 6
        assert_eq!(pid.turn_for(74, 64), 6);

        // Reset clears the accumulation
        pid.reset();
        assert_eq!(pid.turn_for(74, 64), 2);
    }

    #[test]
    fn test_derivative_responds_to_change() {
        let mut pid = SteeringPid::new(&Params {
            k_p: 0.0,
            k_i: 0.0,
            k_d: 0.004,
            tick_period_s: 0.004,
            ..Params::default()
        });

        // Error steps from 0 to 10: derivative term is 0.004 * 10 / 0.004 = 10
        assert_eq!(pid.turn_for(74, 64), 10);
        // Error unchanged: derivative term is zero
        assert_eq!(pid.turn_for(74, 64), 0);
    }
}
