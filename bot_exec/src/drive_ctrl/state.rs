//! Implementations for the DriveCtrl state structure

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::trace;

// Internal
use crate::eqpt::Eqpt;

use super::{DriveCmd, Params, Ramp, SteeringPid, WheelDems};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Drive control state.
///
/// Owns the steering PID and the per-axis ramp accumulators, and remembers the last issued
/// command so the ramps always step from reality and telemetry can report what the motors were
/// told. One instance serves the whole run; `reset` hands it cleanly from one segment to the
/// next.
pub struct DriveCtrl {
    params: Params,

    pid: SteeringPid,

    power_ramp: Ramp,
    turn_ramp: Ramp,

    /// Power of the last issued command.
    last_power: i8,

    /// Turn of the last issued command.
    last_turn: i16,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl DriveCtrl {
    /// Create a new drive control instance from the given parameters.
    pub fn new(params: Params) -> Self {
        let pid = SteeringPid::new(&params);

        Self {
            params,
            pid,
            power_ramp: Ramp::default(),
            turn_ramp: Ramp::default(),
            last_power: 0,
            last_turn: 0,
        }
    }

    /// Reset the PID state and both ramp accumulators (segment entry).
    ///
    /// The last issued command is kept - it reflects what the motors are actually doing, and the
    /// ramps resynchronise against it on their next step.
    pub fn reset(&mut self) {
        self.pid.reset();
        self.power_ramp.reset();
        self.turn_ramp.reset();
    }

    /// The drive control parameters.
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Issue a command directly to the wheels.
    ///
    /// Inputs are clamped to their legal ranges. A zero command actively stops both wheels.
    pub fn set_output<E: Eqpt>(&mut self, eqpt: &mut E, power: i8, turn: i16) {
        let cmd = DriveCmd::clamped(power, turn);

        self.last_power = cmd.power;
        self.last_turn = cmd.turn;

        match cmd.wheel_dems() {
            WheelDems::Power { left, right } => {
                trace!("Wheel dems: left {}, right {}", left, right);
                eqpt.set_wheel_power(left, right);
            }
            WheelDems::Stop => {
                trace!("Wheel dems: active stop");
                eqpt.stop_wheels();
            }
        }
    }

    /// Issue a command with the power shaped by the power ramp; turn is applied unramped.
    pub fn set_output_ramped<E: Eqpt>(&mut self, eqpt: &mut E, power: i8, turn: i16, rate: f64) {
        let target = DriveCmd::clamped(power, turn);

        let ramped = self
            .power_ramp
            .advance(self.last_power as i16, target.power as i16, rate) as i8;

        self.set_output(eqpt, ramped, target.turn);
    }

    /// Advance the power-axis ramp from the last issued power toward `target`, without issuing
    /// anything. Segment logic uses this to shape a power value it then issues itself.
    pub fn ramp_power(&mut self, target: i8, rate: f64) -> i8 {
        self.power_ramp
            .advance(self.last_power as i16, target as i16, rate) as i8
    }

    /// Advance the turn-axis ramp from the last issued turn toward `target`, without issuing
    /// anything. Segment logic uses this to shape turn demands it then issues itself.
    pub fn ramp_turn(&mut self, target: i16, rate: f64) -> i16 {
        self.turn_ramp.advance(self.last_turn, target, rate)
    }

    /// Get the steering turn demand for a colour sensor reading against a target value.
    pub fn steering_turn(&mut self, sensor_val: u16, target_val: u16) -> i16 {
        self.pid.turn_for(sensor_val, target_val)
    }

    /// Power of the last issued command.
    pub fn last_power(&self) -> i8 {
        self.last_power
    }

    /// Turn of the last issued command.
    pub fn last_turn(&self) -> i16 {
        self.last_turn
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
