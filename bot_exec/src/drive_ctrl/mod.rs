//! # Drive control module
//!
//! Drive control converts a `(power, turn)` command into individual wheel powers and shapes the
//! command stream over time: the steering PID produces turn demands from the colour sensor, and
//! the per-axis ramps rate-limit power changes so the motors never see a step.
//!
//! ## Sign convention
//!
//! One convention holds end-to-end, from segment logic through the maneuvers down to the wheel
//! mapping:
//!
//! - `power > 0` drives forward.
//! - `turn > 0` turns **right**: the inner (right) wheel's power is reduced by
//!   `turn * power / 100`. `turn = 100` pivots about the right wheel, `turn = 200` spins on the
//!   spot.
//! - `turn < 0` turns left, reducing the left wheel symmetrically.
//! - Heading (see the localisation module) is right-turn positive, so a positive turn command
//!   produces a growing heading.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod cmd;
mod params;
mod pid;
mod ramp;
mod state;

// ---------------------------------------------------------------------------
// EXPORTS
// ---------------------------------------------------------------------------

pub use cmd::{DriveCmd, WheelDems};
pub use params::Params;
pub use pid::SteeringPid;
pub use ramp::Ramp;
pub use state::DriveCtrl;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Lowest legal power command.
pub const POWER_MIN: i8 = -100;

/// Highest legal power command.
pub const POWER_MAX: i8 = 100;

/// Lowest legal turn command.
pub const TURN_MIN: i16 = -200;

/// Highest legal turn command.
pub const TURN_MAX: i16 = 200;
