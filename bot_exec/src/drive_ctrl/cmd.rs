//! Drive commands and their mapping to wheel demands

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use super::{POWER_MAX, POWER_MIN, TURN_MAX, TURN_MIN};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A body-level drive command.
///
/// See the module documentation for the sign convention. Out-of-range values are clamped on
/// construction, never rejected.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DriveCmd {
    /// Drive power, [-100, 100], forward positive.
    pub power: i8,

    /// Steering asymmetry, [-200, 200], right turn positive. The magnitude is the percentage
    /// reduction applied to the inner wheel.
    pub turn: i16,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Wheel-level demands the equipment boundary must execute.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WheelDems {
    /// Independent wheel powers.
    Power { left: i8, right: i8 },

    /// An active stop of both wheels (brake, not coast).
    Stop,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl DriveCmd {
    /// Build a command, clamping both values to their legal ranges.
    pub fn clamped(power: i8, turn: i16) -> Self {
        Self {
            power: power.max(POWER_MIN).min(POWER_MAX),
            turn: turn.max(TURN_MIN).min(TURN_MAX),
        }
    }

    /// Map this command onto per-wheel demands.
    ///
    /// With zero turn both wheels get `power` directly; a zero command is an active stop. With
    /// nonzero turn the inner wheel's power is reduced by `turn * power / 100`, which takes it
    /// through zero and into reverse for turn magnitudes above 100.
    pub fn wheel_dems(&self) -> WheelDems {
        let power = self.power as i32;
        let turn = self.turn as i32;

        if power == 0 && turn == 0 {
            return WheelDems::Stop;
        }

        let (left, right) = if turn > 0 {
            // Right turn: right wheel is inner
            (power, power - turn * power / 100)
        } else if turn < 0 {
            // Left turn: left wheel is inner (turn is negative, so this subtracts)
            (power + turn * power / 100, power)
        } else {
            (power, power)
        };

        WheelDems::Power {
            left: left.max(POWER_MIN as i32).min(POWER_MAX as i32) as i8,
            right: right.max(POWER_MIN as i32).min(POWER_MAX as i32) as i8,
        }
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_clamping() {
        let cmd = DriveCmd::clamped(120, 250);
        assert_eq!(cmd.power, 100);
        assert_eq!(cmd.turn, 200);

        let cmd = DriveCmd::clamped(-120, -250);
        assert_eq!(cmd.power, -100);
        assert_eq!(cmd.turn, -200);

        // In-range values are untouched
        let cmd = DriveCmd::clamped(42, -13);
        assert_eq!(cmd.power, 42);
        assert_eq!(cmd.turn, -13);
    }

    #[test]
    fn test_zero_command_is_active_stop() {
        assert_eq!(DriveCmd::clamped(0, 0).wheel_dems(), WheelDems::Stop);
    }

    #[test]
    fn test_straight_drive() {
        assert_eq!(
            DriveCmd::clamped(50, 0).wheel_dems(),
            WheelDems::Power {
                left: 50,
                right: 50
            }
        );
    }

    #[test]
    fn test_pivot_turn() {
        // Full power, full single-wheel turn: one side full, the other zero
        assert_eq!(
            DriveCmd::clamped(100, 100).wheel_dems(),
            WheelDems::Power {
                left: 100,
                right: 0
            }
        );
    }

    #[test]
    fn test_spin_on_the_spot() {
        // turn 200 reverses the inner wheel completely
        assert_eq!(
            DriveCmd::clamped(100, 200).wheel_dems(),
            WheelDems::Power {
                left: 100,
                right: -100
            }
        );
        assert_eq!(
            DriveCmd::clamped(100, -200).wheel_dems(),
            WheelDems::Power {
                left: -100,
                right: 100
            }
        );
    }

    #[test]
    fn test_gentle_turn() {
        // turn 50 at power 50 reduces the inner wheel to half power
        assert_eq!(
            DriveCmd::clamped(50, 50).wheel_dems(),
            WheelDems::Power {
                left: 50,
                right: 25
            }
        );
        assert_eq!(
            DriveCmd::clamped(50, -50).wheel_dems(),
            WheelDems::Power {
                left: 25,
                right: 50
            }
        );
    }

    #[test]
    fn test_zero_power_with_turn_is_not_a_stop() {
        // Zero power with a turn demand coasts at zero rather than braking
        assert_eq!(
            DriveCmd::clamped(0, 100).wheel_dems(),
            WheelDems::Power { left: 0, right: 0 }
        );
    }
}
