//! # Maneuver library
//!
//! Blocking, exit-condition-driven motion primitives. Each maneuver owns the foreground thread
//! until its exit condition holds: once per tick it waits for the clock, samples the monitor,
//! evaluates its exit condition and issues at most one drive command. On the exit condition the
//! power is ramped down to zero (at the configured maneuver ramp rate) before the maneuver
//! returns, so control always hands over from a standstill - except for
//! [`drive_until_tilt`], which by design returns with the motors still running so the caller
//! can chain straight into the next command while the robot crests an edge.
//!
//! Maneuvers must not be nested or called concurrently; there is exactly one foreground control
//! sequence.
//!
//! Argument combinations whose signs are inconsistent (e.g. forward power with a negative
//! distance target) are caller logic bugs. They are reported as [`MnvrError`] values before any
//! motor command is issued - silently clamping them would mask the bug, and killing the process
//! would take the motors down with it.
//!
//! None of the exit-condition loops carries a timeout by default: a maneuver whose exit
//! condition never fires loops forever. Deployments needing bounded execution pass a tick
//! budget, which turns a missed exit condition into [`MnvrError::TickBudgetExhausted`].

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

// External
use log::debug;
use thiserror::Error;

// Internal
use crate::drive_ctrl::DriveCtrl;
use crate::eqpt::{ColorBand, Eqpt};
use crate::monitor::Monitor;

// ------------------------------------------------------------------------------------------------
// ENUMERATIONS
// ------------------------------------------------------------------------------------------------

/// Possible errors from a maneuver. All of them are usage errors: the maneuver detected an
/// argument combination (or a budget exhaustion) that means the calling logic is wrong, and
/// issued no further motor commands.
#[derive(Debug, Error)]
pub enum MnvrError {
    #[error(
        "drive_distance requires power and distance of the same sign \
         (got power {power}, distance {distance_mm} mm)"
    )]
    DistanceSignMismatch { power: i8, distance_mm: f64 },

    #[error(
        "turn_to_heading requires nonzero power and a turn matching the sign of the heading \
         delta (got power {power}, turn {turn}, heading delta {heading_delta_deg} deg)"
    )]
    HeadingSignMismatch {
        power: i8,
        turn: i16,
        heading_delta_deg: f64,
    },

    #[error("drive_until_obstacle requires forward power (got power {power})")]
    NonForwardPower { power: i8 },

    #[error("tick budget of {budget} ticks exhausted before the exit condition was met")]
    TickBudgetExhausted { budget: u32 },
}

// ------------------------------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Drive until the cumulative distance has changed by `distance_mm` relative to entry, then ramp
/// to a stop.
///
/// Forward travel needs positive power and a positive distance, reverse travel negative power
/// and a negative distance; any other combination is a usage error.
pub fn drive_distance<E: Eqpt>(
    eqpt: &mut E,
    monitor: &mut Monitor,
    drive: &mut DriveCtrl,
    power: i8,
    turn: i16,
    distance_mm: f64,
    tick_budget: Option<u32>,
) -> Result<(), MnvrError> {
    let forward = power > 0 && distance_mm > 0.0;
    let reverse = power < 0 && distance_mm < 0.0;
    if !forward && !reverse {
        return Err(MnvrError::DistanceSignMismatch { power, distance_mm });
    }

    let rate = drive.params().mnvr_ramp_rate;
    let ref_distance_mm = monitor.distance_mm();
    let mut ticks = 0u32;

    debug!(
        "drive_distance: power {}, turn {}, target {} mm",
        power, turn, distance_mm
    );

    loop {
        eqpt.wait_tick();
        monitor.sample(eqpt);

        let travelled = monitor.distance_mm() - ref_distance_mm;
        let reached = if forward {
            travelled >= distance_mm
        } else {
            travelled <= distance_mm
        };

        if reached {
            // Decelerate, returning only once the ramp has fully zeroed the power
            drive.set_output_ramped(eqpt, 0, turn, rate);
            if drive.last_power() == 0 {
                return Ok(());
            }
        } else {
            drive.set_output_ramped(eqpt, power, turn, rate);
        }

        ticks += 1;
        check_budget(ticks, tick_budget)?;
    }
}

/// Turn until the heading has changed by `heading_delta_deg` relative to entry, then ramp to a
/// stop.
///
/// A right turn needs positive turn and a positive heading delta, a left turn negative turn and
/// a negative delta; power must be nonzero. Any other combination is a usage error.
pub fn turn_to_heading<E: Eqpt>(
    eqpt: &mut E,
    monitor: &mut Monitor,
    drive: &mut DriveCtrl,
    power: i8,
    turn: i16,
    heading_delta_deg: f64,
    tick_budget: Option<u32>,
) -> Result<(), MnvrError> {
    let right = power != 0 && turn > 0 && heading_delta_deg > 0.0;
    let left = power != 0 && turn < 0 && heading_delta_deg < 0.0;
    if !right && !left {
        return Err(MnvrError::HeadingSignMismatch {
            power,
            turn,
            heading_delta_deg,
        });
    }

    let rate = drive.params().mnvr_ramp_rate;
    let ref_heading_deg = monitor.heading_deg();
    let mut ticks = 0u32;

    debug!(
        "turn_to_heading: power {}, turn {}, target {} deg",
        power, turn, heading_delta_deg
    );

    loop {
        eqpt.wait_tick();
        monitor.sample(eqpt);

        let turned = monitor.heading_deg() - ref_heading_deg;
        let reached = if right {
            turned >= heading_delta_deg
        } else {
            turned <= heading_delta_deg
        };

        if reached {
            drive.set_output_ramped(eqpt, 0, turn, rate);
            if drive.last_power() == 0 {
                return Ok(());
            }
        } else {
            drive.set_output_ramped(eqpt, power, turn, rate);
        }

        ticks += 1;
        check_budget(ticks, tick_budget)?;
    }
}

/// Drive forward until the range sensor reads at or below `trigger_cm`, then ramp to a stop.
///
/// If `max_distance_mm` is nonzero the maneuver also exits once that much distance has been
/// covered, whichever comes first. Only forward power is valid.
pub fn drive_until_obstacle<E: Eqpt>(
    eqpt: &mut E,
    monitor: &mut Monitor,
    drive: &mut DriveCtrl,
    power: i8,
    turn: i16,
    trigger_cm: i16,
    max_distance_mm: f64,
    tick_budget: Option<u32>,
) -> Result<(), MnvrError> {
    if power <= 0 {
        return Err(MnvrError::NonForwardPower { power });
    }

    let rate = drive.params().mnvr_ramp_rate;
    let ref_distance_mm = monitor.distance_mm();
    let mut ticks = 0u32;

    debug!(
        "drive_until_obstacle: power {}, turn {}, trigger {} cm, cap {} mm",
        power, turn, trigger_cm, max_distance_mm
    );

    loop {
        eqpt.wait_tick();
        monitor.sample(eqpt);

        let obstacle = monitor.snapshot().obstacle_cm <= trigger_cm;
        let capped = max_distance_mm != 0.0
            && monitor.distance_mm() - ref_distance_mm >= max_distance_mm;

        if obstacle || capped {
            drive.set_output_ramped(eqpt, 0, turn, rate);
            if drive.last_power() == 0 {
                return Ok(());
            }
        } else {
            drive.set_output_ramped(eqpt, power, turn, rate);
        }

        ticks += 1;
        check_budget(ticks, tick_budget)?;
    }
}

/// Drive until the inclination sensor magnitude reaches `tilt_deg`.
///
/// Used to detect the edge of the slalom board: the robot drives with the given command until
/// the body pitches. Unlike the other maneuvers this one returns with the motors still running,
/// so the caller can carry momentum over the edge.
pub fn drive_until_tilt<E: Eqpt>(
    eqpt: &mut E,
    monitor: &mut Monitor,
    drive: &mut DriveCtrl,
    power: i8,
    turn: i16,
    tilt_deg: i16,
    tick_budget: Option<u32>,
) -> Result<(), MnvrError> {
    let mut ticks = 0u32;

    debug!(
        "drive_until_tilt: power {}, turn {}, trigger {} deg",
        power, turn, tilt_deg
    );

    loop {
        eqpt.wait_tick();
        monitor.sample(eqpt);

        if monitor.snapshot().tilt_deg.abs() >= tilt_deg {
            return Ok(());
        }

        drive.set_output(eqpt, power, turn);

        ticks += 1;
        check_budget(ticks, tick_budget)?;
    }
}

/// Stop as soon as the colour sensor reading falls inside `band`.
///
/// In blocking mode the colour sensor is polled once per tick until the band matches, then a
/// hard stop is issued. In non-blocking mode the current snapshot is checked exactly once -
/// callers re-invoke every tick themselves. Returns true if the stop was issued.
pub fn stop_on_line<E: Eqpt>(
    eqpt: &mut E,
    monitor: &mut Monitor,
    drive: &mut DriveCtrl,
    band: &ColorBand,
    blocking: bool,
) -> bool {
    loop {
        if band.matches(&monitor.snapshot().rgb) {
            drive.set_output(eqpt, 0, 0);
            return true;
        }

        if !blocking {
            return false;
        }

        eqpt.wait_tick();
        monitor.sample(eqpt);
    }
}

/// Hold for the given number of ticks, keeping the monitor sampled.
///
/// Issues no motor commands: whatever the wheels were last told carries on.
pub fn dwell<E: Eqpt>(eqpt: &mut E, monitor: &mut Monitor, ticks: u32) {
    for _ in 0..ticks {
        eqpt.wait_tick();
        monitor.sample(eqpt);
    }
}

// ------------------------------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ------------------------------------------------------------------------------------------------

fn check_budget(ticks: u32, tick_budget: Option<u32>) -> Result<(), MnvrError> {
    match tick_budget {
        Some(budget) if ticks >= budget => Err(MnvrError::TickBudgetExhausted { budget }),
        _ => Ok(()),
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use crate::drive_ctrl::Params;
    use crate::eqpt::sim::{SimConfig, SimEqpt, SimEvent};
    use crate::eqpt::RgbRaw;
    use crate::loc::LocParams;

    fn rig() -> (SimEqpt, Monitor, DriveCtrl) {
        rig_with_events(Vec::new())
    }

    fn rig_with_events(events: Vec<SimEvent>) -> (SimEqpt, Monitor, DriveCtrl) {
        let mut config = SimConfig::default();
        config.event = events;
        let sim = SimEqpt::new(config);
        let mut monitor = Monitor::new(&LocParams::default());
        monitor.reset(&sim);
        (sim, monitor, DriveCtrl::new(Params::default()))
    }

    #[test]
    fn test_drive_distance_sign_mismatch_is_usage_error() {
        let (mut sim, mut monitor, mut drive) = rig();

        let result = drive_distance(&mut sim, &mut monitor, &mut drive, 10, 0, -50.0, None);

        assert!(matches!(
            result,
            Err(MnvrError::DistanceSignMismatch {
                power: 10,
                ..
            })
        ));
        // No motor command was issued and no time passed
        assert_eq!(sim.wheel_power(), (0, 0));
        assert_eq!(sim.ticks(), 0);
    }

    #[test]
    fn test_drive_distance_scripted_1000mm() {
        let (mut sim, mut monitor, mut drive) = rig();

        drive_distance(&mut sim, &mut monitor, &mut drive, 50, 0, 1000.0, Some(20_000))
            .unwrap();
        let first_run_ticks = sim.ticks();

        // The target is reached or passed, and the robot is left fully stopped
        assert!(monitor.distance_mm() >= 1000.0);
        assert_eq!(drive.last_power(), 0);

        // The same scripted scenario consumes a deterministic number of ticks
        let (mut sim2, mut monitor2, mut drive2) = rig();
        drive_distance(&mut sim2, &mut monitor2, &mut drive2, 50, 0, 1000.0, Some(20_000))
            .unwrap();
        assert_eq!(sim2.ticks(), first_run_ticks);
    }

    #[test]
    fn test_drive_distance_reverse() {
        let (mut sim, mut monitor, mut drive) = rig();

        drive_distance(&mut sim, &mut monitor, &mut drive, -20, 0, -200.0, Some(50_000))
            .unwrap();

        assert!(monitor.distance_mm() <= -200.0);
        assert_eq!(drive.last_power(), 0);
    }

    #[test]
    fn test_turn_to_heading_right() {
        let (mut sim, mut monitor, mut drive) = rig();

        turn_to_heading(&mut sim, &mut monitor, &mut drive, 20, 200, 90.0, Some(50_000))
            .unwrap();

        assert!(monitor.heading_deg() >= 90.0);
        assert_eq!(drive.last_power(), 0);
        // A spin on the spot covers no net distance
        assert!(monitor.distance_mm().abs() < 1.0);
    }

    #[test]
    fn test_turn_to_heading_sign_mismatch_is_usage_error() {
        let (mut sim, mut monitor, mut drive) = rig();

        // Right turn command with a left heading target
        let result =
            turn_to_heading(&mut sim, &mut monitor, &mut drive, 20, 200, -90.0, None);
        assert!(matches!(result, Err(MnvrError::HeadingSignMismatch { .. })));

        // Zero power can never reach the target
        let result = turn_to_heading(&mut sim, &mut monitor, &mut drive, 0, 200, 90.0, None);
        assert!(matches!(result, Err(MnvrError::HeadingSignMismatch { .. })));

        assert_eq!(sim.ticks(), 0);
    }

    #[test]
    fn test_drive_until_obstacle_trigger() {
        // An obstacle appears at 300 mm of travel
        let (mut sim, mut monitor, mut drive) = rig_with_events(vec![SimEvent {
            at_mm: 300.0,
            rgb: None,
            obstacle_cm: Some(10),
            tilt_deg: None,
        }]);

        drive_until_obstacle(
            &mut sim,
            &mut monitor,
            &mut drive,
            30,
            0,
            15,
            0.0,
            Some(50_000),
        )
        .unwrap();

        // Stopped at the obstacle, not far past the scripted mark
        assert_eq!(drive.last_power(), 0);
        assert!(monitor.distance_mm() >= 300.0);
    }

    #[test]
    fn test_drive_until_obstacle_distance_cap() {
        let (mut sim, mut monitor, mut drive) = rig();

        // No obstacle ever: the distance cap is the exit
        drive_until_obstacle(
            &mut sim,
            &mut monitor,
            &mut drive,
            30,
            0,
            15,
            250.0,
            Some(50_000),
        )
        .unwrap();

        assert!(monitor.distance_mm() >= 250.0);
        assert_eq!(drive.last_power(), 0);
    }

    #[test]
    fn test_drive_until_obstacle_rejects_reverse() {
        let (mut sim, mut monitor, mut drive) = rig();

        let result = drive_until_obstacle(
            &mut sim,
            &mut monitor,
            &mut drive,
            -10,
            0,
            15,
            100.0,
            None,
        );

        assert!(matches!(
            result,
            Err(MnvrError::NonForwardPower { power: -10 })
        ));
        assert_eq!(sim.ticks(), 0);
    }

    #[test]
    fn test_tick_budget_exhaustion() {
        let (mut sim, mut monitor, mut drive) = rig();

        // An exit condition that can never fire within the budget
        let result = drive_distance(
            &mut sim,
            &mut monitor,
            &mut drive,
            1,
            0,
            1_000_000.0,
            Some(100),
        );

        assert!(matches!(
            result,
            Err(MnvrError::TickBudgetExhausted { budget: 100 })
        ));
        assert_eq!(sim.ticks(), 100);
    }

    #[test]
    fn test_stop_on_line() {
        let (mut sim, mut monitor, mut drive) = rig();

        let black = ColorBand {
            r_max: Some(60),
            g_max: Some(90),
            b_max: Some(90),
            ..Default::default()
        };

        // Non-blocking: white floor, single check, no stop
        drive.set_output(&mut sim, 20, 0);
        assert!(!stop_on_line(&mut sim, &mut monitor, &mut drive, &black, false));
        assert!(!sim.is_stopped());

        // The line appears: non-blocking check stops immediately
        sim.set_rgb(RgbRaw { r: 30, g: 40, b: 40 });
        sim.wait_tick();
        monitor.sample(&sim);
        assert!(stop_on_line(&mut sim, &mut monitor, &mut drive, &black, false));
        assert!(sim.is_stopped());
    }

    #[test]
    fn test_stop_on_line_blocking() {
        // The floor turns black after 100 mm of travel
        let (mut sim, mut monitor, mut drive) = rig_with_events(vec![SimEvent {
            at_mm: 100.0,
            rgb: Some([30, 40, 40]),
            obstacle_cm: None,
            tilt_deg: None,
        }]);

        let black = ColorBand {
            r_max: Some(60),
            g_max: Some(90),
            b_max: Some(90),
            ..Default::default()
        };

        drive.set_output(&mut sim, 30, 0);
        assert!(stop_on_line(&mut sim, &mut monitor, &mut drive, &black, true));
        assert!(sim.is_stopped());
        assert!(monitor.distance_mm() >= 100.0);
    }

    #[test]
    fn test_dwell_keeps_sampling() {
        let (mut sim, mut monitor, _) = rig();

        dwell(&mut sim, &mut monitor, 50);

        assert_eq!(sim.ticks(), 50);
        assert_eq!(monitor.ticks(), 50);
    }

    #[test]
    fn test_drive_until_tilt_leaves_motors_running() {
        // The board edge pitches the robot at 200 mm
        let (mut sim, mut monitor, mut drive) = rig_with_events(vec![SimEvent {
            at_mm: 200.0,
            rgb: None,
            obstacle_cm: None,
            tilt_deg: Some(-5),
        }]);

        drive_until_tilt(&mut sim, &mut monitor, &mut drive, 30, 15, 4, Some(50_000))
            .unwrap();

        // The maneuver exits on tilt with the last command still applied
        assert_eq!(drive.last_power(), 30);
        assert!(!sim.is_stopped());
    }
}
