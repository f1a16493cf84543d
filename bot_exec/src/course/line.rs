//! # Line segment
//!
//! PID line trace from the start gate to the blue boundary ahead of the slalom area. The trace
//! runs at high power, dropping to a slower power whenever the steering demand is large, and a
//! minimum-travel guard stops earlier blue course features from ending the segment. After the
//! boundary is seen the robot decelerates over a fixed run so the slalom segment starts from a
//! manageable speed - the motors are deliberately left running at hand-over.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

// External
use log::info;

// Internal
use util::archive::Archiver;

use crate::drive_ctrl::DriveCtrl;
use crate::eqpt::Eqpt;
use crate::monitor::Monitor;
use crate::tm;

use super::{check_seg_budget, CourseError, CourseParams, SegStatus};

// ------------------------------------------------------------------------------------------------
// ENUMERATIONS
// ------------------------------------------------------------------------------------------------

/// States of the line segment.
#[derive(Debug, Clone, Copy, PartialEq)]
enum LineState {
    /// Pre-trace setup.
    Start,

    /// Tracing the line at speed.
    Move,

    /// Blue boundary seen, decelerating over the hand-over run.
    End,
}

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Line segment state machine.
pub struct LineSeg {
    state: LineState,

    /// Travel at which the blue boundary was seen, millimetres.
    mark_mm: f64,

    /// Power during the deceleration run.
    power: i8,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl LineSeg {
    pub fn new(params: &CourseParams) -> Self {
        Self {
            state: LineState::Start,
            mark_mm: 0.0,
            power: params.line.power_fast,
        }
    }

    /// Run the segment to completion. Blocking segment entry point.
    pub fn run<E: Eqpt>(
        &mut self,
        eqpt: &mut E,
        monitor: &mut Monitor,
        drive: &mut DriveCtrl,
        params: &CourseParams,
        tm_arch: &mut Archiver,
    ) -> Result<(), CourseError> {
        let mut ticks = 0u32;

        loop {
            eqpt.wait_tick();
            monitor.sample(eqpt);
            tm::record(tm_arch, monitor, drive);

            if self.step(eqpt, monitor, drive, params)? == SegStatus::Complete {
                return Ok(());
            }

            ticks += 1;
            check_seg_budget("line", ticks, params.seg_tick_budget)?;
        }
    }

    /// Execute one tick of the state machine.
    fn step<E: Eqpt>(
        &mut self,
        eqpt: &mut E,
        monitor: &mut Monitor,
        drive: &mut DriveCtrl,
        params: &CourseParams,
    ) -> Result<SegStatus, CourseError> {
        let p = &params.line;
        let rgb = monitor.snapshot().rgb;

        match self.state {
            LineState::Start => {
                self.state = LineState::Move;
            }

            LineState::Move => {
                let turn = drive.steering_turn(rgb.r, p.pid_target);

                // Back off the power while steering hard
                if turn.abs() < p.turn_split {
                    drive.set_output_ramped(eqpt, p.power_fast, turn, 0.5);
                } else {
                    drive.set_output_ramped(eqpt, p.power_slow, turn, 0.5);
                }

                if monitor.distance_mm() > p.min_blue_distance_mm
                    && params.bands.blue.matches(&rgb)
                {
                    info!(
                        "Blue boundary detected at {:.0} mm",
                        monitor.distance_mm()
                    );
                    self.mark_mm = monitor.distance_mm();
                    self.state = LineState::End;
                }
            }

            LineState::End => {
                if monitor.distance_mm() < self.mark_mm + p.decel_distance_mm {
                    self.power = drive.ramp_power(p.end_power, 1.0);
                } else {
                    // Hand over at the slower power with the trace still active
                    let turn = drive.steering_turn(rgb.r, p.pid_target);
                    drive.set_output(eqpt, self.power, turn);
                    return Ok(SegStatus::Complete);
                }

                let turn = drive.steering_turn(rgb.r, p.pid_target);
                drive.set_output(eqpt, self.power, turn);
            }
        }

        Ok(SegStatus::Running)
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
    use crate::loc::LocParams;

    #[test]
    fn test_line_segment_end_to_end() {
        // A straight line (the floor reads exactly the PID target, so the steering demand is
        // zero) with the blue boundary 10.6 m out
        let mut config = SimConfig::default();
        config.event = vec![SimEvent {
            at_mm: 10_600.0,
            rgb: Some([70, 90, 130]),
            obstacle_cm: None,
            tilt_deg: None,
        }];
        let mut sim = SimEqpt::new(config);
        sim.set_rgb(crate::eqpt::RgbRaw {
            r: 64,
            g: 80,
            b: 80,
        });

        let mut monitor = Monitor::new(&LocParams::default());
        let mut drive = DriveCtrl::new(Params::default());
        let mut params = CourseParams::default();
        params.seg_tick_budget = Some(50_000);

        monitor.reset(&sim);
        drive.reset();

        let mut seg = LineSeg::new(&params);
        let mut arch = Archiver::default();
        seg.run(&mut sim, &mut monitor, &mut drive, &params, &mut arch)
            .unwrap();

        // The segment completes past the boundary plus the deceleration run, decelerated to the
        // hand-over power and with the motors still running
        assert!(monitor.distance_mm() >= 10_600.0 + params.line.decel_distance_mm);
        assert_eq!(drive.last_power(), params.line.end_power);
        assert!(!sim.is_stopped());
    }

    #[test]
    fn test_early_blue_is_ignored() {
        // A blue patch at 500 mm, well before the minimum-travel guard, then the real boundary
        let mut config = SimConfig::default();
        config.event = vec![
            SimEvent {
                at_mm: 500.0,
                rgb: Some([70, 90, 130]),
                obstacle_cm: None,
                tilt_deg: None,
            },
            SimEvent {
                at_mm: 700.0,
                rgb: Some([64, 80, 80]),
                obstacle_cm: None,
                tilt_deg: None,
            },
            SimEvent {
                at_mm: 10_600.0,
                rgb: Some([70, 90, 130]),
                obstacle_cm: None,
                tilt_deg: None,
            },
        ];
        let mut sim = SimEqpt::new(config);
        sim.set_rgb(crate::eqpt::RgbRaw {
            r: 64,
            g: 80,
            b: 80,
        });

        let mut monitor = Monitor::new(&LocParams::default());
        let mut drive = DriveCtrl::new(Params::default());
        let mut params = CourseParams::default();
        params.seg_tick_budget = Some(50_000);

        monitor.reset(&sim);
        drive.reset();

        let mut seg = LineSeg::new(&params);
        let mut arch = Archiver::default();
        seg.run(&mut sim, &mut monitor, &mut drive, &params, &mut arch)
            .unwrap();

        // The early patch did not end the segment: completion happened past the real boundary
        assert!(monitor.distance_mm() > 10_600.0);
    }
}
