//! # Block transport segment
//!
//! The final segment carries the block across the open field and parks in the garage. From the
//! slalom hand-over the robot swings onto the field heading with a ramped turn, cruises until
//! the yellow cue (or a distance cap, in case the cue is missed), curves down onto the line,
//! traces it to the red boundary, then runs a long ramped return arc and re-finds the line -
//! black or blue, whichever appears - before creeping up to the garage wall.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

// External
use log::info;

// Internal
use util::archive::Archiver;

use crate::drive_ctrl::DriveCtrl;
use crate::eqpt::Eqpt;
use crate::mnvr;
use crate::monitor::Monitor;
use crate::tm;

use super::{check_seg_budget, CourseError, CourseParams, SegStatus};

// ------------------------------------------------------------------------------------------------
// ENUMERATIONS
// ------------------------------------------------------------------------------------------------

/// States of the block transport segment.
#[derive(Debug, Clone, Copy, PartialEq)]
enum BlockState {
    /// Ramped swing onto the field heading.
    Start,

    /// Straight run until the yellow cue or the distance cap.
    Move,

    /// Curve down onto the line.
    Curve,

    /// Trace the line to the red boundary.
    Line,

    /// Ramped return arc back across the field.
    Return,

    /// Creep up to the garage wall.
    End,
}

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Block transport segment state machine.
pub struct BlockSeg {
    state: BlockState,

    /// Travel reference captured at segment entry, millimetres.
    mark_mm: f64,

    /// Shaped turn command carried between ticks.
    turn: i16,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl BlockSeg {
    pub fn new() -> Self {
        Self {
            state: BlockState::Start,
            mark_mm: 0.0,
            turn: 0,
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
            check_seg_budget("block", ticks, params.seg_tick_budget)?;
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
        let p = &params.block;
        let mb = params.mnvr_tick_budget;
        let rgb = monitor.snapshot().rgb;

        match self.state {
            BlockState::Start => {
                if monitor.heading_deg() < p.swing_heading_deg {
                    // Swing right, shaping both axes
                    self.turn = drive.ramp_turn(100, 1.0);
                    drive.set_output_ramped(eqpt, p.swing_power, self.turn, 0.5);
                } else {
                    // Unwind the turn back to straight
                    self.turn = drive.ramp_turn(0, 1.0);
                    drive.set_output(eqpt, p.cruise_power, self.turn);
                }

                if self.turn == 0 {
                    self.state = BlockState::Move;
                }
            }

            BlockState::Move => {
                if params.bands.yellow.matches(&rgb) {
                    info!("Yellow cue detected at {:.0} mm", monitor.distance_mm());
                    self.state = BlockState::Curve;
                } else if monitor.distance_mm() > self.mark_mm + p.leg_distance_mm {
                    info!("Leg distance cap reached without a yellow cue");
                    self.state = BlockState::Curve;
                }
                // No new command: the cruise from Start carries on
            }

            BlockState::Curve => {
                drive.set_output_ramped(eqpt, p.curve_power, p.curve_turn, 0.1);

                if params.bands.black.matches(&rgb) {
                    drive.set_output(eqpt, 0, 0);
                    mnvr::dwell(eqpt, monitor, 75);
                    mnvr::turn_to_heading(eqpt, monitor, drive, 20, 200, 30.0, mb)?;

                    self.state = BlockState::Line;
                }
            }

            BlockState::Line => {
                // This stretch traces the opposite edge, hence the inverted demand
                let turn = drive.steering_turn(rgb.r, p.pid_target);
                drive.set_output_ramped(eqpt, p.trace_power, -turn, 0.5);

                if params.bands.red.matches(&rgb) {
                    info!("Red boundary detected at {:.0} mm", monitor.distance_mm());
                    self.turn = 0;
                    self.state = BlockState::Return;
                }
            }

            BlockState::Return => {
                if monitor.distance_mm() < self.mark_mm + p.return_distance_mm {
                    if monitor.heading_deg() < p.return_heading_deg {
                        self.turn = drive.ramp_turn(50, 0.5);
                        drive.set_output_ramped(eqpt, p.cruise_power, self.turn, 0.7);
                    } else {
                        self.turn = drive.ramp_turn(0, 0.5);
                        drive.set_output(eqpt, p.cruise_power, self.turn);
                    }
                } else {
                    // Past the arc: slow right drift until a line appears
                    drive.set_output_ramped(eqpt, 10, 10, 0.2);

                    if params.bands.black.matches(&rgb) || params.bands.blue.matches(&rgb) {
                        drive.set_output(eqpt, 0, 0);
                        mnvr::dwell(eqpt, monitor, 75);
                        mnvr::turn_to_heading(eqpt, monitor, drive, 20, 200, 40.0, mb)?;

                        self.state = BlockState::End;
                    }
                }
            }

            BlockState::End => {
                drive.set_output(eqpt, p.trace_power, 0);

                if monitor.snapshot().obstacle_cm <= p.garage_stop_cm {
                    drive.set_output(eqpt, 0, 0);
                    return Ok(SegStatus::Complete);
                }
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
    use crate::eqpt::sim::{SimConfig, SimEqpt};
    use crate::eqpt::RgbRaw;
    use crate::loc::LocParams;

    fn rig() -> (SimEqpt, Monitor, DriveCtrl, CourseParams) {
        let sim = SimEqpt::new(SimConfig::default());
        let mut monitor = Monitor::new(&LocParams::default());
        monitor.reset(&sim);
        let mut params = CourseParams::default();
        params.seg_tick_budget = Some(200_000);
        params.mnvr_tick_budget = Some(200_000);
        (sim, monitor, DriveCtrl::new(Params::default()), params)
    }

    /// Advance the rig one tick and step the segment once.
    fn tick(
        seg: &mut BlockSeg,
        sim: &mut SimEqpt,
        monitor: &mut Monitor,
        drive: &mut DriveCtrl,
        params: &CourseParams,
    ) -> SegStatus {
        sim.wait_tick();
        monitor.sample(sim);
        seg.step(sim, monitor, drive, params).unwrap()
    }

    #[test]
    fn test_start_swings_to_heading_then_unwinds() {
        let (mut sim, mut monitor, mut drive, params) = rig();
        let mut seg = BlockSeg::new();

        let mut ticks = 0;
        while seg.state == BlockState::Start {
            tick(&mut seg, &mut sim, &mut monitor, &mut drive, &params);
            ticks += 1;
            assert!(ticks < 20_000, "entry swing never completed");
        }

        // The swing passed the target heading and unwound the turn to straight
        assert_eq!(seg.state, BlockState::Move);
        assert!(monitor.heading_deg() >= params.block.swing_heading_deg);
        assert_eq!(drive.last_turn(), 0);
    }

    #[test]
    fn test_move_transitions_on_yellow() {
        let (mut sim, mut monitor, mut drive, params) = rig();
        let mut seg = BlockSeg::new();
        seg.state = BlockState::Move;

        // Plain floor: keep cruising
        assert_eq!(
            tick(&mut seg, &mut sim, &mut monitor, &mut drive, &params),
            SegStatus::Running
        );
        assert_eq!(seg.state, BlockState::Move);

        // Yellow cue fires the transition
        sim.set_rgb(RgbRaw {
            r: 100,
            g: 100,
            b: 20,
        });
        tick(&mut seg, &mut sim, &mut monitor, &mut drive, &params);
        assert_eq!(seg.state, BlockState::Curve);
    }

    #[test]
    fn test_move_transitions_on_distance_cap() {
        let (mut sim, mut monitor, mut drive, params) = rig();
        let mut seg = BlockSeg::new();
        seg.state = BlockState::Move;

        // Never show the yellow cue; drive the cap instead
        sim.set_wheel_power(50, 50);
        while monitor.distance_mm() <= params.block.leg_distance_mm {
            sim.wait_tick();
            monitor.sample(&sim);
        }

        tick(&mut seg, &mut sim, &mut monitor, &mut drive, &params);
        assert_eq!(seg.state, BlockState::Curve);
    }

    #[test]
    fn test_curve_locks_onto_black() {
        let (mut sim, mut monitor, mut drive, params) = rig();
        let mut seg = BlockSeg::new();
        seg.state = BlockState::Curve;

        // Open floor: keep curving
        tick(&mut seg, &mut sim, &mut monitor, &mut drive, &params);
        assert_eq!(seg.state, BlockState::Curve);

        // Black line under the sensor: stop, align right, start tracing
        sim.set_rgb(RgbRaw {
            r: 40,
            g: 50,
            b: 50,
        });
        tick(&mut seg, &mut sim, &mut monitor, &mut drive, &params);
        assert_eq!(seg.state, BlockState::Line);
        // The alignment turn ends at a standstill
        assert_eq!(drive.last_power(), 0);
    }

    #[test]
    fn test_line_traces_until_red() {
        let (mut sim, mut monitor, mut drive, params) = rig();
        let mut seg = BlockSeg::new();
        seg.state = BlockState::Line;

        sim.set_rgb(RgbRaw {
            r: 64,
            g: 80,
            b: 80,
        });
        tick(&mut seg, &mut sim, &mut monitor, &mut drive, &params);
        assert_eq!(seg.state, BlockState::Line);

        sim.set_rgb(RgbRaw {
            r: 90,
            g: 30,
            b: 40,
        });
        tick(&mut seg, &mut sim, &mut monitor, &mut drive, &params);
        assert_eq!(seg.state, BlockState::Return);
    }

    #[test]
    fn test_end_parks_at_garage_wall() {
        let (mut sim, mut monitor, mut drive, params) = rig();
        let mut seg = BlockSeg::new();
        seg.state = BlockState::End;

        sim.set_obstacle_cm(40);
        assert_eq!(
            tick(&mut seg, &mut sim, &mut monitor, &mut drive, &params),
            SegStatus::Running
        );
        assert!(!sim.is_stopped());

        sim.set_obstacle_cm(params.block.garage_stop_cm);
        assert_eq!(
            tick(&mut seg, &mut sim, &mut monitor, &mut drive, &params),
            SegStatus::Complete
        );
        assert!(sim.is_stopped());
    }
}
