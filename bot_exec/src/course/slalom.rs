//! # Slalom segment
//!
//! The slalom board sits directly after the line segment: a low platform with a step up, four
//! bottle gates on top, and a step down on the far side. The segment traces up to the step,
//! squares against it, climbs when the inclination sensor confirms the step, threads the first
//! gates with scripted turn/advance/detect chains, then classifies the final bottle layout with
//! the majority-vote range sampler and runs the layout-specific chain. Off the board it stops on
//! the line and traces back to the garage wall - on whichever line edge the layout branch chose.
//!
//! The gate choreography (turn angles, leg lengths, trigger ranges) is tuned against the course
//! geometry and lives in the code like the rest of the transition logic; only the sensor
//! thresholds that depend on the robot build are parameters.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

// External
use log::info;

// Internal
use util::archive::Archiver;

use crate::classify::{self, StraightDetector};
use crate::drive_ctrl::DriveCtrl;
use crate::eqpt::Eqpt;
use crate::mnvr;
use crate::monitor::Monitor;
use crate::tm;

use super::{check_seg_budget, CourseError, CourseParams, SegStatus};

// ------------------------------------------------------------------------------------------------
// ENUMERATIONS
// ------------------------------------------------------------------------------------------------

/// States of the slalom segment.
#[derive(Debug, Clone, Copy, PartialEq)]
enum SlalomState {
    /// Line-trace up to the step and square against it.
    Approach,

    /// Climb the step once the tilt confirms it.
    Climb,

    /// Trace through the first gate, then thread to the second bottle.
    Weave1,

    /// Thread to the third bottle.
    Weave2,

    /// Advance to the last gate and classify the bottle layout.
    Branch,

    /// Layout A: the final bottle sits straight ahead.
    PatternA,

    /// Layout B: the final bottle sits off to the side.
    PatternB,

    /// Trace the line back toward the garage.
    Reacquire,

    /// Wait for the garage wall.
    End,
}

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Slalom segment state machine.
pub struct SlalomSeg {
    state: SlalomState,

    /// Travel reference captured at the last transition, millimetres.
    mark_mm: f64,

    /// Line edge to trace after the board: +1 left edge, -1 right edge.
    edge: i16,

    /// Set once the blue marker has been passed on the way back.
    passed_blue: bool,

    /// Detector for running off the end of the line.
    straight: StraightDetector,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl SlalomSeg {
    pub fn new() -> Self {
        Self {
            state: SlalomState::Approach,
            mark_mm: 0.0,
            edge: 1,
            passed_blue: false,
            straight: StraightDetector::new(),
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
            check_seg_budget("slalom", ticks, params.seg_tick_budget)?;
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
        let p = &params.slalom;
        let mb = params.mnvr_tick_budget;
        let rgb = monitor.snapshot().rgb;

        match self.state {
            SlalomState::Approach => {
                if monitor.distance_mm() < p.approach_distance_mm {
                    let turn = drive.steering_turn(rgb.r, p.pid_target);
                    drive.set_output(eqpt, p.approach_power, turn);
                } else {
                    // Square up against the step, then back off so the climb starts straight
                    drive.set_output(eqpt, 0, 0);
                    mnvr::dwell(eqpt, monitor, 50);

                    drive.set_output(eqpt, -10, 0);
                    mnvr::dwell(eqpt, monitor, 100);

                    drive.set_output(eqpt, 0, 0);
                    self.state = SlalomState::Climb;
                }
            }

            SlalomState::Climb => {
                if monitor.snapshot().tilt_deg.abs() < p.climb_tilt_deg {
                    drive.set_output(eqpt, p.approach_power, 0);
                } else {
                    info!("Step detected, climbing");

                    // Carry the climb over the edge, then settle before the first gate
                    drive.set_output(eqpt, p.approach_power, 0);
                    mnvr::dwell(eqpt, monitor, 100);

                    drive.set_output(eqpt, 0, 0);
                    mnvr::dwell(eqpt, monitor, 50);

                    self.mark_mm = monitor.distance_mm();
                    self.state = SlalomState::Weave1;
                }
            }

            SlalomState::Weave1 => {
                if monitor.snapshot().obstacle_cm <= 16
                    || monitor.distance_mm() < self.mark_mm + 100.0
                {
                    // Trace through the first gate while the bottle is still close
                    let turn = drive.steering_turn(rgb.r, p.gate_pid_target);
                    drive.set_output(eqpt, p.approach_power, turn);
                } else if drive.last_power() != 0 {
                    drive.set_output_ramped(eqpt, 0, 0, 0.1);
                } else {
                    mnvr::turn_to_heading(eqpt, monitor, drive, 5, 200, 40.0, mb)?;
                    mnvr::drive_distance(eqpt, monitor, drive, 10, 0, 105.0, mb)?;
                    mnvr::turn_to_heading(eqpt, monitor, drive, 5, -200, -40.0, mb)?;
                    mnvr::drive_until_obstacle(eqpt, monitor, drive, 10, 0, 3, 0.0, mb)?;

                    self.state = SlalomState::Weave2;
                }
            }

            SlalomState::Weave2 => {
                mnvr::turn_to_heading(eqpt, monitor, drive, 5, -200, -40.0, mb)?;
                mnvr::drive_distance(eqpt, monitor, drive, 10, 0, 175.0, mb)?;
                mnvr::turn_to_heading(eqpt, monitor, drive, 5, 200, 40.0, mb)?;
                mnvr::drive_until_obstacle(eqpt, monitor, drive, 10, 0, 3, 155.0, mb)?;

                self.state = SlalomState::Branch;
            }

            SlalomState::Branch => {
                mnvr::turn_to_heading(eqpt, monitor, drive, 5, 200, 35.0, mb)?;
                mnvr::drive_until_obstacle(eqpt, monitor, drive, 10, 0, 5, 0.0, mb)?;
                mnvr::turn_to_heading(eqpt, monitor, drive, 5, -200, -33.0, mb)?;

                // Let the range sensor settle before sampling it in anger
                mnvr::dwell(eqpt, monitor, 50);

                if classify::obstacle_pattern_present(eqpt, monitor) {
                    info!("Bottle layout A");
                    self.state = SlalomState::PatternA;
                } else {
                    info!("Bottle layout B");
                    self.state = SlalomState::PatternB;
                }
            }

            SlalomState::PatternA => {
                mnvr::drive_until_obstacle(eqpt, monitor, drive, 20, 0, 8, 210.0, mb)?;
                mnvr::turn_to_heading(eqpt, monitor, drive, 5, 200, 45.0, mb)?;

                // Over the far edge of the board, carrying momentum
                mnvr::drive_until_tilt(eqpt, monitor, drive, 30, 15, p.descend_tilt_deg, mb)?;
                mnvr::dwell(eqpt, monitor, 50);

                drive.set_output(eqpt, p.trace_power, 50);
                mnvr::stop_on_line(eqpt, monitor, drive, &params.bands.black, true);
                mnvr::turn_to_heading(eqpt, monitor, drive, 10, -200, -30.0, mb)?;

                self.edge = 1;
                self.straight.reset();
                self.state = SlalomState::Reacquire;
            }

            SlalomState::PatternB => {
                mnvr::drive_until_obstacle(eqpt, monitor, drive, 18, 12, 5, 230.0, mb)?;
                mnvr::turn_to_heading(eqpt, monitor, drive, 5, 200, 60.0, mb)?;
                mnvr::drive_until_obstacle(eqpt, monitor, drive, 10, 0, 5, 0.0, mb)?;
                mnvr::turn_to_heading(eqpt, monitor, drive, 5, 200, 35.0, mb)?;
                mnvr::drive_distance(eqpt, monitor, drive, 10, 0, 100.0, mb)?;

                mnvr::drive_until_tilt(eqpt, monitor, drive, 25, -30, p.descend_tilt_deg, mb)?;
                mnvr::dwell(eqpt, monitor, 50);

                drive.set_output(eqpt, p.trace_power, -50);
                mnvr::stop_on_line(eqpt, monitor, drive, &params.bands.black, true);
                mnvr::turn_to_heading(eqpt, monitor, drive, 10, 200, 50.0, mb)?;

                self.edge = -1;
                self.straight.reset();
                self.state = SlalomState::Reacquire;
            }

            SlalomState::Reacquire => {
                let turn = drive.steering_turn(rgb.r, p.pid_target);
                drive.set_output(eqpt, p.trace_power, turn * self.edge);

                if self.passed_blue && params.bands.black.matches(&rgb) {
                    // Back on the solid line past the blue marker: head for the garage
                    drive.set_output(eqpt, p.trace_power, 0);
                    self.state = SlalomState::End;
                } else if params.bands.blue.matches(&rgb) {
                    self.passed_blue = true;
                } else if self.straight.update(turn) {
                    // Lost the line but going straight: the garage is dead ahead anyway
                    info!("Sustained straight travel, leaving the trace");
                    drive.set_output(eqpt, p.trace_power, 0);
                    self.state = SlalomState::End;
                }
            }

            SlalomState::End => {
                if monitor.snapshot().obstacle_cm < p.garage_stop_cm {
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
