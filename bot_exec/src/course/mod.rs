//! # Course module
//!
//! This module implements one finite state machine per course segment, plus the [`CourseMgr`]
//! dispatcher which runs them in sequence:
//!
//! - `Line` - PID line trace from the start gate to the blue boundary before the slalom.
//! - `Slalom` - climb the board, thread the bottle gates, classify the layout, descend and
//!   re-find the line.
//! - `Block` - swing across the field, trace to the far boundary and return to the garage.
//!
//! Each segment struct owns its own state enum and is stepped once per tick: read the freshest
//! monitor data, evaluate the current state's guards in a fixed order, issue at most one drive
//! command (possibly via a blocking maneuver), and optionally transition. Every tick resolves to
//! exactly one action, even if that action is "keep the current steering". A segment signals
//! completion by returning [`SegStatus::Complete`] from its step, which ends its blocking `run`
//! entry point.
//!
//! Segments own the foreground thread for their whole life. Resetting the monitor, the drive
//! control and any per-segment detectors happens at segment entry, in `CourseMgr::run` - a
//! segment therefore always starts from zero distance, zero heading and clean controller state,
//! while the equipment itself (and the robot's physical momentum) carries over.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

mod block;
mod line;
mod params;
mod slalom;

// ------------------------------------------------------------------------------------------------
// EXPORTS
// ------------------------------------------------------------------------------------------------

pub use block::BlockSeg;
pub use line::LineSeg;
pub use params::{BlockParams, ColorBands, CourseParams, LineParams, SlalomParams};
pub use slalom::SlalomSeg;

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

// External
use log::{error, info};

// Internal
use util::archive::Archiver;

use crate::drive_ctrl::DriveCtrl;
use crate::eqpt::Eqpt;
use crate::mnvr::MnvrError;
use crate::monitor::Monitor;

// ------------------------------------------------------------------------------------------------
// ENUMERATIONS
// ------------------------------------------------------------------------------------------------

/// Status returned by one step of a segment state machine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SegStatus {
    /// The segment is still running; step it again next tick.
    Running,

    /// The segment's terminal condition has been met.
    Complete,
}

/// Possible errors during course execution.
#[derive(Debug, thiserror::Error)]
pub enum CourseError {
    #[error("maneuver failed: {0}")]
    Mnvr(#[from] MnvrError),

    #[error("segment '{segment}' exceeded its tick budget of {budget} ticks")]
    SegTickBudgetExhausted {
        segment: &'static str,
        budget: u32,
    },
}

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// The course dispatcher.
///
/// Runs the segments strictly in sequence, handing each one a freshly reset monitor and drive
/// control, and stops the motors once the course is over - whether it completed or aborted.
pub struct CourseMgr {
    params: CourseParams,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl CourseMgr {
    /// Create a new course manager with the given parameters.
    pub fn new(params: CourseParams) -> Self {
        Self { params }
    }

    /// The course parameters.
    pub fn params(&self) -> &CourseParams {
        &self.params
    }

    /// Run the full course to completion.
    ///
    /// Blocking: returns once the final segment has completed, or with the first error. The
    /// motors are actively stopped on the way out in both cases.
    pub fn run<E: Eqpt>(
        &self,
        eqpt: &mut E,
        monitor: &mut Monitor,
        drive: &mut DriveCtrl,
        tm_arch: &mut Archiver,
    ) -> Result<(), CourseError> {
        let result = self.run_segments(eqpt, monitor, drive, tm_arch);

        // Whatever happened, the course ends at a standstill
        eqpt.stop_wheels();

        match result {
            Ok(()) => info!("Course complete"),
            Err(ref e) => error!("Course aborted: {}", e),
        }

        result
    }

    fn run_segments<E: Eqpt>(
        &self,
        eqpt: &mut E,
        monitor: &mut Monitor,
        drive: &mut DriveCtrl,
        tm_arch: &mut Archiver,
    ) -> Result<(), CourseError> {
        info!("Course start: line segment");
        monitor.reset(eqpt);
        drive.reset();
        LineSeg::new(&self.params).run(eqpt, monitor, drive, &self.params, tm_arch)?;

        info!("Line segment complete, entering slalom segment");
        monitor.reset(eqpt);
        drive.reset();
        SlalomSeg::new().run(eqpt, monitor, drive, &self.params, tm_arch)?;

        info!("Slalom segment complete, entering block transport segment");
        monitor.reset(eqpt);
        drive.reset();
        BlockSeg::new().run(eqpt, monitor, drive, &self.params, tm_arch)?;

        Ok(())
    }
}

// ------------------------------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Check a segment loop's tick count against the optional budget.
pub(crate) fn check_seg_budget(
    segment: &'static str,
    ticks: u32,
    budget: Option<u32>,
) -> Result<(), CourseError> {
    match budget {
        Some(b) if ticks >= b => Err(CourseError::SegTickBudgetExhausted { segment, budget: b }),
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
    use crate::eqpt::sim::{SimConfig, SimEqpt};
    use crate::loc::LocParams;

    #[test]
    fn test_course_aborts_on_budget_and_stops_motors() {
        let mut sim = SimEqpt::new(SimConfig::default());
        let mut monitor = Monitor::new(&LocParams::default());
        let mut drive = DriveCtrl::new(Params::default());
        monitor.reset(&sim);

        // An empty course: no boundary marker ever appears, so the first segment can only end
        // by exhausting its ceiling. The dispatcher must surface the error with the motors
        // stopped rather than hang.
        let mut params = CourseParams::default();
        params.seg_tick_budget = Some(500);
        params.mnvr_tick_budget = Some(500);

        let mgr = CourseMgr::new(params);
        let mut arch = Archiver::default();

        let result = mgr.run(&mut sim, &mut monitor, &mut drive, &mut arch);

        assert!(matches!(
            result,
            Err(CourseError::SegTickBudgetExhausted {
                segment: "line",
                budget: 500
            })
        ));
        assert!(sim.is_stopped());
    }
}
