//! # Sampling classifiers
//!
//! Decision rules that smooth noisy signals by sampling them repeatedly instead of trusting a
//! single reading: the obstacle pattern classifier takes a fixed block of range samples and
//! votes, the straight-travel detector averages a rolling window of steering commands.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use log::debug;

use crate::eqpt::Eqpt;
use crate::monitor::Monitor;

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Number of range samples taken by the obstacle pattern classifier.
pub const OBSTACLE_SAMPLE_COUNT: u32 = 100;

/// Range at or below which a sample counts as an obstacle detection.
///
/// Units: centimetres
pub const OBSTACLE_DETECT_CM: i16 = 25;

/// Size of the straight-travel detector's rolling window.
pub const STRAIGHT_WINDOW: usize = 30;

/// Average absolute turn below which travel counts as straight.
pub const STRAIGHT_TURN_LIMIT: i16 = 10;

// ------------------------------------------------------------------------------------------------
// DATA STRUCTURES
// ------------------------------------------------------------------------------------------------

/// Detector for sustained straight travel.
///
/// Keeps a rolling window of absolute turn command magnitudes. Once the window has filled once,
/// the detector reports straight travel whenever the window average drops below the limit -
/// which is how the line tracer notices it has run off the end of the line but is still heading
/// straight. Stateful across calls within a segment; reset at segment entry.
#[derive(Debug, Clone)]
pub struct StraightDetector {
    window: [i16; STRAIGHT_WINDOW],
    next: usize,
    filled: bool,
}

// ------------------------------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Classify whether an obstacle sits ahead of the robot.
///
/// Takes [`OBSTACLE_SAMPLE_COUNT`] range samples at the tick period and returns true when at
/// least half of them detect an obstacle within [`OBSTACLE_DETECT_CM`]. Blocks for the whole
/// sampling window; the robot should be stationary while this runs.
pub fn obstacle_pattern_present<E: Eqpt>(eqpt: &mut E, monitor: &mut Monitor) -> bool {
    let mut detections = 0u32;

    for _ in 0..OBSTACLE_SAMPLE_COUNT {
        eqpt.wait_tick();
        monitor.sample(eqpt);

        if monitor.snapshot().obstacle_cm <= OBSTACLE_DETECT_CM {
            detections += 1;
        }
    }

    debug!(
        "Obstacle pattern: {}/{} detections",
        detections, OBSTACLE_SAMPLE_COUNT
    );

    detections >= OBSTACLE_SAMPLE_COUNT / 2
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl StraightDetector {
    /// Create a new detector with an empty window.
    pub fn new() -> Self {
        Self {
            window: [0; STRAIGHT_WINDOW],
            next: 0,
            filled: false,
        }
    }

    /// Empty the window (segment entry).
    pub fn reset(&mut self) {
        self.window = [0; STRAIGHT_WINDOW];
        self.next = 0;
        self.filled = false;
    }

    /// Push this tick's turn command and report whether travel has been sustained straight.
    ///
    /// Always false until the window has filled once.
    pub fn update(&mut self, turn: i16) -> bool {
        self.window[self.next] = turn.abs();
        self.next = (self.next + 1) % STRAIGHT_WINDOW;
        if self.next == 0 {
            self.filled = true;
        }

        if !self.filled {
            return false;
        }

        let sum: i32 = self.window.iter().map(|&t| t as i32).sum();
        let average = sum / STRAIGHT_WINDOW as i32;

        average < STRAIGHT_TURN_LIMIT as i32
    }
}

impl Default for StraightDetector {
    fn default() -> Self {
        Self::new()
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------
