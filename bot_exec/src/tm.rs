//! # Telemetry module
//!
//! One [`TmRow`] is captured per foreground tick and archived as CSV in the session directory.
//! The rows carry everything needed to replay a run offline: the raw colour channels, the
//! dead-reckoning state, the inclination, and the last commanded power/turn. Rows are for
//! logging and tuning only - control decisions never read them back.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

// External
use log::warn;
use serde::Serialize;

// Internal
use util::archive::Archiver;

use crate::drive_ctrl::DriveCtrl;
use crate::monitor::Monitor;

// ------------------------------------------------------------------------------------------------
// DATA STRUCTURES
// ------------------------------------------------------------------------------------------------

/// One telemetry sample.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct TmRow {
    /// Foreground tick count within the current segment.
    pub tick: u32,

    /// Raw colour channels.
    pub r: u16,
    pub g: u16,
    pub b: u16,

    /// Cumulative travel since segment entry, millimetres.
    pub distance_mm: f64,

    /// Unwrapped heading since segment entry, degrees, right turn positive.
    pub heading_deg: f64,

    /// Inclination, degrees.
    pub tilt_deg: i16,

    /// Last commanded power.
    pub power: i8,

    /// Last commanded turn.
    pub turn: i16,
}

// ------------------------------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Capture a telemetry row from the current monitor and drive control state.
pub fn capture(monitor: &Monitor, drive: &DriveCtrl) -> TmRow {
    let snapshot = monitor.snapshot();

    TmRow {
        tick: monitor.ticks(),
        r: snapshot.rgb.r,
        g: snapshot.rgb.g,
        b: snapshot.rgb.b,
        distance_mm: monitor.distance_mm(),
        heading_deg: monitor.heading_deg(),
        tilt_deg: snapshot.tilt_deg,
        power: drive.last_power(),
        turn: drive.last_turn(),
    }
}

/// Capture and archive a telemetry row, warning rather than failing on archive errors.
pub fn record(archiver: &mut Archiver, monitor: &Monitor, drive: &DriveCtrl) {
    if let Err(e) = archiver.serialise(capture(monitor, drive)) {
        warn!("Could not archive telemetry row: {}", e);
    }
}
