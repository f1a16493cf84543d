//! Parameters structure for the course module

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Deserialize;

use crate::eqpt::ColorBand;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for the whole course: the colour bands shared by every segment, the per-segment
/// tuning values, and the optional execution ceilings.
#[derive(Debug, Clone, Deserialize)]
pub struct CourseParams {
    /// Colour bands for the course markings.
    pub bands: ColorBands,

    /// Line segment parameters.
    pub line: LineParams,

    /// Slalom segment parameters.
    pub slalom: SlalomParams,

    /// Block transport segment parameters.
    pub block: BlockParams,

    /// Optional tick ceiling for each segment's main loop. `None` runs unbounded, which is the
    /// behaviour on the real course.
    #[serde(default)]
    pub seg_tick_budget: Option<u32>,

    /// Optional tick ceiling passed to every blocking maneuver the segments issue.
    #[serde(default)]
    pub mnvr_tick_budget: Option<u32>,
}

/// The colour bands marking the course.
///
/// Blue bands bound the line segment and flag the lane change, yellow cues the transport curve,
/// red marks the far boundary, black is the line itself.
#[derive(Debug, Clone, Deserialize)]
pub struct ColorBands {
    pub blue: ColorBand,
    pub yellow: ColorBand,
    pub red: ColorBand,
    pub black: ColorBand,
}

/// Line segment tuning.
#[derive(Debug, Clone, Deserialize)]
pub struct LineParams {
    /// Target value for the red channel when tracing the line edge.
    pub pid_target: u16,

    /// Power on straights.
    pub power_fast: i8,

    /// Power while steering hard.
    pub power_slow: i8,

    /// Turn magnitude above which the slower power applies.
    pub turn_split: i16,

    /// Travel before the blue end marker is armed - earlier blue readings are course features,
    /// not the end of the segment.
    ///
    /// Units: millimetres
    pub min_blue_distance_mm: f64,

    /// Deceleration run after the blue marker before handing over.
    ///
    /// Units: millimetres
    pub decel_distance_mm: f64,

    /// Power to decelerate to during the hand-over run.
    pub end_power: i8,
}

/// Slalom segment tuning.
#[derive(Debug, Clone, Deserialize)]
pub struct SlalomParams {
    /// Line-trace travel up to the step.
    ///
    /// Units: millimetres
    pub approach_distance_mm: f64,

    /// Power for the approach and the climb.
    pub approach_power: i8,

    /// Red channel target on the approach trace.
    pub pid_target: u16,

    /// Red channel target while threading the first gate.
    pub gate_pid_target: u16,

    /// Tilt magnitude that confirms the robot is on the step.
    ///
    /// Units: degrees
    pub climb_tilt_deg: i16,

    /// Tilt magnitude that confirms the robot is going over the far edge.
    ///
    /// Units: degrees
    pub descend_tilt_deg: i16,

    /// Power while re-acquiring the line after the board.
    pub trace_power: i8,

    /// Range below which the garage wall stops the segment.
    ///
    /// Units: centimetres
    pub garage_stop_cm: i16,
}

/// Block transport segment tuning.
#[derive(Debug, Clone, Deserialize)]
pub struct BlockParams {
    /// Heading swept during the entry swing.
    ///
    /// Units: degrees
    pub swing_heading_deg: f64,

    /// Power during the entry swing.
    pub swing_power: i8,

    /// Power on the straight legs.
    pub cruise_power: i8,

    /// Red channel target when tracing the line.
    pub pid_target: u16,

    /// Straight leg length driven when the yellow cue is missed.
    ///
    /// Units: millimetres
    pub leg_distance_mm: f64,

    /// Power while curving down onto the line.
    pub curve_power: i8,

    /// Turn while curving down onto the line.
    pub curve_turn: i16,

    /// Power while tracing the line.
    pub trace_power: i8,

    /// Travel of the return arc before re-finding the line.
    ///
    /// Units: millimetres
    pub return_distance_mm: f64,

    /// Heading swept by the return arc.
    ///
    /// Units: degrees
    pub return_heading_deg: f64,

    /// Range below which the garage wall stops the segment.
    ///
    /// Units: centimetres
    pub garage_stop_cm: i16,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for CourseParams {
    fn default() -> Self {
        Self {
            bands: ColorBands::default(),
            line: LineParams::default(),
            slalom: SlalomParams::default(),
            block: BlockParams::default(),
            seg_tick_budget: None,
            mnvr_tick_budget: None,
        }
    }
}

impl Default for ColorBands {
    fn default() -> Self {
        Self {
            blue: ColorBand {
                r_max: Some(75),
                g_max: Some(95),
                b_min: Some(120),
                ..ColorBand::default()
            },
            yellow: ColorBand {
                r_min: Some(90),
                g_min: Some(90),
                b_max: Some(30),
                ..ColorBand::default()
            },
            red: ColorBand {
                r_min: Some(75),
                g_max: Some(40),
                b_max: Some(50),
                ..ColorBand::default()
            },
            black: ColorBand {
                r_max: Some(60),
                g_max: Some(90),
                b_max: Some(90),
                ..ColorBand::default()
            },
        }
    }
}

impl Default for LineParams {
    fn default() -> Self {
        Self {
            pid_target: 64,
            power_fast: 80,
            power_slow: 70,
            turn_split: 50,
            min_blue_distance_mm: 10_000.0,
            decel_distance_mm: 250.0,
            end_power: 30,
        }
    }
}

impl Default for SlalomParams {
    fn default() -> Self {
        Self {
            approach_distance_mm: 125.0,
            approach_power: 15,
            pid_target: 64,
            gate_pid_target: 55,
            climb_tilt_deg: 3,
            descend_tilt_deg: 4,
            trace_power: 20,
            garage_stop_cm: 6,
        }
    }
}

impl Default for BlockParams {
    fn default() -> Self {
        Self {
            swing_heading_deg: 40.0,
            swing_power: 80,
            cruise_power: 50,
            pid_target: 64,
            leg_distance_mm: 1000.0,
            curve_power: 40,
            curve_turn: 30,
            trace_power: 20,
            return_distance_mm: 2500.0,
            return_heading_deg: 260.0,
            garage_stop_cm: 5,
        }
    }
}
