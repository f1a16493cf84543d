//! # Simulated equipment backend
//!
//! [`SimEqpt`] implements the equipment trait with a simple wheel kinematics model: each tick
//! every wheel advances by an angle proportional to its commanded power. Sensor readings come
//! from a script of events keyed on the robot's cumulative travel, so a simulated run is fully
//! deterministic regardless of host timing - `wait_tick` advances virtual time immediately
//! rather than sleeping.
//!
//! The script models the course as seen by a robot that stays roughly on its intended path:
//! "after 10.5 m of travel the floor turns blue", "at this point the next bottle is 3 cm away",
//! and so on. Events latch: once fired they stay applied until a later event overrides them.
//! Tests can also push explicit per-tick range readings, which take priority over the script.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

// External
use serde::Deserialize;
use std::collections::VecDeque;

// Internal
use super::{Eqpt, RgbRaw};

// ------------------------------------------------------------------------------------------------
// DATA STRUCTURES
// ------------------------------------------------------------------------------------------------

/// Configuration of the simulated equipment, including the sensor event script.
#[derive(Debug, Clone, Deserialize)]
pub struct SimConfig {
    /// Wheel rotation per tick at full (100) power.
    ///
    /// Units: degrees
    pub deg_per_tick_full: f64,

    /// Diameter of the simulated wheels.
    ///
    /// Units: millimetres
    pub wheel_diameter_mm: f64,

    /// Sensor events, keyed on cumulative travel. Sorted on load.
    #[serde(default)]
    pub event: Vec<SimEvent>,
}

/// A scripted sensor change, applied once the robot's cumulative travel passes `at_mm`.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct SimEvent {
    /// Cumulative travel at which the event fires.
    ///
    /// Units: millimetres
    pub at_mm: f64,

    /// New colour sensor reading, `[r, g, b]`.
    pub rgb: Option<[u16; 3]>,

    /// New range sensor reading in centimetres.
    pub obstacle_cm: Option<i16>,

    /// New inclination sensor reading in degrees.
    pub tilt_deg: Option<i16>,
}

/// Simulated equipment.
pub struct SimEqpt {
    /// Wheel rotation per tick at full power, degrees.
    deg_per_tick_full: f64,

    /// Travel per degree of wheel rotation, millimetres.
    mm_per_deg: f64,

    /// The event script, sorted by `at_mm`.
    events: Vec<SimEvent>,

    /// Index of the next unfired event.
    next_event: usize,

    /// Explicit per-tick range readings pushed by tests. Take priority over the script.
    range_queue: VecDeque<i16>,

    left_power: i8,
    right_power: i8,
    stopped: bool,

    /// Accumulated wheel angles, degrees.
    left_deg: f64,
    right_deg: f64,

    /// Cumulative travel of the robot body, millimetres, signed.
    travel_mm: f64,

    rgb: RgbRaw,
    obstacle_cm: i16,
    tilt_deg: i16,

    ticks: u64,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            deg_per_tick_full: 4.0,
            wheel_diameter_mm: 90.0,
            event: Vec::new(),
        }
    }
}

impl SimEqpt {
    /// Create a new simulated equipment set from the given configuration.
    pub fn new(config: SimConfig) -> Self {
        let mut events = config.event;
        events.sort_by(|a, b| {
            a.at_mm
                .partial_cmp(&b.at_mm)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let mut sim = Self {
            deg_per_tick_full: config.deg_per_tick_full,
            mm_per_deg: std::f64::consts::PI * config.wheel_diameter_mm / 360.0,
            events,
            next_event: 0,
            range_queue: VecDeque::new(),
            left_power: 0,
            right_power: 0,
            stopped: true,
            left_deg: 0.0,
            right_deg: 0.0,
            travel_mm: 0.0,
            // An open white floor until the script says otherwise
            rgb: RgbRaw {
                r: 160,
                g: 180,
                b: 190,
            },
            obstacle_cm: 255,
            tilt_deg: 0,
            ticks: 0,
        };

        // Fire any events scripted at or before the start position
        sim.apply_events();

        sim
    }

    /// Push explicit range readings, one per subsequent tick.
    pub fn push_range_readings<I: IntoIterator<Item = i16>>(&mut self, readings: I) {
        self.range_queue.extend(readings);
    }

    /// Directly set the colour sensor reading (test support).
    pub fn set_rgb(&mut self, rgb: RgbRaw) {
        self.rgb = rgb;
    }

    /// Directly set the range sensor reading (test support).
    pub fn set_obstacle_cm(&mut self, distance_cm: i16) {
        self.obstacle_cm = distance_cm;
    }

    /// Directly set the inclination sensor reading (test support).
    pub fn set_tilt_deg(&mut self, tilt_deg: i16) {
        self.tilt_deg = tilt_deg;
    }

    /// The last commanded (left, right) wheel powers.
    pub fn wheel_power(&self) -> (i8, i8) {
        (self.left_power, self.right_power)
    }

    /// True if the wheels are actively stopped rather than coasting at zero power.
    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Number of ticks elapsed since the start of the simulation.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Cumulative travel of the robot body in millimetres.
    pub fn travel_mm(&self) -> f64 {
        self.travel_mm
    }

    /// Fire every unfired event whose travel mark has been passed.
    fn apply_events(&mut self) {
        while self.next_event < self.events.len()
            && self.events[self.next_event].at_mm <= self.travel_mm
        {
            let event = self.events[self.next_event];

            if let Some([r, g, b]) = event.rgb {
                self.rgb = RgbRaw { r, g, b };
            }
            if let Some(d) = event.obstacle_cm {
                self.obstacle_cm = d;
            }
            if let Some(t) = event.tilt_deg {
                self.tilt_deg = t;
            }

            self.next_event += 1;
        }
    }
}

impl Eqpt for SimEqpt {
    fn wait_tick(&mut self) {
        self.ticks += 1;

        // Advance the wheels by the angle their power produces in one tick
        let left_delta_deg = self.left_power as f64 * self.deg_per_tick_full / 100.0;
        let right_delta_deg = self.right_power as f64 * self.deg_per_tick_full / 100.0;

        self.left_deg += left_delta_deg;
        self.right_deg += right_delta_deg;

        // Body travel is the mean of the two wheel travels
        self.travel_mm += (left_delta_deg + right_delta_deg) / 2.0 * self.mm_per_deg;

        // Explicit range readings beat the script
        if let Some(d) = self.range_queue.pop_front() {
            self.obstacle_cm = d;
        }

        self.apply_events();
    }

    fn set_wheel_power(&mut self, left: i8, right: i8) {
        self.left_power = left;
        self.right_power = right;
        self.stopped = false;
    }

    fn stop_wheels(&mut self) {
        self.left_power = 0;
        self.right_power = 0;
        self.stopped = true;
    }

    fn wheel_counts(&self) -> (i32, i32) {
        (
            self.left_deg.round() as i32,
            self.right_deg.round() as i32,
        )
    }

    fn rgb_raw(&self) -> RgbRaw {
        self.rgb
    }

    fn obstacle_cm(&self) -> i16 {
        self.obstacle_cm
    }

    fn tilt_deg(&self) -> i16 {
        self.tilt_deg
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_wheel_model() {
        let mut sim = SimEqpt::new(SimConfig::default());

        sim.set_wheel_power(50, 50);
        for _ in 0..100 {
            sim.wait_tick();
        }

        // 100 ticks at half power of 4 deg/tick is 200 degrees per wheel
        assert_eq!(sim.wheel_counts(), (200, 200));

        // Travel is wheel angle times mm per degree (pi * 90 / 360)
        let expected_mm = 200.0 * std::f64::consts::PI * 90.0 / 360.0;
        assert!((sim.travel_mm() - expected_mm).abs() < 1e-9);
    }

    #[test]
    fn test_events_fire_in_travel_order() {
        let mut config = SimConfig::default();
        config.event = vec![
            SimEvent {
                at_mm: 50.0,
                rgb: Some([10, 10, 10]),
                obstacle_cm: None,
                tilt_deg: None,
            },
            SimEvent {
                at_mm: 10.0,
                rgb: None,
                obstacle_cm: Some(5),
                tilt_deg: None,
            },
        ];

        let mut sim = SimEqpt::new(config);
        sim.set_wheel_power(100, 100);

        // Not yet at either mark
        sim.wait_tick();
        assert_eq!(sim.obstacle_cm(), 255);

        // Drive past 10 mm: the range event fires, the colour one does not
        while sim.travel_mm() < 20.0 {
            sim.wait_tick();
        }
        assert_eq!(sim.obstacle_cm(), 5);
        assert_eq!(sim.rgb_raw().r, 160);

        // Drive past 50 mm: the colour event fires
        while sim.travel_mm() < 60.0 {
            sim.wait_tick();
        }
        assert_eq!(sim.rgb_raw().r, 10);
    }
}
