//! # Equipment interface
//!
//! This module defines the boundary between the control software and the robot's equipment: the
//! two drive motors, the wheel encoders, the colour sensor, the range sensor, the inclination
//! sensor, and the periodic tick source which paces the whole control loop.
//!
//! The boundary is a trait so that the control code can be driven either by real hardware or by
//! the simulated backend in [`sim`]. Equipment access is assumed infallible: reads always return
//! a value (possibly a stale one), writes always take effect. Retry and timeout handling belongs
//! to the backend, not to the control code.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

#[cfg(feature = "sim")]
pub mod sim;

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// DATA STRUCTURES
// ------------------------------------------------------------------------------------------------

/// A raw reading from the colour sensor.
///
/// The channels are raw sensor units on roughly a 0-255 scale. Thresholds over these values are
/// channel-relative, not calibrated to absolute photometric units.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RgbRaw {
    pub r: u16,
    pub g: u16,
    pub b: u16,
}

/// A per-channel window over raw colour readings.
///
/// Each bound is optional and exclusive: a reading matches the band when every set bound holds
/// strictly. Bands are how the course parameters describe the coloured boundary markers and
/// lines.
#[derive(Debug, Default, Clone, Copy, Deserialize)]
pub struct ColorBand {
    pub r_min: Option<u16>,
    pub r_max: Option<u16>,
    pub g_min: Option<u16>,
    pub g_max: Option<u16>,
    pub b_min: Option<u16>,
    pub b_max: Option<u16>,
}

// ------------------------------------------------------------------------------------------------
// TRAITS
// ------------------------------------------------------------------------------------------------

/// The equipment boundary.
///
/// One implementation per deployment target. All blocking control code is generic over this
/// trait, which is what lets the maneuvers and segment state machines run against a
/// deterministic fake clock in tests.
pub trait Eqpt {
    /// Suspend until the next tick of the fixed-period control clock (nominally 4 ms).
    fn wait_tick(&mut self);

    /// Set the power of both wheels independently, in the range [-100, 100], forward positive.
    fn set_wheel_power(&mut self, left: i8, right: i8);

    /// Actively stop both wheels (brake, not coast).
    fn stop_wheels(&mut self);

    /// Get the monotonic signed encoder counts of the (left, right) wheels, in degrees.
    fn wheel_counts(&self) -> (i32, i32);

    /// Get the latest colour sensor reading.
    fn rgb_raw(&self) -> RgbRaw;

    /// Get the latest range sensor reading, in centimetres.
    fn obstacle_cm(&self) -> i16;

    /// Get the latest inclination sensor reading, in degrees.
    fn tilt_deg(&self) -> i16;
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl ColorBand {
    /// Returns true if the reading falls inside every set bound of the band.
    pub fn matches(&self, rgb: &RgbRaw) -> bool {
        channel_in_band(rgb.r, self.r_min, self.r_max)
            && channel_in_band(rgb.g, self.g_min, self.g_max)
            && channel_in_band(rgb.b, self.b_min, self.b_max)
    }
}

// ------------------------------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ------------------------------------------------------------------------------------------------

fn channel_in_band(value: u16, min: Option<u16>, max: Option<u16>) -> bool {
    min.map_or(true, |m| value > m) && max.map_or(true, |m| value < m)
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_color_band() {
        // A blue boundary marker band: low red and green, high blue
        let blue = ColorBand {
            r_max: Some(75),
            g_max: Some(95),
            b_min: Some(120),
            ..Default::default()
        };

        assert!(blue.matches(&RgbRaw { r: 60, g: 80, b: 150 }));
        // Bounds are exclusive
        assert!(!blue.matches(&RgbRaw { r: 75, g: 80, b: 150 }));
        assert!(!blue.matches(&RgbRaw { r: 60, g: 80, b: 120 }));
        // White floor does not match
        assert!(!blue.matches(&RgbRaw { r: 160, g: 180, b: 190 }));

        // An empty band matches everything
        assert!(ColorBand::default().matches(&RgbRaw { r: 1, g: 2, b: 3 }));
    }
}
