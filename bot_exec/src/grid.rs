//! # Grid geometry
//!
//! The course layout is described on a square grid with 100 mm cells. These helpers give the
//! straight-line distance and bearing between two grid coordinates, independent of the live
//! odometry - pure functions of their inputs, recomputed on demand and never cached.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use nalgebra::Vector2;

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Side length of one grid cell.
///
/// Units: millimetres
pub const GRID_CELL_MM: f64 = 100.0;

// ------------------------------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Straight-line distance between two grid coordinates, in millimetres.
pub fn distance_between(a: (i32, i32), b: (i32, i32)) -> f64 {
    let delta = Vector2::new((b.0 - a.0) as f64, (b.1 - a.1) as f64);
    delta.norm() * GRID_CELL_MM
}

/// Bearing from grid coordinate `a` to grid coordinate `b`, in degrees.
///
/// The bearing is `atan2(dy, dx)`, in the range (-180, 180].
pub fn bearing_between(a: (i32, i32), b: (i32, i32)) -> f64 {
    let dy = (b.1 - a.1) as f64;
    let dx = (b.0 - a.0) as f64;
    dy.atan2(dx).to_degrees()
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_distance_between() {
        // A 3-4-5 triangle across the grid
        assert_eq!(distance_between((0, 0), (3, 4)), 500.0);

        // Order doesn't matter
        assert_eq!(distance_between((3, 4), (0, 0)), 500.0);

        // A coordinate to itself is zero
        assert_eq!(distance_between((7, -2), (7, -2)), 0.0);

        // One cell along an axis is one cell width
        assert_eq!(distance_between((0, 0), (0, 1)), GRID_CELL_MM);
    }

    #[test]
    fn test_bearing_between() {
        assert_eq!(bearing_between((0, 0), (1, 0)), 0.0);
        assert!((bearing_between((0, 0), (0, 1)) - 90.0).abs() < 1e-9);
        assert!((bearing_between((0, 0), (-1, 0)) - 180.0).abs() < 1e-9);
        assert!((bearing_between((0, 0), (0, -1)) + 90.0).abs() < 1e-9);
        assert!((bearing_between((0, 0), (1, 1)) - 45.0).abs() < 1e-9);
        assert!((bearing_between((2, 2), (1, 1)) + 135.0).abs() < 1e-9);
    }
}
