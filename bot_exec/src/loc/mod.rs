//! # Localisation module
//!
//! This module provides localisation for the robot in the form of wheel dead reckoning: the
//! [`OdomEstimator`] integrates encoder counts into cumulative travel, and the
//! [`HeadingEstimator`] integrates the difference of the per-wheel travels into a heading angle.
//!
//! Both estimators are plain state structs fed raw values once per tick by the monitor, which
//! also enforces the required update order (odometry first, heading second). There is no
//! external positional correction - accuracy is bounded by wheel slip and encoder resolution,
//! which is why each course segment resets the estimators at entry rather than trusting a long
//! accumulation.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod heading;
mod odom;
mod params;

// ---------------------------------------------------------------------------
// EXPORTS
// ---------------------------------------------------------------------------

pub use heading::HeadingEstimator;
pub use odom::OdomEstimator;
pub use params::LocParams;
