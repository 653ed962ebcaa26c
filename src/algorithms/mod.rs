//! Coordinate conversion algorithms

pub mod geodetic;
pub mod orientation;
pub mod units;

pub use geodetic::{enu_to_ecef, CoordinateConverter, Ellipsoid, ReferenceFrame};
pub use orientation::{euler_to_heading_pitch_roll, heading_pitch_roll_to_euler, orientation_to_euler};
pub use units::UnitScale;
