//! Heading/pitch/roll to Earth-fixed Euler angle conversion
//!
//! Local attitude follows the host engine's rotator convention in the
//! East-North-Up tangent frame (x east/forward, y north/right, z up):
//! positive yaw turns x toward y, positive pitch raises the nose (+x toward
//! +z) and positive roll drops the right side (+y toward -z). As a matrix
//! that is `Rz(yaw) * Ry(-pitch) * Rx(-roll)` under the right-hand rule.
//!
//! The Earth-fixed attitude is measured against the tangent frame at
//! latitude 0, longitude 0, so a body level with the local frame at that
//! point has zero Euler angles.

use nalgebra::{Matrix3, Rotation3};

use super::geodetic::ecef_to_enu_matrix;
use crate::core::{EulerAngles, HeadingPitchRoll};

/// Tangent frame axes (E, N, U as columns) expressed in ECEF
fn enu_to_ecef_matrix(lat_rad: f64, lon_rad: f64) -> Matrix3<f64> {
    ecef_to_enu_matrix(lat_rad, lon_rad).transpose()
}

/// Z-Y-X decomposition of a rotation matrix into (z, y, x) angles
fn zyx_angles(m: &Matrix3<f64>) -> (f64, f64, f64) {
    let z = m[(1, 0)].atan2(m[(0, 0)]);
    let y = (-m[(2, 0)]).clamp(-1.0, 1.0).asin();
    let x = m[(2, 1)].atan2(m[(2, 2)]);
    (z, y, x)
}

fn zyx_matrix(z: f64, y: f64, x: f64) -> Matrix3<f64> {
    Rotation3::from_euler_angles(x, y, z).into_inner()
}

/// Engine rotator to a right-handed ENU rotation
fn rotator_matrix(yaw: f64, pitch: f64, roll: f64) -> Matrix3<f64> {
    zyx_matrix(yaw, -pitch, -roll)
}

/// Inverse of [`rotator_matrix`]: (yaw, pitch, roll)
fn rotator_angles(m: &Matrix3<f64>) -> (f64, f64, f64) {
    let (yaw, neg_pitch, neg_roll) = zyx_angles(m);
    (yaw, -neg_pitch, -neg_roll)
}

/// Null-island tangent frame expressed in ECEF
fn null_island_frame() -> Matrix3<f64> {
    enu_to_ecef_matrix(0.0, 0.0)
}

/// Rotation carrying the null-island tangent frame onto the tangent frame at
/// the reference point
pub fn frame_rotation(ref_lat_rad: f64, ref_lon_rad: f64) -> Matrix3<f64> {
    enu_to_ecef_matrix(ref_lat_rad, ref_lon_rad) * null_island_frame().transpose()
}

/// Convert a local heading/pitch/roll (radians) into Earth-fixed Euler angles
/// `(psi, theta, phi)` relative to the reference latitude/longitude (radians).
///
/// No range checks are applied to the reference point.
pub fn heading_pitch_roll_to_euler(
    ref_lat_rad: f64,
    ref_lon_rad: f64,
    yaw_rad: f64,
    pitch_rad: f64,
    roll_rad: f64,
) -> EulerAngles {
    let t0 = null_island_frame();
    let local = rotator_matrix(yaw_rad, pitch_rad, roll_rad);
    let body = frame_rotation(ref_lat_rad, ref_lon_rad) * t0 * local * t0.transpose();

    let (psi, theta, phi) = zyx_angles(&body);
    EulerAngles { psi, theta, phi }
}

/// Inverse of [`heading_pitch_roll_to_euler`]; returns (yaw, pitch, roll) in
/// radians. Ambiguous at pitch = ±90°.
pub fn euler_to_heading_pitch_roll(
    ref_lat_rad: f64,
    ref_lon_rad: f64,
    euler: &EulerAngles,
) -> (f64, f64, f64) {
    let t0 = null_island_frame();
    let body = zyx_matrix(euler.psi, euler.theta, euler.phi);
    let local = t0.transpose() * frame_rotation(ref_lat_rad, ref_lon_rad).transpose() * body * t0;

    rotator_angles(&local)
}

/// Degree-based convenience wrapper for a local orientation
pub fn orientation_to_euler(ref_lat_deg: f64, ref_lon_deg: f64, hpr: &HeadingPitchRoll) -> EulerAngles {
    heading_pitch_roll_to_euler(
        ref_lat_deg.to_radians(),
        ref_lon_deg.to_radians(),
        hpr.yaw.to_radians(),
        hpr.pitch.to_radians(),
        hpr.roll.to_radians(),
    )
}
