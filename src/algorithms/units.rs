//! Scene unit scaling

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::core::DEFAULT_METERS_PER_SCENE_UNIT;

/// Length of one scene unit in meters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UnitScale {
    pub meters_per_unit: f64,
}

impl UnitScale {
    pub const CENTIMETERS: UnitScale = UnitScale { meters_per_unit: 0.01 };
    pub const METERS: UnitScale = UnitScale { meters_per_unit: 1.0 };

    pub fn new(meters_per_unit: f64) -> Self {
        Self { meters_per_unit }
    }

    /// Scene-space vector to meters
    pub fn to_meters(&self, scene: &Vector3<f64>) -> Vector3<f64> {
        scene * self.meters_per_unit
    }

    /// Meters to scene-space vector
    pub fn from_meters(&self, meters: &Vector3<f64>) -> Vector3<f64> {
        meters / self.meters_per_unit
    }

    pub fn is_valid(&self) -> bool {
        self.meters_per_unit.is_finite() && self.meters_per_unit > 0.0
    }
}

impl Default for UnitScale {
    fn default() -> Self {
        Self::new(DEFAULT_METERS_PER_SCENE_UNIT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centimeters_to_meters() {
        let meters = UnitScale::CENTIMETERS.to_meters(&Vector3::new(1000.0, -250.0, 5.0));

        assert!((meters.x - 10.0).abs() < 1e-12);
        assert!((meters.y + 2.5).abs() < 1e-12);
        assert!((meters.z - 0.05).abs() < 1e-12);
    }

    #[test]
    fn test_meters_is_identity() {
        let v = Vector3::new(1.5, 2.5, -3.5);
        assert_eq!(UnitScale::METERS.to_meters(&v), v);
    }

    #[test]
    fn test_from_meters_inverts_to_meters() {
        let scale = UnitScale::new(0.3048);
        let scene = Vector3::new(100.0, 200.0, 300.0);
        let back = scale.from_meters(&scale.to_meters(&scene));

        assert!((back - scene).norm() < 1e-9);
    }

    #[test]
    fn test_default_is_centimeters() {
        assert_eq!(UnitScale::default(), UnitScale::CENTIMETERS);
        assert!(!UnitScale::new(0.0).is_valid());
        assert!(!UnitScale::new(f64::NAN).is_valid());
    }
}
