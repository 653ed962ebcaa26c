//! Ellipsoid parameters and wire-level names

/// WGS84 semi-major axis (meters)
pub const WGS84_SEMI_MAJOR_AXIS: f64 = 6378137.0;

/// WGS84 flattening
pub const WGS84_FLATTENING: f64 = 1.0 / 298.257223563;

/// Scene units used by the host engine default to centimeters, so one scene
/// unit is 0.01 m. Hosts that instead multiply scene coordinates by 100 before
/// conversion reproduce that factor with `meters_per_scene_unit = 100`.
pub const DEFAULT_METERS_PER_SCENE_UNIT: f64 = 0.01;

/// Type tag the host attaches to the player's weapon object
pub const DEFAULT_OBJECT_TYPE_TAG: &str = "Gun";

/// Event name emitted when the local object fires
pub const SHOT_FIRED_EVENT: &str = "ShotFired";

pub const KEY_LOCATION_X: &str = "Location.x";
pub const KEY_LOCATION_Y: &str = "Location.y";
pub const KEY_LOCATION_Z: &str = "Location.z";
pub const KEY_ORIENTATION_PITCH: &str = "Orientation.pitch";
pub const KEY_ORIENTATION_YAW: &str = "Orientation.yaw";
pub const KEY_ORIENTATION_ROLL: &str = "Orientation.roll";
