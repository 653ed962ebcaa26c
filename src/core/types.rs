//! Core data types for the synchronization core

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// Reference point of the local East-North-Up frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeodeticOrigin {
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
    /// Altitude above the ellipsoid in meters
    pub altitude: f64,
}

impl GeodeticOrigin {
    pub fn new(latitude: f64, longitude: f64, altitude: f64) -> Self {
        Self { latitude, longitude, altitude }
    }

    pub fn latitude_rad(&self) -> f64 {
        self.latitude.to_radians()
    }

    pub fn longitude_rad(&self) -> f64 {
        self.longitude.to_radians()
    }

    /// Whether latitude and longitude fall in their physical ranges
    pub fn is_in_range(&self) -> bool {
        self.latitude.abs() <= 90.0 && self.longitude.abs() <= 180.0
    }
}

/// Local orientation in degrees
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct HeadingPitchRoll {
    /// Rotation about the vertical axis
    pub yaw: f64,
    /// Rotation about the lateral axis
    pub pitch: f64,
    /// Rotation about the longitudinal axis
    pub roll: f64,
}

impl HeadingPitchRoll {
    pub fn new(yaw: f64, pitch: f64, roll: f64) -> Self {
        Self { yaw, pitch, roll }
    }

    pub fn is_finite(&self) -> bool {
        self.yaw.is_finite() && self.pitch.is_finite() && self.roll.is_finite()
    }
}

/// Position and orientation of an object in scene space for one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalPose {
    /// Scene position (x east, y north, z up) in scene units
    pub position: Vector3<f64>,
    pub orientation: HeadingPitchRoll,
}

impl LocalPose {
    pub fn new(position: Vector3<f64>, orientation: HeadingPitchRoll) -> Self {
        Self { position, orientation }
    }

    pub fn at(x: f64, y: f64, z: f64) -> Self {
        Self::new(Vector3::new(x, y, z), HeadingPitchRoll::default())
    }

    /// A pose is only forwarded when every component is finite
    pub fn is_finite(&self) -> bool {
        self.position.iter().all(|v| v.is_finite()) && self.orientation.is_finite()
    }
}

/// Earth-Centered-Earth-Fixed position in meters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EcefPosition {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl From<Vector3<f64>> for EcefPosition {
    fn from(v: Vector3<f64>) -> Self {
        Self { x: v.x, y: v.y, z: v.z }
    }
}

impl From<EcefPosition> for Vector3<f64> {
    fn from(p: EcefPosition) -> Self {
        Vector3::new(p.x, p.y, p.z)
    }
}

/// Z-Y-X Euler angles of a body relative to the Earth-fixed frame, in radians
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EulerAngles {
    pub psi: f64,
    pub theta: f64,
    pub phi: f64,
}

/// Orientation as named on the wire.
///
/// The consuming system reads `psi` as pitch, `phi` as yaw and `theta` as
/// roll. The mapping looks transposed but is a live contract and must not be
/// "corrected" on this side.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EulerOrientation {
    pub pitch: f64,
    pub yaw: f64,
    pub roll: f64,
}

impl From<EulerAngles> for EulerOrientation {
    fn from(angles: EulerAngles) -> Self {
        Self {
            pitch: angles.psi,
            yaw: angles.phi,
            roll: angles.theta,
        }
    }
}

/// Who spawned an object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Ownership {
    /// Spawned by the local simulation; its state is mirrored outwards
    Local,
    /// Spawned on behalf of the external system; never echoed back
    External,
}

/// Lifecycle of a mirrored object
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Created,
    Synced,
    Destroyed,
}

/// Identity record of an object mirrored into the external system
#[derive(Debug, Clone, PartialEq)]
pub struct SyncedObject {
    identity: String,
    type_tag: String,
    ownership: Ownership,
    state: LifecycleState,
}

impl SyncedObject {
    pub fn new(identity: impl Into<String>, type_tag: impl Into<String>, ownership: Ownership) -> Self {
        Self {
            identity: identity.into(),
            type_tag: type_tag.into(),
            ownership,
            state: LifecycleState::Created,
        }
    }

    /// Object spawned by this simulation
    pub fn local(identity: impl Into<String>, type_tag: impl Into<String>) -> Self {
        Self::new(identity, type_tag, Ownership::Local)
    }

    /// Object spawned by the external system
    pub fn external(identity: impl Into<String>, type_tag: impl Into<String>) -> Self {
        Self::new(identity, type_tag, Ownership::External)
    }

    pub fn identity(&self) -> &str {
        &self.identity
    }

    pub fn type_tag(&self) -> &str {
        &self.type_tag
    }

    pub fn ownership(&self) -> Ownership {
        self.ownership
    }

    pub fn is_externally_created(&self) -> bool {
        self.ownership == Ownership::External
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn is_destroyed(&self) -> bool {
        self.state == LifecycleState::Destroyed
    }

    pub(crate) fn mark_synced(&mut self) {
        if self.state != LifecycleState::Destroyed {
            self.state = LifecycleState::Synced;
        }
    }

    pub(crate) fn mark_destroyed(&mut self) {
        self.state = LifecycleState::Destroyed;
    }
}
