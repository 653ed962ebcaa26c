use nalgebra::{Matrix3, Vector3};
use serde::{Deserialize, Serialize};

use crate::core::{EcefPosition, GeodeticOrigin, WGS84_FLATTENING, WGS84_SEMI_MAJOR_AXIS};

/// Reference ellipsoid used for geodetic transformations
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ellipsoid {
    /// Semi-major axis (meters)
    pub semi_major_axis: f64,
    /// Flattening factor
    pub flattening: f64,
}

impl Ellipsoid {
    /// WGS84 ellipsoid parameters
    pub fn wgs84() -> Self {
        Self {
            semi_major_axis: WGS84_SEMI_MAJOR_AXIS,
            flattening: WGS84_FLATTENING,
        }
    }

    /// Semi-minor axis (meters)
    pub fn semi_minor_axis(&self) -> f64 {
        self.semi_major_axis * (1.0 - self.flattening)
    }

    /// First eccentricity squared
    pub fn eccentricity_squared(&self) -> f64 {
        self.flattening * (2.0 - self.flattening)
    }

    /// Radius of curvature in the prime vertical at the given latitude
    fn prime_vertical_radius(&self, lat_rad: f64) -> f64 {
        self.semi_major_axis / (1.0 - self.eccentricity_squared() * lat_rad.sin().powi(2)).sqrt()
    }
}

impl Default for Ellipsoid {
    fn default() -> Self {
        Self::wgs84()
    }
}

/// Rotation matrix from ECEF to the local East-North-Up frame at the given
/// geodetic latitude/longitude (radians). Rows are the E, N, U unit vectors.
pub fn ecef_to_enu_matrix(lat_rad: f64, lon_rad: f64) -> Matrix3<f64> {
    let sin_lat = lat_rad.sin();
    let cos_lat = lat_rad.cos();
    let sin_lon = lon_rad.sin();
    let cos_lon = lon_rad.cos();

    Matrix3::new(
        -sin_lon,           cos_lon,            0.0,
        -sin_lat * cos_lon, -sin_lat * sin_lon, cos_lat,
        cos_lat * cos_lon,  cos_lat * sin_lon,  sin_lat,
    )
}

/// Geodetic/ECEF/ENU transformations over a reference ellipsoid.
///
/// The converter holds no per-call state; repeated calls with the same inputs
/// return identical results.
#[derive(Debug, Clone, Copy, Default)]
pub struct CoordinateConverter {
    pub ellipsoid: Ellipsoid,
}

impl CoordinateConverter {
    /// Create a converter with default WGS84 parameters
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ellipsoid(ellipsoid: Ellipsoid) -> Self {
        Self { ellipsoid }
    }

    /// Convert geodetic coordinates (lat, lon, altitude) to ECEF
    pub fn geodetic_to_ecef(&self, position: &GeodeticOrigin) -> Vector3<f64> {
        let lat_rad = position.latitude_rad();
        let lon_rad = position.longitude_rad();
        let height = position.altitude;

        let n = self.ellipsoid.prime_vertical_radius(lat_rad);
        let e2 = self.ellipsoid.eccentricity_squared();

        let x = (n + height) * lat_rad.cos() * lon_rad.cos();
        let y = (n + height) * lat_rad.cos() * lon_rad.sin();
        let z = (n * (1.0 - e2) + height) * lat_rad.sin();

        Vector3::new(x, y, z)
    }

    /// Convert ECEF coordinates to geodetic using Bowring's method
    pub fn ecef_to_geodetic(&self, ecef: &Vector3<f64>) -> GeodeticOrigin {
        let a = self.ellipsoid.semi_major_axis;
        let b = self.ellipsoid.semi_minor_axis();
        let e2 = self.ellipsoid.eccentricity_squared();
        let ep2 = (a * a - b * b) / (b * b);

        let p = ecef.x.hypot(ecef.y);
        let theta = (ecef.z * a).atan2(p * b);

        let lat_rad = (ecef.z + ep2 * b * theta.sin().powi(3))
            .atan2(p - e2 * a * theta.cos().powi(3));
        let lon_rad = ecef.y.atan2(ecef.x);

        let n = self.ellipsoid.prime_vertical_radius(lat_rad);
        // p / cos(lat) degenerates near the poles
        let altitude = if lat_rad.abs() < std::f64::consts::FRAC_PI_4 {
            p / lat_rad.cos() - n
        } else {
            ecef.z / lat_rad.sin() - n * (1.0 - e2)
        };

        GeodeticOrigin {
            latitude: lat_rad.to_degrees(),
            longitude: lon_rad.to_degrees(),
            altitude,
        }
    }

    /// Convert a local ENU offset (meters) around `origin` into ECEF
    pub fn enu_to_ecef(&self, enu: &Vector3<f64>, origin: &GeodeticOrigin) -> EcefPosition {
        self.frame(*origin).enu_to_ecef(enu)
    }

    /// Convert an ECEF position into a local ENU offset around `origin`
    pub fn ecef_to_enu(&self, ecef: &EcefPosition, origin: &GeodeticOrigin) -> Vector3<f64> {
        self.frame(*origin).ecef_to_enu(ecef)
    }

    /// Precompute the tangent frame for a fixed origin
    pub fn frame(&self, origin: GeodeticOrigin) -> ReferenceFrame {
        ReferenceFrame {
            origin,
            origin_ecef: self.geodetic_to_ecef(&origin),
            enu_matrix: ecef_to_enu_matrix(origin.latitude_rad(), origin.longitude_rad()),
        }
    }
}

/// Local tangent frame anchored at a geodetic origin.
///
/// The origin is constant for a session, so its ECEF position and rotation
/// are computed once.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReferenceFrame {
    origin: GeodeticOrigin,
    origin_ecef: Vector3<f64>,
    enu_matrix: Matrix3<f64>,
}

impl ReferenceFrame {
    pub fn origin(&self) -> &GeodeticOrigin {
        &self.origin
    }

    pub fn origin_ecef(&self) -> EcefPosition {
        self.origin_ecef.into()
    }

    /// ENU offset (meters) to ECEF
    pub fn enu_to_ecef(&self, enu: &Vector3<f64>) -> EcefPosition {
        let delta_ecef = self.enu_matrix.transpose() * enu;
        (self.origin_ecef + delta_ecef).into()
    }

    /// ECEF to ENU offset (meters)
    pub fn ecef_to_enu(&self, ecef: &EcefPosition) -> Vector3<f64> {
        let delta_ecef = Vector3::from(*ecef) - self.origin_ecef;
        self.enu_matrix * delta_ecef
    }
}

/// Convert an ENU offset in meters to ECEF on the WGS84 ellipsoid.
///
/// Latitude and longitude are in degrees and are not range checked.
pub fn enu_to_ecef(
    x: f64,
    y: f64,
    z: f64,
    ref_lat: f64,
    ref_lon: f64,
    ref_alt: f64,
) -> (f64, f64, f64) {
    let origin = GeodeticOrigin::new(ref_lat, ref_lon, ref_alt);
    let ecef = CoordinateConverter::new().enu_to_ecef(&Vector3::new(x, y, z), &origin);
    (ecef.x, ecef.y, ecef.z)
}
