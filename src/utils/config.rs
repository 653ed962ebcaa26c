use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, warn};

use crate::algorithms::{Ellipsoid, UnitScale};
use crate::core::{GeodeticOrigin, DEFAULT_METERS_PER_SCENE_UNIT, DEFAULT_OBJECT_TYPE_TAG, SHOT_FIRED_EVENT};

/// Geodetic reference of the scene, named as the hosting environment names it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ReferenceSettings {
    /// Latitude of the scene origin in decimal degrees
    pub reference_latitude: f64,
    /// Longitude of the scene origin in decimal degrees
    pub reference_longitude: f64,
    /// Altitude of the scene origin above the ellipsoid in meters
    pub reference_altitude: f64,
}

impl ReferenceSettings {
    pub fn origin(&self) -> GeodeticOrigin {
        GeodeticOrigin::new(
            self.reference_latitude,
            self.reference_longitude,
            self.reference_altitude,
        )
    }
}

impl From<GeodeticOrigin> for ReferenceSettings {
    fn from(origin: GeodeticOrigin) -> Self {
        Self {
            reference_latitude: origin.latitude,
            reference_longitude: origin.longitude,
            reference_altitude: origin.altitude,
        }
    }
}

impl Default for ReferenceSettings {
    fn default() -> Self {
        Self {
            reference_latitude: 0.0,
            reference_longitude: 0.0,
            reference_altitude: 0.0,
        }
    }
}

/// Synchronization settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Geodetic origin of the local scene
    pub reference: ReferenceSettings,
    /// Ellipsoid used for geodetic conversions
    #[serde(default)]
    pub earth_model: Ellipsoid,
    /// Length of one scene unit in meters
    #[serde(default = "default_meters_per_scene_unit")]
    pub meters_per_scene_unit: f64,
    /// Minimum interval between two object updates (milliseconds)
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
    /// Type tag sent with every object update
    #[serde(default = "default_object_type_tag")]
    pub object_type_tag: String,
    /// Event name sent when the object fires
    #[serde(default = "default_fire_event_name")]
    pub fire_event_name: String,
    /// Reject out-of-range reference coordinates instead of warning
    #[serde(default)]
    pub strict_origin_validation: bool,
}

fn default_meters_per_scene_unit() -> f64 {
    DEFAULT_METERS_PER_SCENE_UNIT
}

fn default_tick_interval_ms() -> u64 {
    1000
}

fn default_object_type_tag() -> String {
    DEFAULT_OBJECT_TYPE_TAG.to_string()
}

fn default_fire_event_name() -> String {
    SHOT_FIRED_EVENT.to_string()
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            reference: ReferenceSettings::default(),
            earth_model: Ellipsoid::wgs84(),
            meters_per_scene_unit: default_meters_per_scene_unit(),
            tick_interval_ms: default_tick_interval_ms(),
            object_type_tag: default_object_type_tag(),
            fire_event_name: default_fire_event_name(),
            strict_origin_validation: false,
        }
    }
}

impl SyncConfig {
    pub fn with_origin(origin: GeodeticOrigin) -> Self {
        Self {
            reference: origin.into(),
            ..Default::default()
        }
    }

    pub fn origin(&self) -> GeodeticOrigin {
        self.reference.origin()
    }

    pub fn unit_scale(&self) -> UnitScale {
        UnitScale::new(self.meters_per_scene_unit)
    }

    /// Parses config from JSON.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(s).map_err(|e| ConfigError::Serialization(e.to_string()))
    }
}

/// Configuration errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Invalid parameter value
    #[error("invalid {parameter} = {value}: {reason}")]
    InvalidParameter { parameter: String, value: String, reason: String },
    /// Configuration file I/O error
    #[error("config I/O error: {0}")]
    Io(String),
    /// JSON serialization/deserialization error
    #[error("config serialization error: {0}")]
    Serialization(String),
    /// No file associated with the configuration
    #[error("no file path set for saving configuration")]
    NoPath,
}

/// Configuration validation result
#[derive(Debug)]
pub struct ValidationResult {
    /// Whether configuration is valid
    pub is_valid: bool,
    /// Validation errors
    pub errors: Vec<ConfigError>,
    /// Validation warnings
    pub warnings: Vec<String>,
}

impl ValidationResult {
    fn into_first_error(self) -> Option<ConfigError> {
        self.errors.into_iter().next()
    }
}

/// Holds the active configuration and the file it came from
#[derive(Debug, Default)]
pub struct ConfigurationManager {
    config: SyncConfig,
    config_file_path: Option<String>,
    is_modified: bool,
}

impl ConfigurationManager {
    /// Create a new configuration manager with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Create configuration manager and load from file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let mut manager = Self::new();
        manager.load_from_file(path)?;
        Ok(manager)
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Replace the configuration after validation
    pub fn update_config(&mut self, config: SyncConfig) -> Result<(), ConfigError> {
        let validation = self.validate_config(&config);
        if let Some(error) = validation.into_first_error() {
            return Err(error);
        }

        self.config = config;
        self.is_modified = true;
        Ok(())
    }

    /// Load configuration from JSON file
    pub fn load_from_file<P: AsRef<Path>>(&mut self, path: P) -> Result<(), ConfigError> {
        let path_str = path.as_ref().to_string_lossy().to_string();

        let content = fs::read_to_string(&path)
            .map_err(|e| ConfigError::Io(format!("failed to read config file '{}': {}", path_str, e)))?;

        let config = SyncConfig::from_json_str(&content)?;

        let validation = self.validate_config(&config);
        if let Some(error) = validation.into_first_error() {
            return Err(error);
        }

        debug!(path = %path_str, "loaded sync configuration");
        self.config = config;
        self.config_file_path = Some(path_str);
        self.is_modified = false;
        Ok(())
    }

    /// Save configuration to JSON file
    pub fn save_to_file<P: AsRef<Path>>(&mut self, path: P) -> Result<(), ConfigError> {
        let path_str = path.as_ref().to_string_lossy().to_string();

        let content = serde_json::to_string_pretty(&self.config)
            .map_err(|e| ConfigError::Serialization(e.to_string()))?;

        fs::write(&path, content)
            .map_err(|e| ConfigError::Io(format!("failed to write config file '{}': {}", path_str, e)))?;

        self.config_file_path = Some(path_str);
        self.is_modified = false;
        Ok(())
    }

    /// Save to the currently loaded file path
    pub fn save(&mut self) -> Result<(), ConfigError> {
        match self.config_file_path.clone() {
            Some(path) => self.save_to_file(path),
            None => Err(ConfigError::NoPath),
        }
    }

    /// Check if configuration has been modified since last save
    pub fn is_modified(&self) -> bool {
        self.is_modified
    }

    /// Validate a configuration; warnings are logged, errors are returned
    pub fn validate_config(&self, config: &SyncConfig) -> ValidationResult {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();
        let reference = &config.reference;

        for (parameter, value) in [
            ("ReferenceLatitude", reference.reference_latitude),
            ("ReferenceLongitude", reference.reference_longitude),
            ("ReferenceAltitude", reference.reference_altitude),
        ] {
            if !value.is_finite() {
                errors.push(ConfigError::InvalidParameter {
                    parameter: parameter.to_string(),
                    value: value.to_string(),
                    reason: "reference coordinates must be finite".to_string(),
                });
            }
        }

        let mut out_of_range = Vec::new();
        if reference.reference_latitude.abs() > 90.0 {
            out_of_range.push((
                "ReferenceLatitude",
                reference.reference_latitude,
                "latitude must be between -90 and 90 degrees",
            ));
        }
        if reference.reference_longitude.abs() > 180.0 {
            out_of_range.push((
                "ReferenceLongitude",
                reference.reference_longitude,
                "longitude must be between -180 and 180 degrees",
            ));
        }
        for (parameter, value, reason) in out_of_range {
            if config.strict_origin_validation {
                errors.push(ConfigError::InvalidParameter {
                    parameter: parameter.to_string(),
                    value: value.to_string(),
                    reason: reason.to_string(),
                });
            } else {
                warnings.push(format!("{} = {}: {}", parameter, value, reason));
            }
        }

        if !config.unit_scale().is_valid() {
            errors.push(ConfigError::InvalidParameter {
                parameter: "meters_per_scene_unit".to_string(),
                value: config.meters_per_scene_unit.to_string(),
                reason: "scale must be positive and finite".to_string(),
            });
        }

        let ellipsoid = &config.earth_model;
        if !(ellipsoid.semi_major_axis > 0.0) || !(0.0..1.0).contains(&ellipsoid.flattening) {
            errors.push(ConfigError::InvalidParameter {
                parameter: "earth_model".to_string(),
                value: format!("a={}, f={}", ellipsoid.semi_major_axis, ellipsoid.flattening),
                reason: "semi-major axis must be positive and flattening in [0, 1)".to_string(),
            });
        }

        if config.object_type_tag.is_empty() {
            errors.push(ConfigError::InvalidParameter {
                parameter: "object_type_tag".to_string(),
                value: String::new(),
                reason: "type tag cannot be empty".to_string(),
            });
        }

        if config.fire_event_name.is_empty() {
            errors.push(ConfigError::InvalidParameter {
                parameter: "fire_event_name".to_string(),
                value: String::new(),
                reason: "event name cannot be empty".to_string(),
            });
        }

        if config.tick_interval_ms == 0 {
            warnings.push("tick_interval_ms = 0 sends an update on every tick".to_string());
        }

        for warning in &warnings {
            warn!("{}", warning);
        }

        ValidationResult {
            is_valid: errors.is_empty(),
            errors,
            warnings,
        }
    }
}
