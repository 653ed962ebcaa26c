//! Geodetic State Synchronization
//!
//! Mirrors locally simulated objects into an external simulation system:
//! local East-North-Up poses are converted to Earth-Centered-Earth-Fixed
//! positions and Earth-fixed Euler angles, then pushed to a sink as keyed
//! object updates, removals and named events.

pub mod core;
pub mod algorithms;
pub mod sink;
pub mod sync;
pub mod utils;

// Re-export commonly used types
pub use crate::core::{
    EcefPosition, EulerAngles, EulerOrientation, GeodeticOrigin, HeadingPitchRoll, LifecycleState,
    LocalPose, Ownership, SyncedObject,
};
pub use crate::algorithms::{
    enu_to_ecef, euler_to_heading_pitch_roll, heading_pitch_roll_to_euler, CoordinateConverter,
    Ellipsoid, ReferenceFrame, UnitScale,
};
pub use crate::sink::{JsonLinesSink, Payload, RecordingSink, SinkCall, SinkError, SinkResult, SyncSink};
pub use crate::sync::{EmitOutcome, ObjectSyncEmitter, SkipReason, SyncStats, TickThrottle};
pub use crate::utils::{ConfigError, ConfigurationManager, SyncConfig};
