//! Emits lifecycle and event messages for mirrored objects
//!
//! Each local object is mirrored into the external system through three
//! calls: an upsert on every valid tick, a named event when it fires, and a
//! single removal when it is destroyed. Objects spawned by the external
//! system are never echoed back.

use nalgebra::Vector3;
use tracing::{debug, trace, warn};

use crate::algorithms::{orientation_to_euler, CoordinateConverter, ReferenceFrame, UnitScale};
use crate::core::{
    EcefPosition, EulerOrientation, GeodeticOrigin, LocalPose, SyncedObject, KEY_LOCATION_X,
    KEY_LOCATION_Y, KEY_LOCATION_Z, KEY_ORIENTATION_PITCH, KEY_ORIENTATION_ROLL,
    KEY_ORIENTATION_YAW, SHOT_FIRED_EVENT,
};
use crate::sink::{Payload, SinkResult, SyncSink};
use crate::sync::{EmitOutcome, SkipReason, SyncStats};
use crate::utils::SyncConfig;

/// Mirrors local objects into an external system through a [`SyncSink`]
pub struct ObjectSyncEmitter<S: SyncSink> {
    sink: S,
    frame: ReferenceFrame,
    units: UnitScale,
    fire_event_name: String,
    stats: SyncStats,
}

impl<S: SyncSink> ObjectSyncEmitter<S> {
    /// Emitter over WGS84 with centimeter scene units
    pub fn new(sink: S, origin: GeodeticOrigin) -> Self {
        Self {
            sink,
            frame: CoordinateConverter::new().frame(origin),
            units: UnitScale::default(),
            fire_event_name: SHOT_FIRED_EVENT.to_string(),
            stats: SyncStats::default(),
        }
    }

    pub fn from_config(sink: S, config: &SyncConfig) -> Self {
        let converter = CoordinateConverter::with_ellipsoid(config.earth_model);
        Self {
            sink,
            frame: converter.frame(config.origin()),
            units: config.unit_scale(),
            fire_event_name: config.fire_event_name.clone(),
            stats: SyncStats::default(),
        }
    }

    pub fn with_unit_scale(mut self, units: UnitScale) -> Self {
        self.units = units;
        self
    }

    pub fn with_fire_event_name(mut self, name: impl Into<String>) -> Self {
        self.fire_event_name = name.into();
        self
    }

    pub fn origin(&self) -> &GeodeticOrigin {
        self.frame.origin()
    }

    pub fn frame(&self) -> &ReferenceFrame {
        &self.frame
    }

    pub fn unit_scale(&self) -> UnitScale {
        self.units
    }

    pub fn stats(&self) -> SyncStats {
        self.stats
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Scene position to ECEF
    pub fn to_ecef(&self, scene_position: &Vector3<f64>) -> EcefPosition {
        self.frame.enu_to_ecef(&self.units.to_meters(scene_position))
    }

    /// Local pose to ECEF position and wire-named Euler orientation
    pub fn convert_pose(&self, pose: &LocalPose) -> (EcefPosition, EulerOrientation) {
        let origin = self.frame.origin();
        let euler = orientation_to_euler(origin.latitude, origin.longitude, &pose.orientation);
        (self.to_ecef(&pose.position), euler.into())
    }

    fn location_payload(location: &EcefPosition, capacity: usize) -> Payload {
        let mut payload = Payload::with_capacity(capacity);
        payload.push(KEY_LOCATION_X, location.x);
        payload.push(KEY_LOCATION_Y, location.y);
        payload.push(KEY_LOCATION_Z, location.z);
        payload
    }

    /// Payload sent with an object update
    pub fn pose_payload(&self, pose: &LocalPose) -> Payload {
        let (location, orientation) = self.convert_pose(pose);
        let mut payload = Self::location_payload(&location, 6);
        payload.push(KEY_ORIENTATION_PITCH, orientation.pitch);
        payload.push(KEY_ORIENTATION_YAW, orientation.yaw);
        payload.push(KEY_ORIENTATION_ROLL, orientation.roll);
        payload
    }

    fn skip(&mut self, object: &SyncedObject, reason: SkipReason) -> EmitOutcome {
        trace!(identity = object.identity(), ?reason, "sync skipped");
        self.stats.record_skip(reason);
        EmitOutcome::Skipped(reason)
    }

    fn finish(&mut self, identity: &str, operation: &str, result: SinkResult<()>) -> EmitOutcome {
        match result {
            Ok(()) => EmitOutcome::Sent,
            Err(error) => {
                warn!(identity, operation, %error, "sink call dropped");
                self.stats.sink_failures += 1;
                EmitOutcome::SinkFailed(error)
            }
        }
    }

    /// Report a shot fired from `muzzle_position` (scene units)
    pub fn on_fire(&mut self, object: &SyncedObject, muzzle_position: &Vector3<f64>) -> EmitOutcome {
        if object.is_externally_created() {
            return self.skip(object, SkipReason::ExternallyCreated);
        }
        if object.is_destroyed() {
            return self.skip(object, SkipReason::Destroyed);
        }
        if !muzzle_position.iter().all(|v| v.is_finite()) {
            return self.skip(object, SkipReason::InvalidPose);
        }

        let payload = Self::location_payload(&self.to_ecef(muzzle_position), 3);
        let result = self.sink.send_message(&self.fire_event_name, &payload);
        let outcome = self.finish(object.identity(), "send_message", result);
        if outcome.is_sent() {
            self.stats.messages_sent += 1;
            debug!(identity = object.identity(), event = %self.fire_event_name, "event sent");
        }
        outcome
    }

    /// Push the object's current pose as a create-or-replace update
    pub fn on_tick(&mut self, object: &mut SyncedObject, pose: &LocalPose) -> EmitOutcome {
        if object.is_externally_created() {
            return self.skip(object, SkipReason::ExternallyCreated);
        }
        if object.is_destroyed() {
            return self.skip(object, SkipReason::Destroyed);
        }
        if !pose.is_finite() {
            debug!(identity = object.identity(), "non-finite pose not forwarded");
            return self.skip(object, SkipReason::InvalidPose);
        }

        let payload = self.pose_payload(pose);
        let result = self
            .sink
            .update_object(object.identity(), object.type_tag(), &payload);
        let outcome = self.finish(object.identity(), "update_object", result);
        if outcome.is_sent() {
            self.stats.updates_sent += 1;
            object.mark_synced();
            trace!(identity = object.identity(), type_tag = object.type_tag(), "object updated");
        }
        outcome
    }

    /// Remove a locally created object from the external system.
    ///
    /// The object is destroyed afterwards whatever the sink answers, so at
    /// most one removal is ever attempted.
    pub fn on_destroy(&mut self, object: &mut SyncedObject) -> EmitOutcome {
        if object.is_externally_created() {
            object.mark_destroyed();
            return self.skip(object, SkipReason::ExternallyCreated);
        }
        if object.is_destroyed() {
            return self.skip(object, SkipReason::Destroyed);
        }

        object.mark_destroyed();
        let result = self.sink.remove_object(object.identity());
        let outcome = self.finish(object.identity(), "remove_object", result);
        if outcome.is_sent() {
            self.stats.removals_sent += 1;
            debug!(identity = object.identity(), "object removed");
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{HeadingPitchRoll, LifecycleState};
    use crate::sink::{RecordingSink, SinkCall, SinkError};

    fn la_origin() -> GeodeticOrigin {
        GeodeticOrigin::new(34.0, -118.0, 100.0)
    }

    fn emitter() -> ObjectSyncEmitter<RecordingSink> {
        ObjectSyncEmitter::new(RecordingSink::new(), la_origin())
    }

    #[test]
    fn test_tick_sends_update_with_wire_keys() {
        let mut emitter = emitter();
        let mut object = SyncedObject::local("FirstPersonCharacter_0", "Gun");

        let outcome = emitter.on_tick(&mut object, &LocalPose::at(1000.0, 0.0, 0.0));
        assert_eq!(outcome, EmitOutcome::Sent);
        assert_eq!(object.state(), LifecycleState::Synced);

        match &emitter.sink().calls()[0] {
            SinkCall::UpdateObject { identity, type_tag, payload } => {
                assert_eq!(identity, "FirstPersonCharacter_0");
                assert_eq!(type_tag, "Gun");
                let keys: Vec<&str> = payload.keys().collect();
                assert_eq!(
                    keys,
                    vec![
                        "Location.x",
                        "Location.y",
                        "Location.z",
                        "Orientation.pitch",
                        "Orientation.yaw",
                        "Orientation.roll",
                    ]
                );
            }
            other => panic!("unexpected call {:?}", other),
        }
    }

    #[test]
    fn test_end_to_end_los_angeles() {
        let mut emitter = emitter();
        let mut object = SyncedObject::local("FirstPersonCharacter_0", "Gun");

        emitter.on_tick(&mut object, &LocalPose::at(1000.0, 0.0, 0.0));
        let payload = emitter.sink().object("FirstPersonCharacter_0").unwrap();

        assert!((payload.get("Location.x").unwrap() - -2485064.3542697863).abs() < 1e-3);
        assert!((payload.get("Location.y").unwrap() - -4673747.59970866).abs() < 1e-3);
        assert!((payload.get("Location.z").unwrap() - 3546502.4830710366).abs() < 1e-3);

        // No local rotation: only the frame term (psi = lon, theta = -lat)
        let lat = 34.0_f64.to_radians();
        let lon = (-118.0_f64).to_radians();
        assert!((payload.get("Orientation.pitch").unwrap() - lon).abs() < 1e-12);
        assert!(payload.get("Orientation.yaw").unwrap().abs() < 1e-12);
        assert!((payload.get("Orientation.roll").unwrap() + lat).abs() < 1e-12);
    }

    #[test]
    fn test_nan_pose_is_not_forwarded() {
        let mut emitter = emitter();
        let mut object = SyncedObject::local("Player_0", "Gun");

        for pose in [
            LocalPose::at(f64::NAN, 0.0, 0.0),
            LocalPose::at(0.0, f64::NAN, 0.0),
            LocalPose::at(0.0, 0.0, f64::NAN),
            LocalPose::new(Vector3::zeros(), HeadingPitchRoll::new(0.0, f64::INFINITY, 0.0)),
        ] {
            assert_eq!(
                emitter.on_tick(&mut object, &pose),
                EmitOutcome::Skipped(SkipReason::InvalidPose)
            );
        }

        assert!(emitter.sink().calls().is_empty());
        assert_eq!(emitter.stats().skipped_invalid, 4);
        assert_eq!(object.state(), LifecycleState::Created);
    }

    #[test]
    fn test_external_object_emits_nothing() {
        let mut emitter = emitter();
        let mut object = SyncedObject::external("Remote_7", "Gun");

        emitter.on_tick(&mut object, &LocalPose::at(0.0, 0.0, 0.0));
        emitter.on_fire(&object, &Vector3::new(10.0, 0.0, 0.0));
        let outcome = emitter.on_destroy(&mut object);

        assert_eq!(outcome, EmitOutcome::Skipped(SkipReason::ExternallyCreated));
        assert!(emitter.sink().calls().is_empty());
        assert_eq!(emitter.stats().skipped_external, 3);
        assert!(object.is_destroyed());
    }

    #[test]
    fn test_fire_sends_location_only() {
        let mut emitter = emitter();
        let object = SyncedObject::local("Player_0", "Gun");

        assert!(emitter.on_fire(&object, &Vector3::new(1000.0, 0.0, 0.0)).is_sent());

        let messages: Vec<_> = emitter.sink().messages().collect();
        assert_eq!(messages.len(), 1);
        let (name, payload) = messages[0];
        assert_eq!(name, "ShotFired");
        assert_eq!(payload.len(), 3);
        assert!((payload.get("Location.y").unwrap() - -4673747.59970866).abs() < 1e-3);
    }

    #[test]
    fn test_fire_with_non_finite_muzzle_is_skipped() {
        let mut emitter = emitter();
        let object = SyncedObject::local("Player_0", "Gun");

        for muzzle in [
            Vector3::new(f64::NAN, 0.0, 0.0),
            Vector3::new(0.0, f64::INFINITY, 0.0),
            Vector3::new(0.0, 0.0, f64::NEG_INFINITY),
        ] {
            assert_eq!(
                emitter.on_fire(&object, &muzzle),
                EmitOutcome::Skipped(SkipReason::InvalidPose)
            );
        }

        assert_eq!(emitter.sink().messages().count(), 0);
        assert!(emitter.sink().calls().is_empty());
        assert_eq!(emitter.stats().skipped_invalid, 3);
    }

    #[test]
    fn test_fire_after_destroy_is_skipped() {
        let mut emitter = emitter();
        let mut object = SyncedObject::local("Player_0", "Gun");

        emitter.on_tick(&mut object, &LocalPose::at(0.0, 0.0, 0.0));
        assert!(emitter.on_destroy(&mut object).is_sent());
        assert_eq!(
            emitter.on_fire(&object, &Vector3::new(100.0, 0.0, 0.0)),
            EmitOutcome::Skipped(SkipReason::Destroyed)
        );

        assert_eq!(emitter.sink().messages().count(), 0);
        assert!(!emitter
            .sink()
            .calls()
            .iter()
            .any(|call| matches!(call, SinkCall::SendMessage { .. })));
    }

    #[test]
    fn test_custom_event_name() {
        let mut emitter = emitter().with_fire_event_name("WeaponFire");
        let object = SyncedObject::local("Player_0", "Gun");

        emitter.on_fire(&object, &Vector3::zeros());
        assert_eq!(emitter.sink().messages().next().unwrap().0, "WeaponFire");
    }

    #[test]
    fn test_destroy_removes_once() {
        let mut emitter = emitter();
        let mut object = SyncedObject::local("Player_0", "Gun");

        emitter.on_tick(&mut object, &LocalPose::at(0.0, 0.0, 0.0));
        assert!(emitter.on_destroy(&mut object).is_sent());
        assert_eq!(
            emitter.on_destroy(&mut object),
            EmitOutcome::Skipped(SkipReason::Destroyed)
        );
        assert_eq!(
            emitter.on_tick(&mut object, &LocalPose::at(0.0, 0.0, 0.0)),
            EmitOutcome::Skipped(SkipReason::Destroyed)
        );

        assert_eq!(emitter.sink().removal_count(), 1);
        assert_eq!(emitter.sink().live_object_count(), 0);
    }

    #[test]
    fn test_sink_failure_is_dropped() {
        let mut emitter = emitter();
        let mut object = SyncedObject::local("Player_0", "Gun");
        emitter.sink_mut().disconnect();

        let outcome = emitter.on_tick(&mut object, &LocalPose::at(0.0, 0.0, 0.0));
        assert!(matches!(outcome, EmitOutcome::SinkFailed(SinkError::Disconnected { .. })));
        assert_eq!(object.state(), LifecycleState::Created);

        let outcome = emitter.on_destroy(&mut object);
        assert!(matches!(outcome, EmitOutcome::SinkFailed(_)));
        assert!(object.is_destroyed());

        emitter.sink_mut().reconnect();
        assert_eq!(
            emitter.on_destroy(&mut object),
            EmitOutcome::Skipped(SkipReason::Destroyed)
        );
        assert_eq!(emitter.stats().sink_failures, 2);
        assert_eq!(emitter.stats().total_sent(), 0);
    }

    #[test]
    fn test_repeated_ticks_upsert_same_key() {
        let mut emitter = emitter();
        let mut object = SyncedObject::local("Player_0", "Gun");

        emitter.on_tick(&mut object, &LocalPose::at(0.0, 0.0, 0.0));
        emitter.on_tick(&mut object, &LocalPose::at(500.0, 0.0, 0.0));

        assert_eq!(emitter.sink().update_count(), 2);
        assert_eq!(emitter.sink().live_object_count(), 1);
        assert_eq!(emitter.stats().updates_sent, 2);
    }

    #[test]
    fn test_pose_round_trip() {
        let emitter = emitter();
        let pose = LocalPose::new(
            Vector3::new(1250.0, -830.0, 42.0),
            HeadingPitchRoll::new(30.0, 10.0, -5.0),
        );

        let (ecef, orientation) = emitter.convert_pose(&pose);

        let enu = emitter.frame().ecef_to_enu(&ecef);
        let scene = emitter.unit_scale().from_meters(&enu);
        assert!((scene - pose.position).norm() < 1e-6 * pose.position.norm());

        let origin = emitter.origin();
        let angles = crate::core::EulerAngles {
            psi: orientation.pitch,
            theta: orientation.roll,
            phi: orientation.yaw,
        };
        let (yaw, pitch, roll) = crate::algorithms::euler_to_heading_pitch_roll(
            origin.latitude_rad(),
            origin.longitude_rad(),
            &angles,
        );
        assert!((yaw.to_degrees() - 30.0).abs() < 1e-6);
        assert!((pitch.to_degrees() - 10.0).abs() < 1e-6);
        assert!((roll.to_degrees() + 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_emitter_over_borrowed_sink() {
        let mut sink = RecordingSink::new();
        {
            let mut emitter = ObjectSyncEmitter::new(&mut sink, la_origin());
            let mut object = SyncedObject::local("Player_0", "Gun");
            emitter.on_tick(&mut object, &LocalPose::at(0.0, 0.0, 0.0));
        }
        assert_eq!(sink.update_count(), 1);
    }

    #[test]
    fn test_from_config_uses_scale_and_origin() {
        let mut config = SyncConfig::with_origin(la_origin());
        config.meters_per_scene_unit = 1.0;

        let mut emitter = ObjectSyncEmitter::from_config(RecordingSink::new(), &config);
        let mut object = SyncedObject::local("Player_0", "Gun");
        emitter.on_tick(&mut object, &LocalPose::at(10.0, 0.0, 0.0));

        let payload = emitter.sink().object("Player_0").unwrap();
        assert!((payload.get("Location.x").unwrap() - -2485064.3542697863).abs() < 1e-3);
        assert_eq!(emitter.origin(), &la_origin());
    }
}
