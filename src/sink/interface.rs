//! Sink trait consumed by the synchronization core

use crate::sink::{Payload, SinkResult};

/// Connection to the external simulation system
pub trait SyncSink {
    /// Send a named event (e.g. "ShotFired") with its attributes
    fn send_message(&mut self, event_name: &str, payload: &Payload) -> SinkResult<()>;

    /// Create or replace the object keyed by `identity`
    fn update_object(&mut self, identity: &str, type_tag: &str, payload: &Payload) -> SinkResult<()>;

    /// Remove the object keyed by `identity`
    fn remove_object(&mut self, identity: &str) -> SinkResult<()>;
}

impl<S: SyncSink + ?Sized> SyncSink for &mut S {
    fn send_message(&mut self, event_name: &str, payload: &Payload) -> SinkResult<()> {
        (**self).send_message(event_name, payload)
    }

    fn update_object(&mut self, identity: &str, type_tag: &str, payload: &Payload) -> SinkResult<()> {
        (**self).update_object(identity, type_tag, payload)
    }

    fn remove_object(&mut self, identity: &str) -> SinkResult<()> {
        (**self).remove_object(identity)
    }
}

impl<S: SyncSink + ?Sized> SyncSink for Box<S> {
    fn send_message(&mut self, event_name: &str, payload: &Payload) -> SinkResult<()> {
        (**self).send_message(event_name, payload)
    }

    fn update_object(&mut self, identity: &str, type_tag: &str, payload: &Payload) -> SinkResult<()> {
        (**self).update_object(identity, type_tag, payload)
    }

    fn remove_object(&mut self, identity: &str) -> SinkResult<()> {
        (**self).remove_object(identity)
    }
}
