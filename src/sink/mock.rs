//! In-memory sink for tests and offline runs

use std::collections::HashMap;

use crate::sink::{Payload, SinkCall, SinkError, SinkResult, SyncSink};

/// Sink that records every call and keeps an upserted view of live objects
#[derive(Debug, Default)]
pub struct RecordingSink {
    calls: Vec<SinkCall>,
    objects: HashMap<String, (String, Payload)>,
    disconnected: bool,
    failed_calls: u32,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate loss of the external system; every call fails until reconnect
    pub fn disconnect(&mut self) {
        self.disconnected = true;
    }

    pub fn reconnect(&mut self) {
        self.disconnected = false;
    }

    pub fn is_connected(&self) -> bool {
        !self.disconnected
    }

    /// All calls accepted so far, in order
    pub fn calls(&self) -> &[SinkCall] {
        &self.calls
    }

    pub fn take_calls(&mut self) -> Vec<SinkCall> {
        std::mem::take(&mut self.calls)
    }

    pub fn clear(&mut self) {
        self.calls.clear();
        self.objects.clear();
        self.failed_calls = 0;
    }

    /// Number of calls refused while disconnected
    pub fn failed_calls(&self) -> u32 {
        self.failed_calls
    }

    /// Current payload of a live object
    pub fn object(&self, identity: &str) -> Option<&Payload> {
        self.objects.get(identity).map(|(_, payload)| payload)
    }

    /// Type tag of a live object
    pub fn object_type(&self, identity: &str) -> Option<&str> {
        self.objects.get(identity).map(|(tag, _)| tag.as_str())
    }

    pub fn live_object_count(&self) -> usize {
        self.objects.len()
    }

    pub fn messages(&self) -> impl Iterator<Item = (&str, &Payload)> {
        self.calls.iter().filter_map(|call| match call {
            SinkCall::SendMessage { event_name, payload } => Some((event_name.as_str(), payload)),
            _ => None,
        })
    }

    pub fn update_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|call| matches!(call, SinkCall::UpdateObject { .. }))
            .count()
    }

    pub fn removal_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|call| matches!(call, SinkCall::RemoveObject { .. }))
            .count()
    }

    fn check_connected(&mut self) -> SinkResult<()> {
        if self.disconnected {
            self.failed_calls += 1;
            return Err(SinkError::Disconnected {
                peer: "recording".to_string(),
            });
        }
        Ok(())
    }
}

impl SyncSink for RecordingSink {
    fn send_message(&mut self, event_name: &str, payload: &Payload) -> SinkResult<()> {
        self.check_connected()?;
        self.calls.push(SinkCall::SendMessage {
            event_name: event_name.to_string(),
            payload: payload.clone(),
        });
        Ok(())
    }

    fn update_object(&mut self, identity: &str, type_tag: &str, payload: &Payload) -> SinkResult<()> {
        self.check_connected()?;
        self.objects
            .insert(identity.to_string(), (type_tag.to_string(), payload.clone()));
        self.calls.push(SinkCall::UpdateObject {
            identity: identity.to_string(),
            type_tag: type_tag.to_string(),
            payload: payload.clone(),
        });
        Ok(())
    }

    fn remove_object(&mut self, identity: &str) -> SinkResult<()> {
        self.check_connected()?;
        self.objects.remove(identity);
        self.calls.push(SinkCall::RemoveObject {
            identity: identity.to_string(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_calls_in_order() {
        let mut sink = RecordingSink::new();
        let payload = Payload::new().with("Location.x", 1.0);

        sink.update_object("Player_0", "Gun", &payload).unwrap();
        sink.send_message("ShotFired", &payload).unwrap();
        sink.remove_object("Player_0").unwrap();

        assert_eq!(sink.calls().len(), 3);
        assert!(matches!(sink.calls()[0], SinkCall::UpdateObject { .. }));
        assert!(matches!(sink.calls()[1], SinkCall::SendMessage { .. }));
        assert!(matches!(sink.calls()[2], SinkCall::RemoveObject { .. }));
    }

    #[test]
    fn test_update_is_upsert() {
        let mut sink = RecordingSink::new();

        sink.update_object("Player_0", "Gun", &Payload::new().with("Location.x", 1.0)).unwrap();
        sink.update_object("Player_0", "Gun", &Payload::new().with("Location.x", 2.0)).unwrap();

        assert_eq!(sink.live_object_count(), 1);
        assert_eq!(sink.object("Player_0").unwrap().get("Location.x"), Some(2.0));
        assert_eq!(sink.object_type("Player_0"), Some("Gun"));
        assert_eq!(sink.update_count(), 2);

        sink.remove_object("Player_0").unwrap();
        assert_eq!(sink.live_object_count(), 0);
    }

    #[test]
    fn test_disconnect_simulation() {
        let mut sink = RecordingSink::new();
        sink.disconnect();

        let result = sink.remove_object("Player_0");
        assert!(matches!(result, Err(SinkError::Disconnected { .. })));
        assert_eq!(sink.failed_calls(), 1);
        assert!(sink.calls().is_empty());

        sink.reconnect();
        assert!(sink.remove_object("Player_0").is_ok());
        assert_eq!(sink.removal_count(), 1);
    }
}
