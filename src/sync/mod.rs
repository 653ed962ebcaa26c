//! Object state synchronization with the external system

pub mod emitter;
pub mod throttle;

pub use emitter::ObjectSyncEmitter;
pub use throttle::TickThrottle;

/// Why an emit operation produced no sink call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The object belongs to the external system
    ExternallyCreated,
    /// Position or orientation contained NaN or infinity
    InvalidPose,
    /// The object has already been destroyed
    Destroyed,
}

/// Result of a single emit operation
#[derive(Debug, Clone, PartialEq)]
pub enum EmitOutcome {
    /// The sink accepted the call
    Sent,
    /// Nothing was sent
    Skipped(SkipReason),
    /// The sink refused the call; the failure was logged and dropped
    SinkFailed(crate::sink::SinkError),
}

impl EmitOutcome {
    pub fn is_sent(&self) -> bool {
        matches!(self, EmitOutcome::Sent)
    }
}

/// Counters kept by the emitter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SyncStats {
    pub updates_sent: u64,
    pub messages_sent: u64,
    pub removals_sent: u64,
    pub skipped_external: u64,
    pub skipped_invalid: u64,
    pub skipped_destroyed: u64,
    pub sink_failures: u64,
}

impl SyncStats {
    pub fn total_sent(&self) -> u64 {
        self.updates_sent + self.messages_sent + self.removals_sent
    }

    pub(crate) fn record_skip(&mut self, reason: SkipReason) {
        match reason {
            SkipReason::ExternallyCreated => self.skipped_external += 1,
            SkipReason::InvalidPose => self.skipped_invalid += 1,
            SkipReason::Destroyed => self.skipped_destroyed += 1,
        }
    }
}
