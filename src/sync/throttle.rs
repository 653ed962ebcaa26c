//! Update rate limiting for object sync ticks

/// Admits at most one sync per interval.
///
/// Timestamps are caller-supplied milliseconds from any monotonic source.
#[derive(Debug, Clone)]
pub struct TickThrottle {
    interval_ms: u64,
    last_sync_ms: Option<u64>,
}

impl TickThrottle {
    pub fn new(interval_ms: u64) -> Self {
        Self {
            interval_ms,
            last_sync_ms: None,
        }
    }

    /// Target update rate in Hz
    pub fn from_rate_hz(rate_hz: f64) -> Self {
        let interval_ms = if rate_hz > 0.0 {
            (1000.0 / rate_hz).round() as u64
        } else {
            0
        };
        Self::new(interval_ms)
    }

    pub fn interval_ms(&self) -> u64 {
        self.interval_ms
    }

    /// Whether a sync is due at `now_ms`; records it when it is
    pub fn should_sync(&mut self, now_ms: u64) -> bool {
        let due = match self.last_sync_ms {
            None => true,
            // A clock that steps backwards restarts the interval
            Some(last) if now_ms < last => true,
            Some(last) => now_ms - last >= self.interval_ms,
        };

        if due {
            self.last_sync_ms = Some(now_ms);
        }
        due
    }

    pub fn reset(&mut self) {
        self.last_sync_ms = None;
    }
}
