use std::time::{Instant, SystemTime, UNIX_EPOCH};

/// Millisecond clock used to stamp probes. Only differences between two
/// readings of the same clock are meaningful.
pub trait Clock: Send + Sync {
    fn now_ms(&self) -> f64;
}

/// Epoch milliseconds sampled once at construction, advanced by a monotonic
/// `Instant` afterwards so wall-clock steps never skew a round trip.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
    origin_ms: f64,
}

impl SystemClock {
    pub fn new() -> Self {
        let origin_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as f64)
            .unwrap_or_default();
        Self {
            origin: Instant::now(),
            origin_ms,
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> f64 {
        self.origin_ms + self.origin.elapsed().as_secs_f64() * 1000.0
    }
}
