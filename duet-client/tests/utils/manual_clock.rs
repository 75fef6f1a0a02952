use duet_client::Clock;
use std::sync::{Arc, Mutex};

/// Clock whose reading only changes when a test says so.
#[derive(Clone)]
pub struct ManualClock {
    now: Arc<Mutex<f64>>,
}

impl ManualClock {
    pub fn new(start: f64) -> Self {
        Self {
            now: Arc::new(Mutex::new(start)),
        }
    }

    pub fn set(&self, now: f64) {
        *self.now.lock().unwrap() = now;
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        *self.now.lock().unwrap()
    }
}
