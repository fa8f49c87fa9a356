use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{sleep_until, Instant};

/// Spaces out requests so that consecutive ones are at least `delay` apart.
///
/// Shared between tasks: each caller reserves the next free slot under the
/// lock and sleeps outside of it.
pub struct RateLimiter {
    delay: Duration,
    next_slot: Mutex<Option<Instant>>,
}

impl RateLimiter {
    pub fn new(delay_ms: u64) -> Self {
        Self {
            delay: Duration::from_millis(delay_ms),
            next_slot: Mutex::new(None),
        }
    }

    pub async fn wait(&self) {
        if self.delay.is_zero() {
            return;
        }
        let slot = self.reserve().await;
        sleep_until(slot).await;
    }

    async fn reserve(&self) -> Instant {
        let mut next_slot = self.next_slot.lock().await;
        let now = Instant::now();
        let slot = match *next_slot {
            Some(at) if at > now => at,
            _ => now,
        };
        *next_slot = Some(slot + self.delay);
        slot
    }
}
