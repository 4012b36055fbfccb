use rand::{thread_rng, Rng};
use tokio::sync::Mutex;
use tokio::time::{sleep_until, Duration, Instant};
use tracing::debug;

/// Fixed-interval limiter shared by all batch workers.
///
/// Each call to `acquire` reserves the next free slot, so starts are spaced
/// at least `interval` apart no matter how many workers are waiting.
pub struct RateLimiter {
    interval: Duration,
    jitter: Duration,
    next_slot: Mutex<Option<Instant>>,
}

impl RateLimiter {
    pub fn new(interval: Duration, jitter: Duration) -> Self {
        Self {
            interval,
            jitter,
            next_slot: Mutex::new(None),
        }
    }

    /// Wait until this caller's slot comes up
    pub async fn acquire(&self) {
        let slot = {
            let mut next_slot = self.next_slot.lock().await;
            let now = Instant::now();
            let slot = match *next_slot {
                Some(next) if next > now => next,
                _ => now,
            };
            *next_slot = Some(slot + self.interval + self.random_jitter());
            slot
        };

        if slot > Instant::now() {
            debug!("Waiting {:?} for rate limiter", slot - Instant::now());
            sleep_until(slot).await;
        }
    }

    fn random_jitter(&self) -> Duration {
        if self.jitter.is_zero() {
            return Duration::ZERO;
        }
        let millis = self.jitter.as_millis() as u64;
        Duration::from_millis(thread_rng().gen_range(0..=millis))
    }
}
