use governor::{
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
    Quota, RateLimiter,
};
use std::num::NonZeroU32;
use std::sync::Mutex;
use std::thread;
use std::time::{Duration, Instant};

const QUOTA_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Process-wide pacing gate shared by every endpoint of one client.
///
/// Two limits apply to each request:
/// - a minimum spacing measured from the previous dispatch
/// - a token bucket sized to the published per-second quota
///
/// Each client owns its own throttle, so two clients never share state.
pub struct RequestThrottle {
    min_spacing: Duration,
    last_dispatch: Mutex<Option<Instant>>,
    quota: RateLimiter<NotKeyed, InMemoryState, DefaultClock>,
}

impl RequestThrottle {
    pub fn new(min_spacing: Duration, requests_per_second: u32) -> Self {
        let per_second = NonZeroU32::new(requests_per_second).unwrap_or(NonZeroU32::MIN);
        RequestThrottle {
            min_spacing,
            last_dispatch: Mutex::new(None),
            quota: RateLimiter::direct(Quota::per_second(per_second)),
        }
    }

    /// Blocks until the next request may be sent and returns its dispatch instant.
    pub fn wait(&self) -> Instant {
        let mut last = self
            .last_dispatch
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if let Some(previous) = *last {
            let elapsed = previous.elapsed();
            if elapsed < self.min_spacing {
                thread::sleep(self.min_spacing - elapsed);
            }
        }

        while self.quota.check().is_err() {
            thread::sleep(QUOTA_POLL_INTERVAL);
        }

        let now = Instant::now();
        *last = Some(now);
        now
    }
}
