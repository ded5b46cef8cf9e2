use std::{
    sync::{Mutex, PoisonError},
    time::{Duration, Instant},
};

/// Token bucket for services that publish a request quota
#[derive(Debug)]
pub struct TranslationLimiter {
    max_burst: f64,
    tokens_per_sec: f64,
    tokens: f64,
    last_update: Instant,
}

impl TranslationLimiter {
    pub fn new(max_burst: u32, per_minute: u32) -> Self {
        Self {
            max_burst: f64::from(max_burst),
            tokens_per_sec: f64::from(per_minute) / 60.0,
            tokens: f64::from(max_burst),
            last_update: Instant::now(),
        }
    }

    /// Take a token at `now`, or return how long to wait for the next one.
    pub fn take(&mut self, now: Instant) -> Result<(), Duration> {
        let elapsed = now.saturating_duration_since(self.last_update).as_secs_f64();

        self.tokens = (self.tokens + elapsed * self.tokens_per_sec).min(self.max_burst);
        self.last_update = now;

        if self.tokens >= 1.0 {
            self.tokens -= 1.0;
            Ok(())
        } else if self.tokens_per_sec > 0.0 {
            Err(Duration::from_secs_f64(
                (1.0 - self.tokens) / self.tokens_per_sec,
            ))
        } else {
            Err(Duration::from_secs(60))
        }
    }
}

/// Shared limiter, blocks the caller until a request is allowed
#[derive(Debug)]
pub struct SyncRateLimiter(Mutex<TranslationLimiter>);

impl SyncRateLimiter {
    pub fn new(max_burst: u32, per_minute: u32) -> Self {
        Self(Mutex::new(TranslationLimiter::new(max_burst, per_minute)))
    }

    pub fn run<F, R>(&self, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        let mut guard = self.0.lock().unwrap_or_else(PoisonError::into_inner);

        while let Err(wait_time) = guard.take(Instant::now()) {
            drop(guard);
            std::thread::sleep(wait_time);
            guard = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        }
        drop(guard);

        f()
    }
}

#[test]
fn test_limiter_allows_burst() {
    let mut limiter = TranslationLimiter::new(3, 60);
    let now = limiter.last_update;

    assert_eq!(limiter.take(now), Ok(()));
    assert_eq!(limiter.take(now), Ok(()));
    assert_eq!(limiter.take(now), Ok(()));

    let wait = limiter.take(now).unwrap_err();
    assert!(wait <= Duration::from_secs(1));
    assert!(wait > Duration::from_millis(900));
}

#[test]
fn test_limiter_refills() {
    let mut limiter = TranslationLimiter::new(1, 20);
    let start = limiter.last_update;

    assert_eq!(limiter.take(start), Ok(()));
    assert!(limiter.take(start).is_err());
    assert_eq!(limiter.take(start + Duration::from_secs(4)), Ok(()));
}

#[test]
fn test_sync_limiter_runs_closure() {
    let limiter = SyncRateLimiter::new(2, 20);

    assert_eq!(limiter.run(|| 1 + 1), 2);
    assert_eq!(limiter.run(|| "translated"), "translated");
}
