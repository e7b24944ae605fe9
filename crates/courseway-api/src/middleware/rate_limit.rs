//! Token-bucket rate limiting, applied before any other gate stage.
//!
//! Every client IP owns a bucket of `capacity` tokens that refills at a
//! fixed rate. Each request spends one token; an empty bucket means 429.
//! Bucket state lives in a keyed store behind the [`BucketStore`] trait so
//! the backend can be swapped (and faulted) in tests. A store failure
//! admits the request: rate limiting is protective, and an infrastructure
//! outage must not take all traffic down with it.

use axum::{
    body::Body,
    extract::{ConnectInfo, Request},
    middleware::Next,
    response::{IntoResponse, Response},
    Extension,
};
use courseway_store::StoreError;
use parking_lot::Mutex;
use std::{
    collections::HashMap,
    net::{IpAddr, SocketAddr},
    sync::Arc,
    time::Instant,
};

use crate::error::ApiError;

/// Default bucket capacity (maximum burst size).
pub const DEFAULT_CAPACITY: f64 = 3.0;

/// Default refill rate in tokens per millisecond.
pub const DEFAULT_REFILL_PER_MS: f64 = 0.0003;

/// Default bound on tracked clients before stale buckets are evicted.
pub const DEFAULT_MAX_CLIENTS: usize = 10_000;

/// Configuration for the token-bucket limiter.
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Maximum tokens a bucket can hold.
    pub capacity: f64,
    /// Tokens added per elapsed millisecond.
    pub refill_per_ms: f64,
    /// Maximum number of client buckets kept in memory.
    pub max_clients: usize,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            refill_per_ms: DEFAULT_REFILL_PER_MS,
            max_clients: DEFAULT_MAX_CLIENTS,
        }
    }
}

/// Per-client bucket state.
#[derive(Debug, Clone, Copy)]
pub struct BucketState {
    /// Remaining tokens, always within `0..=capacity`.
    pub tokens: f64,
    /// When the bucket was last refilled.
    pub last_refill: Instant,
}

/// Keyed store for bucket state.
///
/// `update` must run the closure under a per-key critical section:
/// concurrent requests from one client must never observe a stale token
/// count (no double-spend).
pub trait BucketStore: Send + Sync {
    /// Apply `f` to the bucket for `key`, inserting `init` for unseen
    /// keys, and return `f`'s result.
    fn update(
        &self,
        key: IpAddr,
        init: BucketState,
        f: &mut dyn FnMut(&mut BucketState) -> bool,
    ) -> Result<bool, StoreError>;
}

/// In-memory bucket store.
///
/// A single lock over the map serializes all read-modify-write cycles,
/// which satisfies the per-key atomicity requirement. Past `max_clients`
/// tracked entries, the least recently refilled bucket is evicted.
#[derive(Debug)]
pub struct InMemoryBucketStore {
    buckets: Mutex<HashMap<IpAddr, BucketState>>,
    max_clients: usize,
}

impl InMemoryBucketStore {
    #[must_use]
    pub fn new(max_clients: usize) -> Self {
        Self {
            buckets: Mutex::new(HashMap::new()),
            max_clients: max_clients.max(1),
        }
    }

    /// Number of clients currently tracked.
    #[must_use]
    pub fn tracked_clients(&self) -> usize {
        self.buckets.lock().len()
    }
}

impl BucketStore for InMemoryBucketStore {
    fn update(
        &self,
        key: IpAddr,
        init: BucketState,
        f: &mut dyn FnMut(&mut BucketState) -> bool,
    ) -> Result<bool, StoreError> {
        let mut buckets = self.buckets.lock();

        if !buckets.contains_key(&key) && buckets.len() >= self.max_clients {
            // Evict the least recently refilled bucket to stay bounded.
            if let Some(stalest) = buckets
                .iter()
                .min_by_key(|(_, state)| state.last_refill)
                .map(|(ip, _)| *ip)
            {
                buckets.remove(&stalest);
            }
        }

        let state = buckets.entry(key).or_insert(init);
        Ok(f(state))
    }
}

/// Outcome of a rate-limit check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// The request may proceed.
    Allowed,
    /// The bucket is empty; the client should wait.
    Throttled { retry_after_secs: u64 },
}

/// The token-bucket rate limiter.
#[derive(Clone)]
pub struct RateLimiter {
    config: RateLimitConfig,
    store: Arc<dyn BucketStore>,
}

impl RateLimiter {
    /// Create a limiter backed by an in-memory bucket store.
    #[must_use]
    pub fn new(config: RateLimitConfig) -> Self {
        let store = Arc::new(InMemoryBucketStore::new(config.max_clients));
        Self { config, store }
    }

    /// Create a limiter over an externally provided bucket store.
    #[must_use]
    pub fn with_store(config: RateLimitConfig, store: Arc<dyn BucketStore>) -> Self {
        Self { config, store }
    }

    /// Decide whether a request from `client` may proceed.
    #[must_use]
    pub fn admit(&self, client: IpAddr) -> Admission {
        self.admit_at(client, Instant::now())
    }

    fn admit_at(&self, client: IpAddr, now: Instant) -> Admission {
        let init = BucketState {
            tokens: self.config.capacity,
            last_refill: now,
        };
        let capacity = self.config.capacity;
        let rate = self.config.refill_per_ms;

        let result = self.store.update(client, init, &mut |state| {
            let elapsed_ms = now.duration_since(state.last_refill).as_millis() as f64;
            let refill = (elapsed_ms * rate).floor();
            state.tokens = (state.tokens + refill).min(capacity);
            state.last_refill = now;

            if state.tokens >= 1.0 {
                state.tokens -= 1.0;
                true
            } else {
                false
            }
        });

        match result {
            Ok(true) => Admission::Allowed,
            Ok(false) => {
                tracing::debug!(client = %client, "request throttled");
                Admission::Throttled {
                    retry_after_secs: self.retry_after_secs(),
                }
            }
            Err(e) => {
                // Fail-open: never block all traffic on a store outage.
                tracing::warn!(
                    client = %client,
                    error = %e,
                    "bucket store unavailable, admitting request"
                );
                Admission::Allowed
            }
        }
    }

    /// Seconds until an empty bucket earns its next token.
    fn retry_after_secs(&self) -> u64 {
        if self.config.refill_per_ms > 0.0 {
            let millis = 1.0 / self.config.refill_per_ms;
            ((millis / 1000.0).ceil() as u64).max(1)
        } else {
            1
        }
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &RateLimitConfig {
        &self.config
    }
}

/// Rate limiting middleware. Runs before authentication on every route.
pub async fn rate_limit_middleware(
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    Extension(limiter): Extension<Arc<RateLimiter>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    match limiter.admit(addr.ip()) {
        Admission::Allowed => next.run(request).await,
        Admission::Throttled { retry_after_secs } => {
            ApiError::Throttled { retry_after_secs }.into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn test_ip() -> IpAddr {
        "192.168.1.1".parse().unwrap()
    }

    fn test_ip_2() -> IpAddr {
        "192.168.1.2".parse().unwrap()
    }

    /// A limiter whose bucket never refills, for deterministic burst tests.
    fn frozen_limiter(capacity: f64) -> RateLimiter {
        RateLimiter::new(RateLimitConfig {
            capacity,
            refill_per_ms: 0.0,
            max_clients: 100,
        })
    }

    fn is_allowed(admission: Admission) -> bool {
        admission == Admission::Allowed
    }

    #[test]
    fn allows_burst_up_to_capacity_then_throttles() {
        let limiter = frozen_limiter(3.0);
        let ip = test_ip();

        assert!(is_allowed(limiter.admit(ip)));
        assert!(is_allowed(limiter.admit(ip)));
        assert!(is_allowed(limiter.admit(ip)));

        assert!(matches!(limiter.admit(ip), Admission::Throttled { .. }));
    }

    #[test]
    fn different_clients_have_independent_buckets() {
        let limiter = frozen_limiter(1.0);

        assert!(is_allowed(limiter.admit(test_ip())));
        assert!(matches!(limiter.admit(test_ip()), Admission::Throttled { .. }));

        assert!(is_allowed(limiter.admit(test_ip_2())));
    }

    #[test]
    fn refill_readmits_previously_throttled_client() {
        let limiter = RateLimiter::new(RateLimitConfig {
            capacity: 3.0,
            refill_per_ms: 0.0003,
            max_clients: 100,
        });
        let ip = test_ip();
        let t0 = Instant::now();

        for _ in 0..3 {
            assert!(is_allowed(limiter.admit_at(ip, t0)));
        }
        assert!(matches!(
            limiter.admit_at(ip, t0),
            Admission::Throttled { .. }
        ));

        // 10 seconds later: floor(10000 * 0.0003) = 3 tokens refilled.
        let t1 = t0 + Duration::from_millis(10_000);
        assert!(is_allowed(limiter.admit_at(ip, t1)));
    }

    #[test]
    fn tokens_never_exceed_capacity() {
        let limiter = RateLimiter::new(RateLimitConfig {
            capacity: 3.0,
            refill_per_ms: 0.0003,
            max_clients: 100,
        });
        let ip = test_ip();
        let t0 = Instant::now();

        // Seed the bucket, then idle long enough to earn far more than
        // capacity if accumulation were unbounded.
        assert!(is_allowed(limiter.admit_at(ip, t0)));
        let t1 = t0 + Duration::from_secs(1000);

        let mut allowed = 0;
        for _ in 0..10 {
            if is_allowed(limiter.admit_at(ip, t1)) {
                allowed += 1;
            }
        }
        assert_eq!(allowed, 3);
    }

    #[test]
    fn scenario_four_requests_then_refill() {
        // Spec scenario: capacity 3, refill 0.0003 tokens/ms. Four
        // requests at t=0: three allowed, one throttled. At t=10s the
        // refill is floor(10000 * 0.0003) = 3 and the client is admitted.
        let limiter = RateLimiter::new(RateLimitConfig {
            capacity: 3.0,
            refill_per_ms: 0.0003,
            max_clients: 100,
        });
        let ip = test_ip();
        let t0 = Instant::now();

        let outcomes: Vec<bool> = (0..4).map(|_| is_allowed(limiter.admit_at(ip, t0))).collect();
        assert_eq!(outcomes, vec![true, true, true, false]);

        let t1 = t0 + Duration::from_millis(10_000);
        assert!(is_allowed(limiter.admit_at(ip, t1)));
    }

    #[test]
    fn sub_token_refill_rounds_down() {
        let limiter = RateLimiter::new(RateLimitConfig {
            capacity: 1.0,
            refill_per_ms: 0.0003,
            max_clients: 100,
        });
        let ip = test_ip();
        let t0 = Instant::now();

        assert!(is_allowed(limiter.admit_at(ip, t0)));

        // 1000ms * 0.0003 = 0.3 tokens, floored to zero.
        let t1 = t0 + Duration::from_millis(1000);
        assert!(matches!(
            limiter.admit_at(ip, t1),
            Admission::Throttled { .. }
        ));
    }

    #[test]
    fn concurrent_requests_never_overspend() {
        let limiter = Arc::new(frozen_limiter(3.0));
        let ip = test_ip();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let limiter = Arc::clone(&limiter);
                std::thread::spawn(move || is_allowed(limiter.admit(ip)))
            })
            .collect();

        let allowed = handles
            .into_iter()
            .filter(|h| *h.join().unwrap())
            .count();
        assert_eq!(allowed, 3);
    }

    #[test]
    fn throttled_reports_retry_after() {
        let limiter = RateLimiter::new(RateLimitConfig {
            capacity: 1.0,
            refill_per_ms: 0.0003,
            max_clients: 100,
        });
        let ip = test_ip();

        assert!(is_allowed(limiter.admit(ip)));
        match limiter.admit(ip) {
            Admission::Throttled { retry_after_secs } => {
                // One token every 3334ms rounds up to 4 seconds.
                assert_eq!(retry_after_secs, 4);
            }
            Admission::Allowed => panic!("expected throttle"),
        }
    }

    #[test]
    fn store_failure_fails_open() {
        struct FailingStore;

        impl BucketStore for FailingStore {
            fn update(
                &self,
                _key: IpAddr,
                _init: BucketState,
                _f: &mut dyn FnMut(&mut BucketState) -> bool,
            ) -> Result<bool, StoreError> {
                Err(StoreError::Unavailable("connection refused".to_string()))
            }
        }

        let limiter =
            RateLimiter::with_store(RateLimitConfig::default(), Arc::new(FailingStore));

        // Every request is admitted despite the outage.
        for _ in 0..10 {
            assert!(is_allowed(limiter.admit(test_ip())));
        }
    }

    #[test]
    fn tracked_clients_stay_bounded() {
        let store = Arc::new(InMemoryBucketStore::new(2));
        let limiter = RateLimiter::with_store(
            RateLimitConfig {
                capacity: 3.0,
                refill_per_ms: 0.0,
                max_clients: 2,
            },
            Arc::clone(&store) as Arc<dyn BucketStore>,
        );

        for i in 0..5u8 {
            let ip: IpAddr = format!("10.0.0.{i}").parse().unwrap();
            limiter.admit(ip);
        }

        assert!(store.tracked_clients() <= 2);
    }
}
