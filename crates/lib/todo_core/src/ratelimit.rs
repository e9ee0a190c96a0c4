//! Sliding-window request rate limiter.
//!
//! One timestamp queue per client identity. The endpoint class only picks the
//! limit applied to that shared queue, so auth and default traffic from the
//! same client count against each other.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use tracing::debug;

/// Path prefix that selects the stricter auth limit.
pub const AUTH_PATH_PREFIX: &str = "/auth";

/// Which limit tier a request falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointClass {
    Auth,
    Default,
}

impl EndpointClass {
    /// Classify a request path.
    pub fn for_path(path: &str) -> Self {
        if path.starts_with(AUTH_PATH_PREFIX) {
            EndpointClass::Auth
        } else {
            EndpointClass::Default
        }
    }
}

/// Configuration for the rate limiter.
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Requests per window for non-auth endpoints.
    pub requests_per_window: usize,

    /// Requests per window for `/auth*` endpoints.
    pub auth_requests_per_window: usize,

    /// Trailing window length.
    pub window: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            requests_per_window: 10,
            auth_requests_per_window: 5,
            window: Duration::from_secs(60),
        }
    }
}

impl RateLimitConfig {
    pub fn limit_for(&self, class: EndpointClass) -> usize {
        match class {
            EndpointClass::Auth => self.auth_requests_per_window,
            EndpointClass::Default => self.requests_per_window,
        }
    }
}

/// Thread-safe sliding-window limiter.
///
/// Each client's queue is guarded by its map shard lock for the whole
/// evict-count-append step, so concurrent requests from one client cannot
/// both slip under the limit.
#[derive(Debug)]
pub struct RateLimiter {
    config: RateLimitConfig,
    windows: DashMap<String, VecDeque<Instant>>,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            windows: DashMap::new(),
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(RateLimitConfig::default())
    }

    /// Admit or reject a request from `client_id` right now.
    ///
    /// The clock is read under the client's lock, so each queue stays
    /// ordered by time even when requests from one client race.
    pub fn admit(&self, client_id: &str, class: EndpointClass) -> bool {
        self.admit_with(client_id, class, Instant::now)
    }

    /// Admit or reject a request from `client_id` as of `now`.
    pub fn admit_at(&self, client_id: &str, class: EndpointClass, now: Instant) -> bool {
        self.admit_with(client_id, class, || now)
    }

    fn admit_with(
        &self,
        client_id: &str,
        class: EndpointClass,
        clock: impl FnOnce() -> Instant,
    ) -> bool {
        let limit = self.config.limit_for(class);
        let admitted = self.check_with(client_id, limit, self.config.window, clock);
        if !admitted {
            debug!(client_id, ?class, limit, "rate limit exceeded");
        }
        admitted
    }

    /// Core window step: evict entries older than `now - window`, reject if
    /// `limit` are still in the window, otherwise record `now` and admit.
    ///
    /// Rejected requests are not recorded.
    pub fn check(&self, client_id: &str, limit: usize, window: Duration, now: Instant) -> bool {
        self.check_with(client_id, limit, window, || now)
    }

    fn check_with(
        &self,
        client_id: &str,
        limit: usize,
        window: Duration,
        clock: impl FnOnce() -> Instant,
    ) -> bool {
        let mut queue = self.windows.entry(client_id.to_string()).or_default();
        let now = clock();

        while queue
            .front()
            .is_some_and(|&ts| now.saturating_duration_since(ts) > window)
        {
            queue.pop_front();
        }

        if queue.len() >= limit {
            return false;
        }
        queue.push_back(now);
        true
    }

    /// Requests currently recorded for `client_id` (as of the last check).
    pub fn recorded(&self, client_id: &str) -> usize {
        self.windows.get(client_id).map_or(0, |q| q.len())
    }

    /// Number of client identities seen so far.
    pub fn tracked_clients(&self) -> usize {
        self.windows.len()
    }
}
