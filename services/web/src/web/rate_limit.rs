//! services/web/src/web/rate_limit.rs
//!
//! A fixed-window request counter keyed by client address, used to throttle
//! the login route.

use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

struct Window {
    started: Instant,
    count: u32,
}

/// Counts attempts per client IP within a fixed window.
///
/// Cloning is cheap; clones share the same counters, so one limiter can be
/// checked concurrently from every in-flight request.
#[derive(Clone)]
pub struct RateLimiter {
    max_attempts: u32,
    window: Duration,
    windows: Arc<Mutex<HashMap<IpAddr, Window>>>,
}

impl RateLimiter {
    pub fn new(max_attempts: u32, window: Duration) -> Self {
        Self {
            max_attempts,
            window,
            windows: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Records one attempt from `addr` and reports whether it is within the
    /// cap. The window restarts once its duration has fully elapsed.
    pub fn try_acquire(&self, addr: IpAddr) -> bool {
        let mut windows = match self.windows.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        let now = Instant::now();
        // Drop every elapsed window, not just this address's, so the map
        // stays bounded by the set of clients seen within one window.
        windows.retain(|_, w| now.duration_since(w.started) < self.window);

        let window = windows.entry(addr).or_insert(Window {
            started: now,
            count: 0,
        });

        window.count += 1;
        window.count <= self.max_attempts
    }
}
