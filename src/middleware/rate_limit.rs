use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use axum::body::Body;
use axum::extract::State;
use axum::http::{Request, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::middleware::auth::Claims;

const WINDOW: Duration = Duration::from_secs(1);

#[derive(Debug)]
struct CallerWindow {
    start: Instant,
    count: u32,
}

/// Fixed one-second window per caller. Each route group gets its own limiter,
/// and within a group each authenticated subject has its own budget, so one
/// noisy client cannot starve the rest of the staff.
#[derive(Clone, Debug)]
pub struct RateLimiter {
    rps: u32,
    windows: Arc<Mutex<HashMap<String, CallerWindow>>>,
}

impl RateLimiter {
    fn new(rps: u32) -> Self {
        Self {
            rps: rps.max(1),
            windows: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    fn allow(&self, key: &str) -> bool {
        let mut guard = self.windows.lock().expect("rate limiter mutex poisoned");
        let now = Instant::now();
        guard.retain(|_, w| now.duration_since(w.start) < WINDOW);

        let window = guard.entry(key.to_string()).or_insert(CallerWindow {
            start: now,
            count: 0,
        });
        if now.duration_since(window.start) >= WINDOW {
            window.start = now;
            window.count = 0;
        }
        if window.count < self.rps {
            window.count += 1;
            true
        } else {
            false
        }
    }
}

pub async fn rps_middleware(
    State(state): State<RateLimiter>,
    req: Request<Body>,
    next: Next,
) -> Response {
    // Auth runs before this layer; requests that never made it through it
    // share one bucket.
    let key = req
        .extensions()
        .get::<Claims>()
        .map(|claims| claims.sub.clone())
        .unwrap_or_else(|| "anonymous".to_string());
    if !state.allow(&key) {
        return (StatusCode::TOO_MANY_REQUESTS, "rate_limit_exceeded").into_response();
    }
    next.run(req).await
}

pub fn new_rps_state(rps: u32) -> RateLimiter {
    RateLimiter::new(rps)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn requests_over_the_budget_are_refused() {
        let limiter = RateLimiter::new(2);
        assert!(limiter.allow("teacher-1"));
        assert!(limiter.allow("teacher-1"));
        assert!(!limiter.allow("teacher-1"));
    }

    #[test]
    fn callers_have_independent_budgets() {
        let limiter = RateLimiter::new(1);
        assert!(limiter.allow("teacher-1"));
        assert!(!limiter.allow("teacher-1"));
        assert!(limiter.allow("teacher-2"));
    }

    #[test]
    fn budget_replenishes_after_the_window() {
        let limiter = RateLimiter {
            rps: 1,
            windows: Arc::new(Mutex::new(HashMap::new())),
        };
        assert!(limiter.allow("teacher-1"));
        {
            let mut guard = limiter.windows.lock().unwrap();
            let window = guard.get_mut("teacher-1").unwrap();
            window.start = Instant::now() - WINDOW;
        }
        assert!(limiter.allow("teacher-1"));
    }
}
