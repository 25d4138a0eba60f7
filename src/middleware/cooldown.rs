use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Per-submitter cooldown for student admission. A second submission from the
/// same caller inside the window is refused, so a double-click or a stuck
/// button cannot admit the same student twice.
#[derive(Clone)]
pub struct AdmitGuard {
    window: Duration,
    last_seen: Arc<Mutex<HashMap<String, Instant>>>,
}

impl AdmitGuard {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            last_seen: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Returns true if the caller may submit now, recording the attempt.
    pub fn try_acquire(&self, key: &str) -> bool {
        let mut guard = self.last_seen.lock().expect("admit guard mutex poisoned");
        let now = Instant::now();
        guard.retain(|_, seen| now.duration_since(*seen) < self.window);
        match guard.get(key) {
            Some(seen) if now.duration_since(*seen) < self.window => false,
            _ => {
                guard.insert(key.to_string(), now);
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_submission_inside_window_is_blocked() {
        let guard = AdmitGuard::new(Duration::from_secs(5));
        assert!(guard.try_acquire("teacher-1"));
        assert!(!guard.try_acquire("teacher-1"));
    }

    #[test]
    fn different_callers_do_not_share_a_window() {
        let guard = AdmitGuard::new(Duration::from_secs(5));
        assert!(guard.try_acquire("teacher-1"));
        assert!(guard.try_acquire("teacher-2"));
    }

    #[test]
    fn window_expires() {
        let guard = AdmitGuard::new(Duration::from_millis(10));
        assert!(guard.try_acquire("teacher-1"));
        std::thread::sleep(Duration::from_millis(20));
        assert!(guard.try_acquire("teacher-1"));
    }
}
