use std::collections::HashMap;
use std::sync::Mutex;

use time::{Duration, OffsetDateTime};
use tracing::warn;

#[derive(Debug)]
struct Window {
    attempts: u32,
    started: OffsetDateTime,
}

/// Fixed-window attempt counter keyed by an arbitrary string. Admission
/// control only: a rejected attempt touches no ledger or store state.
/// Windows twice past their span are pruned on each check.
#[derive(Debug)]
pub struct RateLimiter {
    windows: Mutex<HashMap<String, Window>>,
    max_attempts: u32,
    window: Duration,
}

impl RateLimiter {
    pub fn new(max_attempts: u32, window_minutes: i64) -> Self {
        Self {
            windows: Mutex::new(HashMap::new()),
            max_attempts,
            window: Duration::minutes(window_minutes),
        }
    }

    /// Records an attempt for `key`. When the attempt budget is exhausted,
    /// returns the minutes until the window resets.
    pub fn check(&self, key: &str) -> Result<(), i64> {
        let now = OffsetDateTime::now_utc();
        let mut windows = match self.windows.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        windows.retain(|_, w| now - w.started <= self.window * 2);

        match windows.get_mut(key) {
            Some(w) if now - w.started <= self.window => {
                if w.attempts >= self.max_attempts {
                    let minutes = (w.started + self.window - now).whole_minutes().max(1);
                    warn!("Rate limit hit for key {}", key);
                    return Err(minutes);
                }
                w.attempts += 1;
            }
            Some(w) => {
                *w = Window { attempts: 1, started: now };
            }
            None => {
                windows.insert(key.to_string(), Window { attempts: 1, started: now });
            }
        }

        Ok(())
    }

    /// Attempts left for `key` in its current window.
    pub fn remaining(&self, key: &str) -> u32 {
        let now = OffsetDateTime::now_utc();
        let windows = match self.windows.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        match windows.get(key) {
            Some(w) if now - w.started <= self.window => {
                self.max_attempts.saturating_sub(w.attempts)
            }
            _ => self.max_attempts,
        }
    }
}
