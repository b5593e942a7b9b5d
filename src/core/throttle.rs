// src/core/throttle.rs
//! Detection throttling
//!
//! A browser fires a burst of UI-change notifications while a page settles,
//! all showing the same address. The throttle keeps the last time each
//! (package, address) pair was acted on and suppresses repeats inside the
//! cooldown window. State is a bounded LRU map, so long runtimes cannot grow
//! it without limit; an evicted pair simply acts again like a fresh one.

use std::num::NonZeroUsize;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use lru::LruCache;
use tracing::debug;

/// Identity of one detection: which app showed which address.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DetectionKey {
    pub package: String,
    pub address: String,
}

impl DetectionKey {
    pub fn new(package: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            address: address.into(),
        }
    }
}

/// Per-key cooldown gate over monotonic event time.
///
/// The check and the timestamp update are one critical section, so two
/// near-simultaneous notifications for the same key cannot both pass.
pub struct DetectionThrottle {
    entries: Mutex<LruCache<DetectionKey, u64>>,
    cooldown_ms: u64,
}

impl DetectionThrottle {
    /// `capacity` bounds the number of tracked keys; least recently touched
    /// keys are evicted first.
    pub fn new(cooldown: Duration, capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity.max(1)).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
            cooldown_ms: cooldown.as_millis() as u64,
        }
    }

    /// Whether an action for `key` at `event_time_ms` should go ahead.
    ///
    /// The first observation of a key always acts. On `true` the event time is
    /// recorded against the key; on `false` the recorded time is left as it
    /// was.
    pub fn should_act(&self, key: DetectionKey, event_time_ms: u64) -> bool {
        let mut entries = self
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        // An absent key has effectively last acted infinitely long ago, so a
        // fresh key always acts, even when the event clock itself is still
        // inside the first cooldown window.
        let act = match entries.get(&key) {
            None => true,
            Some(&last) => event_time_ms.saturating_sub(last) > self.cooldown_ms,
        };
        if act {
            entries.put(key, event_time_ms);
            true
        } else {
            debug!(
                package = %key.package,
                address = %key.address,
                "detection suppressed inside cooldown window"
            );
            false
        }
    }

    /// Number of keys currently tracked.
    pub fn tracked_keys(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BAD: &str = "http://bad.example/page";

    fn throttle() -> DetectionThrottle {
        DetectionThrottle::new(Duration::from_millis(2000), 1024)
    }

    fn key(package: &str) -> DetectionKey {
        DetectionKey::new(package, BAD)
    }

    #[test]
    fn first_observation_always_acts() {
        let throttle = throttle();
        // Event times inside the clock's first cooldown window still act.
        assert!(throttle.should_act(key("com.android.chrome"), 5));
        assert!(throttle.should_act(key("org.mozilla.firefox"), 0));

        // The first observation was recorded: the same key is now throttled.
        assert!(!throttle.should_act(key("com.android.chrome"), 6));
    }

    #[test]
    fn suppresses_inside_cooldown_and_releases_after() {
        let throttle = throttle();
        assert!(throttle.should_act(key("com.android.chrome"), 10_000));
        assert!(!throttle.should_act(key("com.android.chrome"), 10_000 + 1_999));
        assert!(!throttle.should_act(key("com.android.chrome"), 10_000 + 2_000));
        assert!(throttle.should_act(key("com.android.chrome"), 10_000 + 2_001));
    }

    #[test]
    fn suppressed_observation_does_not_extend_the_window() {
        let throttle = throttle();
        assert!(throttle.should_act(key("com.android.chrome"), 10_000));
        // Suppressed at 11_999; window still counts from 10_000.
        assert!(!throttle.should_act(key("com.android.chrome"), 11_999));
        assert!(throttle.should_act(key("com.android.chrome"), 12_001));
    }

    #[test]
    fn keys_do_not_interfere() {
        let throttle = throttle();
        assert!(throttle.should_act(key("com.android.chrome"), 10_000));
        assert!(throttle.should_act(key("org.mozilla.firefox"), 10_001));
        assert!(throttle.should_act(
            DetectionKey::new("com.android.chrome", "http://other.example"),
            10_002
        ));
    }

    #[test]
    fn capacity_evicts_least_recently_used_key() {
        let throttle = DetectionThrottle::new(Duration::from_millis(2000), 2);
        assert!(throttle.should_act(key("a"), 10_000));
        assert!(throttle.should_act(key("b"), 10_001));
        // Third key evicts "a".
        assert!(throttle.should_act(key("c"), 10_002));
        assert_eq!(throttle.tracked_keys(), 2);

        // Evicted key acts again immediately; retained key stays throttled.
        assert!(throttle.should_act(key("a"), 10_003));
        assert!(!throttle.should_act(key("c"), 10_004));
    }
}
