//! Per-domain download delay
//!
//! Every request reserves the next free slot for its domain before it is
//! sent, so concurrent tasks hitting the same host are spaced by at least
//! the configured delay while different hosts proceed independently.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

#[derive(Debug)]
pub struct DomainThrottle {
    delay: Duration,
    next_slot: Mutex<HashMap<String, Instant>>,
}

impl DomainThrottle {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            next_slot: Mutex::new(HashMap::new()),
        }
    }

    /// Reserves a request slot for `domain` and returns how long to wait
    /// before using it
    pub fn reserve(&self, domain: &str, now: Instant) -> Duration {
        if self.delay.is_zero() {
            return Duration::ZERO;
        }

        let mut slots = self
            .next_slot
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let slot = match slots.get(domain) {
            Some(next) if *next > now => *next,
            _ => now,
        };
        slots.insert(domain.to_string(), slot + self.delay);

        slot.duration_since(now)
    }

    /// Waits until `domain` may be requested again
    pub async fn acquire(&self, domain: &str) {
        let wait = self.reserve(domain, Instant::now());
        if !wait.is_zero() {
            tracing::trace!("Delaying request to {} by {:?}", domain, wait);
            tokio::time::sleep(wait).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_request_is_immediate() {
        let throttle = DomainThrottle::new(Duration::from_secs(2));
        let now = Instant::now();
        assert_eq!(throttle.reserve("shop.example.com", now), Duration::ZERO);
    }

    #[test]
    fn test_back_to_back_requests_are_spaced() {
        let throttle = DomainThrottle::new(Duration::from_secs(2));
        let now = Instant::now();

        assert_eq!(throttle.reserve("shop.example.com", now), Duration::ZERO);
        assert_eq!(
            throttle.reserve("shop.example.com", now),
            Duration::from_secs(2)
        );
        assert_eq!(
            throttle.reserve("shop.example.com", now),
            Duration::from_secs(4)
        );
    }

    #[test]
    fn test_domains_are_independent() {
        let throttle = DomainThrottle::new(Duration::from_secs(2));
        let now = Instant::now();

        throttle.reserve("a.example.com", now);
        assert_eq!(throttle.reserve("b.example.com", now), Duration::ZERO);
    }

    #[test]
    fn test_slot_frees_after_delay() {
        let throttle = DomainThrottle::new(Duration::from_secs(2));
        let now = Instant::now();

        throttle.reserve("shop.example.com", now);
        let later = now + Duration::from_secs(3);
        assert_eq!(throttle.reserve("shop.example.com", later), Duration::ZERO);
    }

    #[test]
    fn test_zero_delay_never_waits() {
        let throttle = DomainThrottle::new(Duration::ZERO);
        let now = Instant::now();
        throttle.reserve("shop.example.com", now);
        assert_eq!(throttle.reserve("shop.example.com", now), Duration::ZERO);
    }
}
