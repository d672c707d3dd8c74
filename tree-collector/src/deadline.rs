//! Absolute deadlines on the runtime clock.

use std::time::Duration;

use tokio::time::Instant;

/// A point in time after which work is considered timed out, or no limit at all.
///
/// Uses tokio's clock, so paused test time applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadline {
    at: Option<Instant>,
}

impl Deadline {
    /// A deadline that never expires.
    pub const UNBOUNDED: Deadline = Deadline { at: None };

    /// A deadline at a fixed instant.
    pub fn at(instant: Instant) -> Self {
        Self { at: Some(instant) }
    }

    /// Saturating `now + timeout`: a sum past the representable range is unbounded.
    pub fn after(now: Instant, timeout: Duration) -> Self {
        Self {
            at: now.checked_add(timeout),
        }
    }

    /// [`Deadline::after`] relative to the current runtime time.
    pub fn from_now(timeout: Duration) -> Self {
        Self::after(Instant::now(), timeout)
    }

    /// The expiry instant, or `None` when unbounded.
    pub fn instant(&self) -> Option<Instant> {
        self.at
    }

    pub fn is_unbounded(&self) -> bool {
        self.at.is_none()
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        self.at.is_some_and(|at| now >= at)
    }

    /// Time left before expiry; `Duration::MAX` when unbounded, zero once expired.
    pub fn remaining(&self, now: Instant) -> Duration {
        match self.at {
            Some(at) => at.saturating_duration_since(now),
            None => Duration::MAX,
        }
    }

    /// The earlier of two deadlines.
    pub fn earliest(self, other: Deadline) -> Deadline {
        match (self.at, other.at) {
            (Some(a), Some(b)) => Deadline::at(a.min(b)),
            (Some(_), None) => self,
            (None, _) => other,
        }
    }
}

impl Default for Deadline {
    fn default() -> Self {
        Self::UNBOUNDED
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_saturating_add_is_unbounded() {
        let now = Instant::now();

        assert!(Deadline::after(now, Duration::MAX).is_unbounded());
        assert!(!Deadline::after(now, Duration::from_secs(1)).is_unbounded());
    }

    #[test]
    fn test_remaining_and_expiry() {
        let now = Instant::now();
        let deadline = Deadline::after(now, Duration::from_millis(100));

        assert_eq!(deadline.remaining(now), Duration::from_millis(100));
        assert!(!deadline.is_expired(now));

        let later = now + Duration::from_millis(150);
        assert_eq!(deadline.remaining(later), Duration::ZERO);
        assert!(deadline.is_expired(later));
    }

    #[test]
    fn test_zero_timeout_is_expired_immediately() {
        let now = Instant::now();

        assert!(Deadline::after(now, Duration::ZERO).is_expired(now));
    }

    #[test]
    fn test_unbounded_never_expires() {
        let now = Instant::now();

        assert!(!Deadline::UNBOUNDED.is_expired(now + Duration::from_secs(3600)));
        assert_eq!(Deadline::UNBOUNDED.remaining(now), Duration::MAX);
    }

    #[test]
    fn test_earliest() {
        let now = Instant::now();
        let near = Deadline::after(now, Duration::from_millis(10));
        let far = Deadline::after(now, Duration::from_millis(20));

        assert_eq!(near.earliest(far), near);
        assert_eq!(far.earliest(near), near);
        assert_eq!(Deadline::UNBOUNDED.earliest(far), far);
        assert_eq!(far.earliest(Deadline::UNBOUNDED), far);
        assert!(Deadline::UNBOUNDED.earliest(Deadline::UNBOUNDED).is_unbounded());
    }
}
