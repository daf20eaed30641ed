use std::time::{Duration, Instant};

/// Wall-clock deadline for one traversal.
///
/// Expiry is cooperative: the engine stops starting fetches once
/// `is_expired` reports true, and lets running ones finish.
#[derive(Debug, Clone, Copy)]
pub struct TimeBudget {
    deadline: Instant,
}

impl TimeBudget {
    pub fn new(limit: Duration) -> Self {
        Self::until(Instant::now() + limit)
    }

    pub fn until(deadline: Instant) -> Self {
        Self { deadline }
    }

    pub fn is_expired(&self) -> bool {
        Instant::now() > self.deadline
    }

    pub fn remaining(&self) -> Duration {
        self.deadline.saturating_duration_since(Instant::now())
    }

    pub fn deadline(&self) -> Instant {
        self.deadline
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_future_deadline_is_not_expired() {
        let budget = TimeBudget::new(Duration::from_secs(60));
        assert!(!budget.is_expired());
        assert!(budget.remaining() > Duration::from_secs(50));
    }

    #[test]
    fn test_past_deadline_is_expired() {
        let past = Instant::now() - Duration::from_millis(5);
        let budget = TimeBudget::until(past);
        assert!(budget.is_expired());
        assert_eq!(budget.remaining(), Duration::ZERO);
    }

    #[test]
    fn test_expires_after_limit() {
        let budget = TimeBudget::new(Duration::from_millis(10));
        std::thread::sleep(Duration::from_millis(20));
        assert!(budget.is_expired());
    }
}
