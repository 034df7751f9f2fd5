//! One-shot deadline timer.

/// A cancelable one-shot deadline.
///
/// The timer never fires on its own: the owning instance polls it with the
/// current time and it reports expiry exactly once.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct OneShotTimer {
    deadline: Option<f64>,
}

impl OneShotTimer {
    /// Create a disarmed timer.
    #[must_use]
    pub const fn new() -> Self {
        Self { deadline: None }
    }

    /// Arm the timer, replacing any pending deadline.
    pub fn arm(&mut self, deadline: f64) {
        self.deadline = Some(deadline);
    }

    /// Disarm without firing.
    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    /// Check if a deadline is pending.
    pub const fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// Pending deadline (ms), if armed.
    pub const fn deadline(&self) -> Option<f64> {
        self.deadline
    }

    /// Disarm and return `true` if the deadline has been reached at `now`.
    pub fn expire(&mut self, now: f64) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timer_fires_once() {
        let mut timer = OneShotTimer::new();
        timer.arm(500.0);
        assert!(!timer.expire(499.0));
        assert!(timer.expire(500.0));
        assert!(!timer.expire(900.0));
        assert!(!timer.is_armed());
    }

    #[test]
    fn test_timer_cancel() {
        let mut timer = OneShotTimer::new();
        timer.arm(100.0);
        timer.cancel();
        assert!(!timer.expire(1000.0));
        assert_eq!(timer.deadline(), None);
    }

    #[test]
    fn test_timer_rearm_replaces_deadline() {
        let mut timer = OneShotTimer::new();
        timer.arm(100.0);
        timer.arm(300.0);
        assert!(!timer.expire(200.0));
        assert!(timer.expire(300.0));
    }
}
