//! Request generations for fetches that may resolve out of order.
//!
//! Each submission takes a new token; a result is applied only if it carries
//! the most recently issued token.

/// Identifies one submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

#[derive(Debug, Default)]
pub struct RequestTracker {
    latest: u64,
    in_flight: bool,
}

impl RequestTracker {
    /// Issue a token for a new submission; earlier tokens become stale.
    pub fn issue(&mut self) -> RequestToken {
        self.latest += 1;
        self.in_flight = true;
        RequestToken(self.latest)
    }

    pub fn is_current(&self, token: RequestToken) -> bool {
        token.0 == self.latest
    }

    /// A submission is waiting for its result.
    pub fn is_loading(&self) -> bool {
        self.in_flight
    }

    /// Accept a result for `token`; stale results are dropped (`None`).
    pub fn accept<T>(&mut self, token: RequestToken, value: T) -> Option<T> {
        if !self.is_current(token) {
            log::debug!("dropping stale result for request {} (latest {})", token.0, self.latest);
            return None;
        }
        self.in_flight = false;
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_latest_result_is_accepted() {
        let mut tracker = RequestTracker::default();
        let first = tracker.issue();
        let second = tracker.issue();
        assert!(tracker.is_loading());

        // The first fetch resolves after the second was issued.
        assert_eq!(tracker.accept(first, "stale"), None);
        assert!(tracker.is_loading());

        assert_eq!(tracker.accept(second, "fresh"), Some("fresh"));
        assert!(!tracker.is_loading());
    }

    #[test]
    fn tokens_are_monotonic() {
        let mut tracker = RequestTracker::default();
        let a = tracker.issue();
        let b = tracker.issue();
        assert!(b > a);
        assert!(!tracker.is_current(a));
        assert!(tracker.is_current(b));
    }
}
