//! Detection of repeated identical failures.

/// Tracks consecutive identical stderr signatures across execution cycles.
///
/// Two failures count as "the same" only when their stderr text matches
/// exactly. Any successful execution (empty stderr) clears the streak.
#[derive(Debug)]
pub struct ErrorTracker {
    threshold: u32,
    last_signature: Option<String>,
    consecutive: u32,
}

impl ErrorTracker {
    pub fn new(threshold: u32) -> Self {
        Self {
            threshold,
            last_signature: None,
            consecutive: 0,
        }
    }

    /// Records one execution's stderr. Returns `true` when the streak of
    /// identical failures reaches the threshold; the count then resets so a
    /// further identical failure starts a fresh streak, while the signature
    /// is retained for comparison.
    pub fn observe(&mut self, stderr: &str) -> bool {
        if stderr.is_empty() {
            self.last_signature = None;
            self.consecutive = 0;
            return false;
        }

        if self.last_signature.as_deref() == Some(stderr) {
            self.consecutive += 1;
        } else {
            self.last_signature = Some(stderr.to_string());
            self.consecutive = 1;
        }

        if self.consecutive >= self.threshold {
            self.consecutive = 0;
            return true;
        }
        false
    }

    pub fn consecutive_count(&self) -> u32 {
        self.consecutive
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn third_identical_failure_trips() {
        let mut tracker = ErrorTracker::new(3);
        let outcomes: Vec<bool> = ["E", "E", "E", "X", "X"]
            .iter()
            .map(|stderr| tracker.observe(stderr))
            .collect();
        assert_eq!(outcomes, vec![false, false, true, false, false]);
    }

    #[test]
    fn counts_follow_the_reset() {
        let mut tracker = ErrorTracker::new(3);
        let mut counts = Vec::new();
        for stderr in ["E", "E", "E", "X", "X"] {
            tracker.observe(stderr);
            counts.push(tracker.consecutive_count());
        }
        assert_eq!(counts, vec![1, 2, 0, 1, 2]);
    }

    #[test]
    fn success_clears_the_streak() {
        let mut tracker = ErrorTracker::new(3);
        assert!(!tracker.observe("E"));
        assert!(!tracker.observe("E"));
        assert!(!tracker.observe(""));
        assert!(!tracker.observe("E"));
        assert_eq!(tracker.consecutive_count(), 1);
    }

    #[test]
    fn different_error_starts_over() {
        let mut tracker = ErrorTracker::new(3);
        tracker.observe("NameError: x");
        tracker.observe("NameError: x");
        assert!(!tracker.observe("TypeError: y"));
        assert_eq!(tracker.consecutive_count(), 1);
    }

    #[test]
    fn retrip_after_reset_takes_threshold_again() {
        let mut tracker = ErrorTracker::new(3);
        assert!(!tracker.observe("E"));
        assert!(!tracker.observe("E"));
        assert!(tracker.observe("E"));
        // Signature survives the reset, so the streak rebuilds from 1.
        assert!(!tracker.observe("E"));
        assert!(!tracker.observe("E"));
        assert!(tracker.observe("E"));
    }

    #[test]
    fn threshold_one_trips_immediately() {
        let mut tracker = ErrorTracker::new(1);
        assert!(tracker.observe("E"));
    }
}
