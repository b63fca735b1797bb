//! Trailing-edge debounce state machine
//!
//! Coalesces bursts of value changes into a single settle once the input
//! has been quiet for the configured delay.

use std::time::{Duration, Instant};

/// Trailing-edge debouncer over values of type `T`.
///
/// When a value arrives, we arm a deadline one delay into the future. If
/// another value arrives before the deadline passes, we re-arm. Once the
/// input has been quiet for a full delay the observed value is committed
/// to the output. Only the trailing edge fires; a burst of changes settles
/// exactly once, on its last value.
///
/// The caller supplies the clock: every mutating call takes an explicit
/// `Instant`, and commits happen only inside [`poll_at`](Self::poll_at).
/// That keeps the state machine free of I/O and timers, so it can be
/// driven by a real timer loop (see [`Debounced`](crate::task::Debounced))
/// or by tests with hand-built instants.
pub struct Debouncer<T> {
    /// Last value the caller handed us.
    observed: T,
    /// Last settled value; the externally visible output.
    current: T,
    /// Quiescence window applied to each change.
    delay: Duration,
    /// Deadline of the pending timer. At most one is armed at a time.
    deadline: Option<Instant>,
}

impl<T: Clone> Debouncer<T> {
    /// Create a debouncer whose output starts as `initial`.
    ///
    /// No timer is armed until the first change arrives.
    pub fn new(initial: T, delay: Duration) -> Self {
        Self {
            observed: initial.clone(),
            current: initial,
            delay,
            deadline: None,
        }
    }

    /// Record a new observed value at `now`.
    ///
    /// Replaces any pending deadline with `now + delay`. The output is
    /// never touched here; it changes only in [`poll_at`](Self::poll_at),
    /// so even a zero delay defers the commit to the next poll.
    pub fn update_at(&mut self, value: T, now: Instant) {
        self.observed = value;
        self.deadline = Some(now + self.delay);
    }

    /// Change the delay at `now`.
    ///
    /// Restarts the wait window with the new delay and the currently
    /// observed value, whether or not a timer was pending.
    pub fn set_delay_at(&mut self, delay: Duration, now: Instant) {
        self.delay = delay;
        self.deadline = Some(now + delay);
    }

    /// Fire the pending timer if its deadline has passed.
    ///
    /// Returns `true` if the observed value was committed to the output.
    pub fn poll_at(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if deadline <= now => {
                self.deadline = None;
                self.current = self.observed.clone();
                true
            }
            _ => false,
        }
    }

    /// The settled output value.
    pub fn current(&self) -> &T {
        &self.current
    }

    /// Deadline of the pending timer, if one is armed.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Whether a timer is pending.
    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Current quiescence window.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Discard the pending timer without committing the observed value.
    pub fn cancel(&mut self) {
        self.deadline = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_initial_value_passes_through() {
        let debouncer = Debouncer::new("initial", ms(100));
        assert_eq!(*debouncer.current(), "initial");
        assert!(!debouncer.is_pending());
    }

    #[test]
    fn test_commits_after_quiescence() {
        let base = Instant::now();
        let mut debouncer = Debouncer::new("initial", ms(100));

        debouncer.update_at("updated", base);
        assert!(!debouncer.poll_at(base + ms(50)));
        assert_eq!(*debouncer.current(), "initial");

        assert!(debouncer.poll_at(base + ms(100)));
        assert_eq!(*debouncer.current(), "updated");
    }

    #[test]
    fn test_burst_commits_only_last_value() {
        let base = Instant::now();
        let mut debouncer = Debouncer::new("initial", ms(100));

        debouncer.update_at("first", base);
        debouncer.update_at("second", base + ms(30));
        debouncer.update_at("third", base + ms(60));
        assert_eq!(debouncer.deadline(), Some(base + ms(160)));

        // Replaced deadlines never fire
        assert!(!debouncer.poll_at(base + ms(130)));
        assert_eq!(*debouncer.current(), "initial");

        assert!(debouncer.poll_at(base + ms(160)));
        assert_eq!(*debouncer.current(), "third");
    }

    #[test]
    fn test_quiescent_after_commit() {
        let base = Instant::now();
        let mut debouncer = Debouncer::new(0u32, ms(100));

        debouncer.update_at(42, base);
        assert!(debouncer.poll_at(base + ms(100)));
        assert_eq!(*debouncer.current(), 42);

        // No further timer, no further commits
        assert!(!debouncer.is_pending());
        assert!(!debouncer.poll_at(base + ms(500)));
        assert_eq!(*debouncer.current(), 42);
    }

    #[test]
    fn test_delay_change_restarts_window() {
        let base = Instant::now();
        let mut debouncer = Debouncer::new("a", ms(100));

        debouncer.update_at("b", base);
        debouncer.set_delay_at(ms(200), base + ms(50));
        assert_eq!(debouncer.deadline(), Some(base + ms(250)));

        assert!(!debouncer.poll_at(base + ms(100)));
        assert_eq!(*debouncer.current(), "a");

        assert!(debouncer.poll_at(base + ms(250)));
        assert_eq!(*debouncer.current(), "b");
    }

    #[test]
    fn test_delay_change_while_quiescent_rearms() {
        let base = Instant::now();
        let mut debouncer = Debouncer::new("a", ms(100));

        debouncer.set_delay_at(ms(50), base);
        assert!(debouncer.is_pending());

        // Fires with the value that was already observed
        assert!(debouncer.poll_at(base + ms(50)));
        assert_eq!(*debouncer.current(), "a");
    }

    #[test]
    fn test_zero_delay_still_defers_to_poll() {
        let base = Instant::now();
        let mut debouncer = Debouncer::new("a", Duration::ZERO);

        debouncer.update_at("b", base);
        // The update itself never commits
        assert_eq!(*debouncer.current(), "a");

        assert!(debouncer.poll_at(base));
        assert_eq!(*debouncer.current(), "b");
    }

    #[test]
    fn test_cancel_discards_pending_value() {
        let base = Instant::now();
        let mut debouncer = Debouncer::new("a", ms(100));

        debouncer.update_at("b", base);
        debouncer.cancel();

        assert!(!debouncer.poll_at(base + ms(500)));
        assert_eq!(*debouncer.current(), "a");
    }

    #[test]
    fn test_option_values_commit() {
        let base = Instant::now();
        let mut debouncer = Debouncer::new(Some(1), ms(100));

        debouncer.update_at(None, base);
        assert!(debouncer.poll_at(base + ms(100)));
        assert_eq!(*debouncer.current(), None::<i32>);
    }
}
