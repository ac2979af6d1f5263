//! Quiet-period debouncing for the search input.
//!
//! A `Debouncer` turns a rapid stream of change events into at most one
//! committed emission per quiet period. It is an explicit timer object:
//! the owning component arms it on every change, polls it from the event
//! loop, and cancels it on teardown.

use std::time::{Duration, Instant};

/// Quiet period before a search-term change is committed.
pub const DEBOUNCE: Duration = Duration::from_millis(500);

/// Tracks a pending change and the moment it last occurred.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    changed_at: Option<Instant>,
    pending: bool,
}

impl Debouncer {
    /// Creates a debouncer with the given quiet period.
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            changed_at: None,
            pending: false,
        }
    }

    /// Records a change, arming (or re-arming) the quiet-period timer.
    ///
    /// Each call pushes the emission out: only the final value after the
    /// stream goes quiet is ever committed.
    pub fn record_change(&mut self) {
        self.changed_at = Some(Instant::now());
        self.pending = true;
    }

    /// Returns whether a change is pending and the quiet period has elapsed.
    pub fn ready(&self) -> bool {
        if !self.pending {
            return false;
        }
        match self.changed_at {
            Some(changed_at) => changed_at.elapsed() >= self.delay,
            None => false,
        }
    }

    /// Consumes the pending emission if it is ready.
    ///
    /// Returns `true` at most once per quiet period.
    pub fn take(&mut self) -> bool {
        if self.ready() {
            self.pending = false;
            self.changed_at = None;
            true
        } else {
            false
        }
    }

    /// Discards any pending emission without committing it.
    ///
    /// Used on teardown so a timer armed by a dying component never fires.
    pub fn cancel(&mut self) {
        self.pending = false;
        self.changed_at = None;
    }

    /// Returns whether a change is waiting for its quiet period.
    pub fn is_pending(&self) -> bool {
        self.pending
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEBOUNCE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_debouncer_has_nothing_pending() {
        let debouncer = Debouncer::new(Duration::ZERO);
        assert!(!debouncer.is_pending());
        assert!(!debouncer.ready());
    }

    #[test]
    fn change_becomes_ready_after_quiet_period() {
        let mut debouncer = Debouncer::new(Duration::ZERO);
        debouncer.record_change();

        // With a zero-length quiet period the emission is ready immediately
        assert!(debouncer.ready());
    }

    #[test]
    fn change_is_not_ready_inside_quiet_period() {
        let mut debouncer = Debouncer::new(Duration::from_secs(60));
        debouncer.record_change();

        assert!(debouncer.is_pending());
        assert!(!debouncer.ready());
        assert!(!debouncer.take());
    }

    #[test]
    fn take_consumes_the_emission_exactly_once() {
        let mut debouncer = Debouncer::new(Duration::ZERO);
        debouncer.record_change();

        assert!(debouncer.take());
        assert!(!debouncer.take(), "second take must not emit again");
        assert!(!debouncer.is_pending());
    }

    #[test]
    fn every_change_rearms_the_timer() {
        let mut debouncer = Debouncer::new(Duration::from_secs(60));
        debouncer.record_change();
        debouncer.record_change();
        debouncer.record_change();

        // Still one pending emission, still inside the quiet window
        assert!(debouncer.is_pending());
        assert!(!debouncer.ready());
    }

    #[test]
    fn cancel_discards_the_pending_emission() {
        let mut debouncer = Debouncer::new(Duration::ZERO);
        debouncer.record_change();
        debouncer.cancel();

        assert!(!debouncer.ready());
        assert!(!debouncer.take());
    }

    #[test]
    fn default_uses_the_standard_quiet_period() {
        let debouncer = Debouncer::default();
        assert_eq!(debouncer.delay, DEBOUNCE);
    }
}
