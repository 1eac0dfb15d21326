//! A small deterministic step sequencer.
//!
//! Transition choreography (the break-start ripple, the close fade) is a
//! handful of actions at fixed offsets. Driving them from the same
//! advancing clock as everything else keeps them testable without real
//! delays.

/// Ordered `(delay_ms, action)` pairs fired as time advances past each
/// offset. Offsets are measured from `start()`.
#[derive(Debug, Clone)]
pub struct Sequencer<A: Clone> {
    steps: Vec<(u64, A)>,
    elapsed_ms: u64,
    next: usize,
    active: bool,
}

impl<A: Clone> Sequencer<A> {
    /// Build an idle sequencer over the given steps, sorted by offset.
    pub fn new(mut steps: Vec<(u64, A)>) -> Self {
        steps.sort_by_key(|(delay, _)| *delay);
        Self {
            steps,
            elapsed_ms: 0,
            next: 0,
            active: false,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Arm the sequence from offset zero. Restarting rewinds any run in
    /// progress.
    pub fn start(&mut self) {
        self.elapsed_ms = 0;
        self.next = 0;
        self.active = true;
    }

    /// Disarm without firing the remaining steps.
    pub fn cancel(&mut self) {
        self.active = false;
    }

    /// Advance by `ms`, returning every action whose offset was reached,
    /// in order. The sequencer disarms itself after the last step.
    pub fn advance(&mut self, ms: u64) -> Vec<A> {
        if !self.active {
            return Vec::new();
        }
        self.elapsed_ms += ms;
        let mut fired = Vec::new();
        while self.next < self.steps.len() && self.steps[self.next].0 <= self.elapsed_ms {
            fired.push(self.steps[self.next].1.clone());
            self.next += 1;
        }
        if self.next == self.steps.len() {
            self.active = false;
        }
        fired
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Step {
        AllowSkip,
        RippleDone,
    }

    fn ripple() -> Sequencer<Step> {
        Sequencer::new(vec![(500, Step::AllowSkip), (1200, Step::RippleDone)])
    }

    #[test]
    fn fires_in_offset_order() {
        let mut seq = ripple();
        seq.start();
        assert!(seq.advance(499).is_empty());
        assert_eq!(seq.advance(1), vec![Step::AllowSkip]);
        assert!(seq.advance(600).is_empty());
        assert_eq!(seq.advance(200), vec![Step::RippleDone]);
        assert!(!seq.is_active());
    }

    #[test]
    fn a_large_step_fires_everything_due() {
        let mut seq = ripple();
        seq.start();
        assert_eq!(seq.advance(5_000), vec![Step::AllowSkip, Step::RippleDone]);
    }

    #[test]
    fn cancel_suppresses_remaining_steps() {
        let mut seq = ripple();
        seq.start();
        assert_eq!(seq.advance(500), vec![Step::AllowSkip]);
        seq.cancel();
        assert!(seq.advance(10_000).is_empty());
    }

    #[test]
    fn restart_rewinds() {
        let mut seq = ripple();
        seq.start();
        seq.advance(5_000);
        seq.start();
        assert!(seq.is_active());
        assert_eq!(seq.advance(500), vec![Step::AllowSkip]);
    }

    #[test]
    fn inactive_sequencer_is_silent() {
        let mut seq = ripple();
        assert!(seq.advance(10_000).is_empty());
    }
}
