//! Box-breathing cycle driver.
//!
//! A fixed 4-phase loop (inhale, hold, exhale, hold), 4 seconds per
//! phase, advanced in small millisecond steps for smooth progress. The
//! breath counter runs on its own 16-second accumulator rather than
//! counting phase edges, so small per-step drift in the phase loop never
//! skews the count.

use serde::{Deserialize, Serialize};

/// Milliseconds per breathing phase.
pub const PHASE_DURATION_MS: u64 = 4_000;
/// Milliseconds per full 4-phase cycle.
pub const CYCLE_DURATION_MS: u64 = 4 * PHASE_DURATION_MS;
/// Step size the driver is expected to be advanced at.
pub const UPDATE_INTERVAL_MS: u64 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BreathingPhase {
    Inhale,
    Hold1,
    Exhale,
    Hold2,
}

impl BreathingPhase {
    pub fn next(self) -> Self {
        match self {
            BreathingPhase::Inhale => BreathingPhase::Hold1,
            BreathingPhase::Hold1 => BreathingPhase::Exhale,
            BreathingPhase::Exhale => BreathingPhase::Hold2,
            BreathingPhase::Hold2 => BreathingPhase::Inhale,
        }
    }

    /// Instruction text shown during the phase.
    pub fn label(self) -> &'static str {
        match self {
            BreathingPhase::Inhale => "Breathe In",
            BreathingPhase::Hold1 | BreathingPhase::Hold2 => "Hold",
            BreathingPhase::Exhale => "Breathe Out",
        }
    }
}

/// How the breathing view is being presented, with the per-break
/// dismissed latch handled by the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BreathingVisibility {
    Hidden,
    /// Opened manually outside of a break.
    Previewing,
    /// Opened automatically when a break began.
    AutoShown,
}

/// The 4-phase breathing loop and breath counter.
///
/// Inactive until [`activate`] is called; deactivation resets phase,
/// progress, and count - no carry-over between sessions.
///
/// [`activate`]: BreathingCycle::activate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BreathingCycle {
    active: bool,
    phase: BreathingPhase,
    phase_elapsed_ms: u64,
    /// Independent accumulator for the breath counter.
    counter_elapsed_ms: u64,
    breath_count: u32,
    /// Some configurations stop counting at a ceiling instead of
    /// counting forever.
    count_cap: Option<u32>,
}

impl BreathingCycle {
    pub fn new() -> Self {
        Self::with_cap(None)
    }

    pub fn with_cap(count_cap: Option<u32>) -> Self {
        Self {
            active: false,
            phase: BreathingPhase::Inhale,
            phase_elapsed_ms: 0,
            counter_elapsed_ms: 0,
            breath_count: 0,
            count_cap,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn phase(&self) -> BreathingPhase {
        self.phase
    }

    /// 0.0 .. 1.0 progress through the current phase.
    pub fn phase_progress(&self) -> f64 {
        (self.phase_elapsed_ms as f64 / PHASE_DURATION_MS as f64).min(1.0)
    }

    pub fn breath_count(&self) -> u32 {
        self.breath_count
    }

    /// Whole seconds left in the phase, as shown under the instruction
    /// text (counts 4, 3, 2, 1).
    pub fn phase_countdown_secs(&self) -> u32 {
        (4.0 * (1.0 - self.phase_progress())).ceil() as u32
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Begin a fresh cycle at inhale with a zero breath count. Already
    /// active is a no-op - the running cycle is not disturbed.
    pub fn activate(&mut self) {
        if self.active {
            return;
        }
        self.reset();
        self.active = true;
    }

    /// Stop the loop and reset phase, progress, and counter.
    pub fn deactivate(&mut self) {
        self.active = false;
        self.reset();
    }

    /// Advance the loop by `ms` milliseconds. No-op while inactive.
    pub fn advance(&mut self, ms: u64) {
        if !self.active {
            return;
        }
        self.phase_elapsed_ms += ms;
        while self.phase_elapsed_ms >= PHASE_DURATION_MS {
            self.phase_elapsed_ms -= PHASE_DURATION_MS;
            self.phase = self.phase.next();
        }
        self.counter_elapsed_ms += ms;
        while self.counter_elapsed_ms >= CYCLE_DURATION_MS {
            self.counter_elapsed_ms -= CYCLE_DURATION_MS;
            if self.count_cap.map_or(true, |cap| self.breath_count < cap) {
                self.breath_count += 1;
            }
        }
    }

    fn reset(&mut self) {
        self.phase = BreathingPhase::Inhale;
        self.phase_elapsed_ms = 0;
        self.counter_elapsed_ms = 0;
        self.breath_count = 0;
    }
}

impl Default for BreathingCycle {
    fn default() -> Self {
        Self::new()
    }
}

/// Periodic reminder nudging the user toward the breathing exercise
/// while it is inactive: a 2-second pulse every 30 seconds.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BreatheReminder {
    elapsed_ms: u64,
    pulse_left_ms: u64,
}

impl BreatheReminder {
    pub const PULSE_PERIOD_MS: u64 = 30_000;
    pub const PULSE_DURATION_MS: u64 = 2_000;

    pub fn is_pulsing(&self) -> bool {
        self.pulse_left_ms > 0
    }

    pub fn advance(&mut self, ms: u64) {
        self.pulse_left_ms = self.pulse_left_ms.saturating_sub(ms);
        self.elapsed_ms += ms;
        if self.elapsed_ms >= Self::PULSE_PERIOD_MS {
            self.elapsed_ms -= Self::PULSE_PERIOD_MS;
            self.pulse_left_ms = Self::PULSE_DURATION_MS;
        }
    }

    pub fn reset(&mut self) {
        self.elapsed_ms = 0;
        self.pulse_left_ms = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn advance_secs(cycle: &mut BreathingCycle, secs: u64) {
        for _ in 0..(secs * 1000 / UPDATE_INTERVAL_MS) {
            cycle.advance(UPDATE_INTERVAL_MS);
        }
    }

    #[test]
    fn phases_rotate_every_four_seconds() {
        let mut cycle = BreathingCycle::new();
        cycle.activate();
        assert_eq!(cycle.phase(), BreathingPhase::Inhale);
        advance_secs(&mut cycle, 4);
        assert_eq!(cycle.phase(), BreathingPhase::Hold1);
        advance_secs(&mut cycle, 4);
        assert_eq!(cycle.phase(), BreathingPhase::Exhale);
        advance_secs(&mut cycle, 4);
        assert_eq!(cycle.phase(), BreathingPhase::Hold2);
        advance_secs(&mut cycle, 4);
        assert_eq!(cycle.phase(), BreathingPhase::Inhale);
    }

    #[test]
    fn progress_is_monotonic_within_a_phase() {
        let mut cycle = BreathingCycle::new();
        cycle.activate();
        let mut last = 0.0;
        for _ in 0..79 {
            cycle.advance(UPDATE_INTERVAL_MS);
            let p = cycle.phase_progress();
            assert!(p >= last);
            last = p;
        }
        assert!(last < 1.0);
    }

    #[test]
    fn one_breath_per_sixteen_seconds() {
        let mut cycle = BreathingCycle::new();
        cycle.activate();
        advance_secs(&mut cycle, 15);
        assert_eq!(cycle.breath_count(), 0);
        advance_secs(&mut cycle, 1);
        assert_eq!(cycle.breath_count(), 1);
        advance_secs(&mut cycle, 16);
        assert_eq!(cycle.breath_count(), 2);
    }

    #[test]
    fn deactivate_resets_everything() {
        let mut cycle = BreathingCycle::new();
        cycle.activate();
        advance_secs(&mut cycle, 20);
        assert_eq!(cycle.breath_count(), 1);
        cycle.deactivate();
        assert_eq!(cycle.phase(), BreathingPhase::Inhale);
        assert_eq!(cycle.phase_progress(), 0.0);
        assert_eq!(cycle.breath_count(), 0);

        // Reactivation starts from scratch.
        cycle.activate();
        assert_eq!(cycle.breath_count(), 0);
        advance_secs(&mut cycle, 16);
        assert_eq!(cycle.breath_count(), 1);
    }

    #[test]
    fn count_cap_stops_incrementing() {
        let mut cycle = BreathingCycle::with_cap(Some(2));
        cycle.activate();
        advance_secs(&mut cycle, 16 * 5);
        assert_eq!(cycle.breath_count(), 2);
    }

    #[test]
    fn activate_while_active_does_not_restart() {
        let mut cycle = BreathingCycle::new();
        cycle.activate();
        advance_secs(&mut cycle, 6);
        let phase = cycle.phase();
        cycle.activate();
        assert_eq!(cycle.phase(), phase);
    }

    #[test]
    fn phase_countdown_counts_down_whole_seconds() {
        let mut cycle = BreathingCycle::new();
        cycle.activate();
        assert_eq!(cycle.phase_countdown_secs(), 4);
        advance_secs(&mut cycle, 1);
        assert_eq!(cycle.phase_countdown_secs(), 3);
        advance_secs(&mut cycle, 2);
        assert_eq!(cycle.phase_countdown_secs(), 1);
    }

    #[test]
    fn reminder_pulses_every_thirty_seconds() {
        let mut reminder = BreatheReminder::default();
        reminder.advance(29_000);
        assert!(!reminder.is_pulsing());
        reminder.advance(1_000);
        assert!(reminder.is_pulsing());
        reminder.advance(2_000);
        assert!(!reminder.is_pulsing());
    }
}
