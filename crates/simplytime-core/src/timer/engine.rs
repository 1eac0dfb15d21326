//! Timer engine implementation.
//!
//! The timer engine is a caller-driven state machine. It does not use
//! internal threads - the caller invokes `tick()` once per second while
//! the countdown is running.
//!
//! ## State Transitions
//!
//! ```text
//! Initializing -(5s lead-in)-> Running(Work) <-(countdown expiry)-> Running(Break)
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = TimerEngine::new();
//! engine.start();
//! // Once per second:
//! engine.tick(); // Returns Some(Event) on lead-in completion or mode flip
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::events::Event;

/// Default work duration in minutes.
pub const DEFAULT_WORK_MINUTES: u32 = 52;
/// Default break duration in minutes.
pub const DEFAULT_BREAK_MINUTES: u32 = 17;
/// Seconds counted down before the first work session begins.
pub const INIT_LEAD_IN_SECS: u32 = 5;

/// Work duration bounds in minutes (inclusive).
pub const WORK_MINUTES_MIN: u32 = 1;
pub const WORK_MINUTES_MAX: u32 = 120;
/// Break duration bounds in minutes (inclusive).
pub const BREAK_MINUTES_MIN: u32 = 1;
pub const BREAK_MINUTES_MAX: u32 = 60;

/// Quick-select presets surfaced to hosts.
pub const WORK_PRESETS: [u32; 4] = [25, 50, 52, 90];
pub const BREAK_PRESETS: [u32; 4] = [5, 10, 15, 17];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Work,
    Break,
}

impl Mode {
    pub fn flipped(self) -> Self {
        match self {
            Mode::Work => Mode::Break,
            Mode::Break => Mode::Work,
        }
    }
}

/// Where the session is in its lifecycle. Replaces the overlapping
/// `is_initializing` / `has_initialized` booleans of earlier revisions
/// with a single tagged state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionPhase {
    /// Counting down the short lead-in before the first work session.
    Initializing,
    /// Normal work/break cycling.
    Running,
}

/// Core timer engine.
///
/// Holds the time model (mode, remaining seconds, durations) and performs
/// mode transitions at countdown expiry. Within one `tick()` the mode
/// flip, the time reset, and the event emission are applied atomically -
/// no tick can observe a half-applied transition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerEngine {
    phase: SessionPhase,
    mode: Mode,
    /// Remaining seconds in the current countdown.
    time_left_secs: u32,
    work_minutes: u32,
    break_minutes: u32,
    running: bool,
}

impl TimerEngine {
    /// Create a new engine at the start of the 5-second lead-in,
    /// not yet running.
    pub fn new() -> Self {
        Self::with_durations(DEFAULT_WORK_MINUTES, DEFAULT_BREAK_MINUTES)
    }

    /// Create a new engine with explicit durations. Out-of-range values
    /// fall back to the defaults.
    pub fn with_durations(work_minutes: u32, break_minutes: u32) -> Self {
        let work_minutes = if (WORK_MINUTES_MIN..=WORK_MINUTES_MAX).contains(&work_minutes) {
            work_minutes
        } else {
            DEFAULT_WORK_MINUTES
        };
        let break_minutes = if (BREAK_MINUTES_MIN..=BREAK_MINUTES_MAX).contains(&break_minutes) {
            break_minutes
        } else {
            DEFAULT_BREAK_MINUTES
        };
        Self {
            phase: SessionPhase::Initializing,
            mode: Mode::Work,
            time_left_secs: INIT_LEAD_IN_SECS,
            work_minutes,
            break_minutes,
            running: false,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn time_left_secs(&self) -> u32 {
        self.time_left_secs
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn work_minutes(&self) -> u32 {
        self.work_minutes
    }

    pub fn break_minutes(&self) -> u32 {
        self.break_minutes
    }

    /// Full duration in seconds for the given mode, clamped to a 1-second
    /// minimum so a zero-length session can never spin the engine.
    pub fn duration_secs_for(&self, mode: Mode) -> u32 {
        let minutes = match mode {
            Mode::Work => self.work_minutes,
            Mode::Break => self.break_minutes,
        };
        minutes.saturating_mul(60).max(1)
    }

    /// Full duration in seconds for the current countdown (lead-in during
    /// initialization, the active mode's duration afterwards).
    pub fn total_secs(&self) -> u32 {
        match self.phase {
            SessionPhase::Initializing => INIT_LEAD_IN_SECS,
            SessionPhase::Running => self.duration_secs_for(self.mode),
        }
    }

    /// 0.0 .. 1.0 progress within the current countdown.
    pub fn progress(&self) -> f64 {
        let total = self.total_secs();
        if total == 0 {
            return 0.0;
        }
        1.0 - (self.time_left_secs as f64 / total as f64)
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Start (or resume) the countdown. Starting while already running is
    /// a no-op - the tick cadence never doubles.
    pub fn start(&mut self) -> Option<Event> {
        if self.running {
            return None;
        }
        self.running = true;
        Some(Event::SessionStarted {
            mode: self.mode,
            time_left_secs: self.time_left_secs,
            at: Utc::now(),
        })
    }

    /// Pause the countdown, keeping remaining time and mode.
    pub fn stop(&mut self) -> Option<Event> {
        if !self.running {
            return None;
        }
        self.running = false;
        Some(Event::SessionPaused {
            time_left_secs: self.time_left_secs,
            at: Utc::now(),
        })
    }

    /// Stop and return to a fresh work session at full duration.
    pub fn reset(&mut self) -> Option<Event> {
        self.running = false;
        self.phase = SessionPhase::Running;
        self.mode = Mode::Work;
        self.time_left_secs = self.duration_secs_for(Mode::Work);
        Some(Event::SessionReset { at: Utc::now() })
    }

    /// Abandon a just-started break: stop, back to work at full duration.
    pub fn skip_break(&mut self) -> Option<Event> {
        self.running = false;
        self.phase = SessionPhase::Running;
        self.mode = Mode::Work;
        self.time_left_secs = self.duration_secs_for(Mode::Work);
        Some(Event::BreakSkipped { at: Utc::now() })
    }

    /// Set the work duration. Rejected while running or out of range.
    /// When the work mode is the active countdown, the remaining time is
    /// re-derived immediately.
    pub fn set_work_minutes(&mut self, minutes: u32) -> Result<(), ValidationError> {
        if self.running {
            return Err(ValidationError::EditWhileRunning);
        }
        if !(WORK_MINUTES_MIN..=WORK_MINUTES_MAX).contains(&minutes) {
            return Err(ValidationError::DurationOutOfRange {
                mode: Mode::Work,
                minutes,
                min: WORK_MINUTES_MIN,
                max: WORK_MINUTES_MAX,
            });
        }
        self.work_minutes = minutes;
        if self.phase == SessionPhase::Running && self.mode == Mode::Work {
            self.time_left_secs = self.duration_secs_for(Mode::Work);
        }
        Ok(())
    }

    /// Set the break duration. Rejected while running or out of range.
    pub fn set_break_minutes(&mut self, minutes: u32) -> Result<(), ValidationError> {
        if self.running {
            return Err(ValidationError::EditWhileRunning);
        }
        if !(BREAK_MINUTES_MIN..=BREAK_MINUTES_MAX).contains(&minutes) {
            return Err(ValidationError::DurationOutOfRange {
                mode: Mode::Break,
                minutes,
                min: BREAK_MINUTES_MIN,
                max: BREAK_MINUTES_MAX,
            });
        }
        self.break_minutes = minutes;
        if self.phase == SessionPhase::Running && self.mode == Mode::Break {
            self.time_left_secs = self.duration_secs_for(Mode::Break);
        }
        Ok(())
    }

    /// Set the remaining time directly (dial scrubbing). Only honored
    /// while paused; clamped to the current countdown's full duration.
    pub fn set_time_left(&mut self, secs: u32) -> bool {
        if self.running {
            return false;
        }
        self.time_left_secs = secs.min(self.total_secs());
        true
    }

    /// Advance the countdown by one second.
    ///
    /// Returns `Some(Event)` when the lead-in completes or the mode flips.
    /// The engine keeps running across a transition - there is no implicit
    /// pause at a session boundary.
    pub fn tick(&mut self) -> Option<Event> {
        if !self.running {
            return None;
        }
        if self.time_left_secs > 1 {
            self.time_left_secs -= 1;
            return None;
        }
        match self.phase {
            SessionPhase::Initializing => {
                self.phase = SessionPhase::Running;
                self.mode = Mode::Work;
                self.time_left_secs = self.duration_secs_for(Mode::Work);
                Some(Event::InitializationCompleted {
                    work_secs: self.time_left_secs,
                    at: Utc::now(),
                })
            }
            SessionPhase::Running => {
                let from = self.mode;
                let to = from.flipped();
                self.mode = to;
                self.time_left_secs = self.duration_secs_for(to);
                Some(Event::ModeChanged {
                    from,
                    to,
                    time_left_secs: self.time_left_secs,
                    at: Utc::now(),
                })
            }
        }
    }
}

impl Default for TimerEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Engine already past the lead-in, paused at a full work session.
    fn running_phase_engine(work: u32, brk: u32) -> TimerEngine {
        let mut engine = TimerEngine::with_durations(work, brk);
        engine.reset();
        engine
    }

    #[test]
    fn new_engine_counts_down_lead_in() {
        let mut engine = TimerEngine::new();
        assert_eq!(engine.phase(), SessionPhase::Initializing);
        assert_eq!(engine.time_left_secs(), INIT_LEAD_IN_SECS);
        assert!(engine.start().is_some());
        for _ in 0..INIT_LEAD_IN_SECS - 1 {
            assert!(engine.tick().is_none());
        }
        match engine.tick() {
            Some(Event::InitializationCompleted { work_secs, .. }) => {
                assert_eq!(work_secs, DEFAULT_WORK_MINUTES * 60);
            }
            other => panic!("expected InitializationCompleted, got {other:?}"),
        }
        assert_eq!(engine.phase(), SessionPhase::Running);
        assert_eq!(engine.mode(), Mode::Work);
        assert!(engine.is_running());
    }

    #[test]
    fn three_ticks_from_three_seconds_flips_once() {
        let mut engine = running_phase_engine(52, 17);
        engine.set_time_left(3);
        engine.start();

        assert!(engine.tick().is_none());
        assert!(engine.tick().is_none());
        match engine.tick() {
            Some(Event::ModeChanged { from, to, time_left_secs, .. }) => {
                assert_eq!(from, Mode::Work);
                assert_eq!(to, Mode::Break);
                assert_eq!(time_left_secs, 17 * 60);
            }
            other => panic!("expected ModeChanged, got {other:?}"),
        }
        // Still running; the next tick just decrements the break.
        assert!(engine.is_running());
        assert!(engine.tick().is_none());
        assert_eq!(engine.time_left_secs(), 17 * 60 - 1);
    }

    #[test]
    fn start_is_idempotent() {
        let mut engine = running_phase_engine(52, 17);
        assert!(engine.start().is_some());
        assert!(engine.start().is_none());
        let before = engine.time_left_secs();
        engine.tick();
        assert_eq!(engine.time_left_secs(), before - 1);
    }

    #[test]
    fn stop_keeps_time_and_mode() {
        let mut engine = running_phase_engine(52, 17);
        engine.start();
        engine.tick();
        engine.tick();
        let left = engine.time_left_secs();
        assert!(engine.stop().is_some());
        assert!(!engine.is_running());
        assert_eq!(engine.time_left_secs(), left);
        assert_eq!(engine.mode(), Mode::Work);
        // Paused engine ignores ticks.
        assert!(engine.tick().is_none());
        assert_eq!(engine.time_left_secs(), left);
    }

    #[test]
    fn duration_edit_rejected_while_running() {
        let mut engine = running_phase_engine(52, 17);
        engine.start();
        assert_eq!(
            engine.set_work_minutes(25),
            Err(ValidationError::EditWhileRunning)
        );
        assert_eq!(engine.work_minutes(), 52);
    }

    #[test]
    fn duration_edit_out_of_range_keeps_prior_value() {
        let mut engine = running_phase_engine(52, 17);
        assert!(engine.set_work_minutes(121).is_err());
        assert!(engine.set_work_minutes(0).is_err());
        assert_eq!(engine.work_minutes(), 52);
        assert!(engine.set_break_minutes(61).is_err());
        assert_eq!(engine.break_minutes(), 17);
    }

    #[test]
    fn editing_active_mode_duration_rederives_time_left() {
        let mut engine = running_phase_engine(52, 17);
        assert_eq!(engine.time_left_secs(), 52 * 60);
        engine.set_work_minutes(25).unwrap();
        assert_eq!(engine.time_left_secs(), 25 * 60);
        // Break duration edit does not touch a work countdown.
        engine.set_break_minutes(5).unwrap();
        assert_eq!(engine.time_left_secs(), 25 * 60);
    }

    #[test]
    fn set_time_left_clamps_and_requires_paused() {
        let mut engine = running_phase_engine(52, 17);
        assert!(engine.set_time_left(10_000));
        assert_eq!(engine.time_left_secs(), 52 * 60);
        assert!(engine.set_time_left(90));
        assert_eq!(engine.time_left_secs(), 90);
        engine.start();
        assert!(!engine.set_time_left(5));
        assert_eq!(engine.time_left_secs(), 90);
    }

    #[test]
    fn reset_returns_to_full_work_session() {
        let mut engine = running_phase_engine(52, 17);
        engine.set_time_left(3);
        engine.start();
        engine.tick();
        engine.tick();
        engine.tick(); // now in break
        assert_eq!(engine.mode(), Mode::Break);
        engine.reset();
        assert!(!engine.is_running());
        assert_eq!(engine.mode(), Mode::Work);
        assert_eq!(engine.time_left_secs(), 52 * 60);
    }

    #[test]
    fn skip_break_stops_and_restores_work() {
        let mut engine = running_phase_engine(52, 17);
        engine.set_time_left(1);
        engine.start();
        engine.tick();
        assert_eq!(engine.mode(), Mode::Break);
        engine.skip_break();
        assert!(!engine.is_running());
        assert_eq!(engine.mode(), Mode::Work);
        assert_eq!(engine.time_left_secs(), 52 * 60);
    }
}
