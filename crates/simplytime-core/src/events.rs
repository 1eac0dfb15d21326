use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::breathing::BreathingPhase;
use crate::timer::{Mode, SessionPhase};

/// Ephemeral record of a single mode flip, emitted exactly once per flip.
/// Consumed by the cue scheduler, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionEvent {
    pub from: Mode,
    pub to: Mode,
}

/// Every state change in the system produces an Event.
/// The render layer polls for events; it never mutates state directly.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    SessionStarted {
        mode: Mode,
        time_left_secs: u32,
        at: DateTime<Utc>,
    },
    SessionPaused {
        time_left_secs: u32,
        at: DateTime<Utc>,
    },
    SessionReset {
        at: DateTime<Utc>,
    },
    /// The 5-second lead-in expired and the first work session began.
    InitializationCompleted {
        work_secs: u32,
        at: DateTime<Utc>,
    },
    /// The countdown expired and the mode flipped.
    ModeChanged {
        from: Mode,
        to: Mode,
        time_left_secs: u32,
        at: DateTime<Utc>,
    },
    /// A just-started break was abandoned; back to work at full duration.
    BreakSkipped {
        at: DateTime<Utc>,
    },
    /// The 60-second ambient-bridge overlay countdown started.
    CueOverlayStarted {
        seconds: u32,
        at: DateTime<Utc>,
    },
    /// The overlay countdown reached zero or was force-stopped.
    CueOverlayFinished {
        at: DateTime<Utc>,
    },
    BreathingShown {
        previewing: bool,
        at: DateTime<Utc>,
    },
    BreathingDismissed {
        at: DateTime<Utc>,
    },
    StateSnapshot {
        phase: SessionPhase,
        mode: Mode,
        time_left_secs: u32,
        running: bool,
        breathing_phase: BreathingPhase,
        breathing_progress: f64,
        breath_count: u32,
        cue_overlay_secs: u32,
        at: DateTime<Utc>,
    },
}
