//! Cue scheduling: audio effects and the ambient-bridge overlay.
//!
//! The scheduler reacts to mode transitions and to the completion of the
//! initialization lead-in. Audio playback lives behind the [`AudioCue`]
//! trait; a cue that fails to play is logged and dropped - it never
//! blocks or alters timer state. Until the host reports that playback
//! has been authorized, requested cues are skipped outright, not queued.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::events::{Event, TransitionEvent};
use crate::timer::Mode;

/// Seconds the ambient bridge and its overlay run after a work session
/// starts. Fixed regardless of the work duration.
pub const OVERLAY_SECS: u32 = 60;

/// Sound recipes the host backend is expected to honor, kept here so the
/// core remains the single description of cue behavior.
pub mod recipe {
    /// Work start: 1.5 s ascending sine swell, 330 Hz to a 440 Hz peak,
    /// 200 ms attack, doubled an octave up at low gain.
    pub const WORK_START_SWEEP_HZ: (f32, f32) = (330.0, 440.0);
    pub const WORK_START_SECS: f32 = 1.5;
    pub const WORK_START_ATTACK_SECS: f32 = 0.2;

    /// Session end: a bowl strike, 220 Hz fundamental plus a 440 Hz
    /// harmonic, 3 s exponential decay.
    pub const SESSION_END_FUNDAMENTAL_HZ: f32 = 220.0;
    pub const SESSION_END_DECAY_SECS: f32 = 3.0;

    /// Ambient bridge: pink noise at 5% gain for the overlay window.
    pub const BRIDGE_GAIN: f32 = 0.05;
}

/// The host's audio backend. All methods are fire-and-forget from the
/// scheduler's point of view: an `Err` is logged, never propagated.
pub trait AudioCue {
    /// The ascending swell marking the start of a work session.
    fn play_work_start_cue(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        Ok(()) // default no-op
    }

    /// The bowl strike marking the end of a work session.
    fn play_session_end_cue(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        Ok(()) // default no-op
    }

    /// Begin the low-level background noise bridging into focus.
    fn start_ambient_bridge(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        Ok(()) // default no-op
    }

    /// Stop the background noise if it is playing.
    fn stop_ambient_bridge(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        Ok(()) // default no-op
    }
}

/// Backend that plays nothing. Useful for tests and headless hosts.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullAudio;

impl AudioCue for NullAudio {}

/// State of the post-work-start overlay countdown. Independent of the
/// main countdown; self-terminates at zero.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct CueState {
    pub active: bool,
    pub seconds_remaining: u32,
}

/// Consumes transition events and drives the overlay countdown.
#[derive(Debug, Default)]
pub struct CueScheduler {
    audio_enabled: bool,
    overlay: CueState,
}

impl CueScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn overlay(&self) -> CueState {
        self.overlay
    }

    pub fn audio_enabled(&self) -> bool {
        self.audio_enabled
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// One-time playback authorization gate, set after the host observes
    /// an explicit user interaction.
    pub fn set_audio_enabled(&mut self, enabled: bool) {
        self.audio_enabled = enabled;
    }

    /// The lead-in finished and the first work session began: same cues
    /// as any entry into work.
    pub fn on_initialization_complete(&mut self, audio: &mut dyn AudioCue) -> Vec<Event> {
        self.enter_work(audio)
    }

    /// React to a mode flip.
    pub fn on_transition(&mut self, transition: TransitionEvent, audio: &mut dyn AudioCue) -> Vec<Event> {
        match (transition.from, transition.to) {
            (Mode::Work, Mode::Break) => {
                let mut events = Vec::new();
                self.fire(audio, "stop_ambient_bridge", |a| a.stop_ambient_bridge());
                if let Some(ev) = self.stop_overlay() {
                    events.push(ev);
                }
                self.fire(audio, "session_end", |a| a.play_session_end_cue());
                events
            }
            (Mode::Break, Mode::Work) => self.enter_work(audio),
            // Same-mode "transitions" do not occur; nothing to schedule.
            _ => Vec::new(),
        }
    }

    /// The countdown was started manually while already in work mode:
    /// restart the overlay, but play no transition cue.
    pub fn on_manual_work_start(&mut self) -> Event {
        self.start_overlay()
    }

    /// The countdown was paused or reset: silence the bridge and force
    /// the overlay off regardless of remaining time. Already-fired cue
    /// playback is not retroactively cancelled.
    pub fn on_session_stopped(&mut self, audio: &mut dyn AudioCue) -> Option<Event> {
        self.fire(audio, "stop_ambient_bridge", |a| a.stop_ambient_bridge());
        self.stop_overlay()
    }

    /// Advance the overlay countdown by one second.
    pub fn tick_overlay(&mut self) -> Option<Event> {
        if !self.overlay.active {
            return None;
        }
        if self.overlay.seconds_remaining > 1 {
            self.overlay.seconds_remaining -= 1;
            return None;
        }
        self.overlay = CueState::default();
        Some(Event::CueOverlayFinished { at: Utc::now() })
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn enter_work(&mut self, audio: &mut dyn AudioCue) -> Vec<Event> {
        self.fire(audio, "work_start", |a| a.play_work_start_cue());
        self.fire(audio, "start_ambient_bridge", |a| a.start_ambient_bridge());
        vec![self.start_overlay()]
    }

    /// Restarting always cancels the prior countdown by overwriting it;
    /// there is only ever one overlay countdown.
    fn start_overlay(&mut self) -> Event {
        self.overlay = CueState {
            active: true,
            seconds_remaining: OVERLAY_SECS,
        };
        Event::CueOverlayStarted {
            seconds: OVERLAY_SECS,
            at: Utc::now(),
        }
    }

    fn stop_overlay(&mut self) -> Option<Event> {
        if !self.overlay.active {
            return None;
        }
        self.overlay = CueState::default();
        Some(Event::CueOverlayFinished { at: Utc::now() })
    }

    /// Fire-and-forget dispatch through the authorization gate.
    fn fire<F>(&self, audio: &mut dyn AudioCue, name: &str, f: F)
    where
        F: FnOnce(&mut dyn AudioCue) -> Result<(), Box<dyn std::error::Error>>,
    {
        if !self.audio_enabled {
            tracing::debug!(cue = name, "audio not enabled yet, skipping cue");
            return;
        }
        if let Err(e) = f(audio) {
            tracing::warn!(cue = name, error = %e, "cue playback failed");
        }
    }
}
