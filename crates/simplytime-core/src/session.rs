//! Session facade: the command surface a host renderer drives.
//!
//! Owns the timer engine, breathing cycle, cue scheduler, dial-drag and
//! text-edit state, and keeps them consistent: breathing activates with
//! break mode, cues follow transitions, scrubbing and edits only happen
//! while paused. The host observes by polling [`snapshot`] and by
//! consuming the [`Event`]s each command or tick returns.
//!
//! All mutation is serialized through `&mut self` - there is no internal
//! locking and no internal thread. The three ticking sources (1 s
//! countdown, 50 ms breathing step, 1 s overlay) are external pulse
//! sources (see [`crate::clock::Ticker`]) whose pulses the driver routes
//! into [`tick_second`], [`advance_breathing`], and [`tick_cue_overlay`].
//!
//! [`snapshot`]: Session::snapshot
//! [`tick_second`]: Session::tick_second
//! [`advance_breathing`]: Session::advance_breathing
//! [`tick_cue_overlay`]: Session::tick_cue_overlay

use chrono::Utc;
use serde::Serialize;

use crate::breathing::{BreatheReminder, BreathingCycle, BreathingPhase, BreathingVisibility};
use crate::cues::{AudioCue, CueScheduler, CueState};
use crate::dial::{self, DialDrag, DialGeometry, Point};
use crate::display::{self, IconColor};
use crate::events::{Event, TransitionEvent};
use crate::sequencer::Sequencer;
use crate::timer::engine::{BREAK_MINUTES_MAX, BREAK_MINUTES_MIN, WORK_MINUTES_MAX, WORK_MINUTES_MIN};
use crate::timer::{edit, Mode, SessionPhase, TimerEngine};

/// Choreography steps for the break-start ripple.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RippleStep {
    /// The skip-break affordance becomes available (500 ms in).
    AllowSkip,
    /// The ripple animation window is over (1200 ms in).
    Done,
}

fn ripple_sequence() -> Sequencer<RippleStep> {
    Sequencer::new(vec![(500, RippleStep::AllowSkip), (1200, RippleStep::Done)])
}

/// Full state view for the render layer.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub phase: SessionPhase,
    pub mode: Mode,
    pub time_left_secs: u32,
    pub running: bool,
    pub work_minutes: u32,
    pub break_minutes: u32,
    /// 0.0 .. 1.0 progress through the current countdown.
    pub progress: f64,
    pub breathing: BreathingSnapshot,
    pub cue_overlay: CueState,
    pub editing: bool,
    pub dragging: bool,
    pub can_skip_break: bool,
    pub ripple_active: bool,
    pub title: String,
    pub icon: IconColor,
}

#[derive(Debug, Clone, Serialize)]
pub struct BreathingSnapshot {
    pub active: bool,
    pub phase: BreathingPhase,
    pub phase_progress: f64,
    pub countdown_secs: u32,
    pub breath_count: u32,
    pub visibility: BreathingVisibility,
    pub reminder_pulsing: bool,
}

/// The interactive focus-timer session.
pub struct Session {
    engine: TimerEngine,
    breathing: BreathingCycle,
    visibility: BreathingVisibility,
    /// Set when the user closes the breathing view mid-break; cleared
    /// when the break ends so the next break shows it again.
    breathing_dismissed: bool,
    reminder: BreatheReminder,
    cues: CueScheduler,
    audio: Box<dyn AudioCue>,
    drag: DialDrag,
    dial: Option<DialGeometry>,
    edit_buffer: Option<String>,
    ripple: Sequencer<RippleStep>,
    ripple_active: bool,
    can_skip_break: bool,
}

impl Session {
    pub fn new(audio: Box<dyn AudioCue>) -> Self {
        Self::with_engine(TimerEngine::new(), None, audio)
    }

    /// Build a session with explicit durations and an optional breath
    /// count cap.
    pub fn with_config(
        work_minutes: u32,
        break_minutes: u32,
        breath_cap: Option<u32>,
        audio: Box<dyn AudioCue>,
    ) -> Self {
        Self::with_engine(
            TimerEngine::with_durations(work_minutes, break_minutes),
            breath_cap,
            audio,
        )
    }

    fn with_engine(engine: TimerEngine, breath_cap: Option<u32>, audio: Box<dyn AudioCue>) -> Self {
        Self {
            engine,
            breathing: BreathingCycle::with_cap(breath_cap),
            visibility: BreathingVisibility::Hidden,
            breathing_dismissed: false,
            reminder: BreatheReminder::default(),
            cues: CueScheduler::new(),
            audio,
            drag: DialDrag::default(),
            dial: None,
            edit_buffer: None,
            ripple: ripple_sequence(),
            ripple_active: false,
            can_skip_break: false,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn engine(&self) -> &TimerEngine {
        &self.engine
    }

    pub fn breathing(&self) -> &BreathingCycle {
        &self.breathing
    }

    pub fn is_editing(&self) -> bool {
        self.edit_buffer.is_some()
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.dragging
    }

    pub fn cue_overlay(&self) -> CueState {
        self.cues.overlay()
    }

    pub fn snapshot(&self) -> Snapshot {
        let mode = self.engine.mode();
        let running = self.engine.is_running();
        Snapshot {
            phase: self.engine.phase(),
            mode,
            time_left_secs: self.engine.time_left_secs(),
            running,
            work_minutes: self.engine.work_minutes(),
            break_minutes: self.engine.break_minutes(),
            progress: self.engine.progress(),
            breathing: BreathingSnapshot {
                active: self.breathing.is_active(),
                phase: self.breathing.phase(),
                phase_progress: self.breathing.phase_progress(),
                countdown_secs: self.breathing.phase_countdown_secs(),
                breath_count: self.breathing.breath_count(),
                visibility: self.visibility,
                reminder_pulsing: self.reminder.is_pulsing(),
            },
            cue_overlay: self.cues.overlay(),
            editing: self.is_editing(),
            dragging: self.drag.dragging,
            can_skip_break: self.can_skip_break,
            ripple_active: self.ripple_active,
            title: display::tab_title(self.engine.time_left_secs(), mode, running),
            icon: display::icon_color(mode, running),
        }
    }

    /// Snapshot as a host-consumable event.
    pub fn snapshot_event(&self) -> Event {
        Event::StateSnapshot {
            phase: self.engine.phase(),
            mode: self.engine.mode(),
            time_left_secs: self.engine.time_left_secs(),
            running: self.engine.is_running(),
            breathing_phase: self.breathing.phase(),
            breathing_progress: self.breathing.phase_progress(),
            breath_count: self.breathing.breath_count(),
            cue_overlay_secs: self.cues.overlay().seconds_remaining,
            at: Utc::now(),
        }
    }

    // ── Lifecycle commands ───────────────────────────────────────────

    pub fn set_audio_enabled(&mut self, enabled: bool) {
        self.cues.set_audio_enabled(enabled);
    }

    /// Start (or resume) the countdown.
    pub fn start(&mut self) -> Vec<Event> {
        let mut events = Vec::new();
        if let Some(ev) = self.engine.start() {
            events.push(ev);
            // Resuming straight into a work session restarts the
            // overlay window, but plays no transition cue.
            if self.engine.phase() == SessionPhase::Running && self.engine.mode() == Mode::Work {
                events.push(self.cues.on_manual_work_start());
            }
        }
        events.extend(self.sync_breathing());
        events
    }

    /// Pause the countdown. Mode and remaining time are kept; the
    /// ambient bridge and overlay are stopped.
    pub fn stop(&mut self) -> Vec<Event> {
        let mut events = Vec::new();
        if let Some(ev) = self.engine.stop() {
            events.push(ev);
            events.extend(self.cues.on_session_stopped(self.audio.as_mut()));
        }
        events.extend(self.sync_breathing());
        events
    }

    /// Stop everything and return to a full work session.
    pub fn reset(&mut self) -> Vec<Event> {
        let mut events = Vec::new();
        if let Some(ev) = self.engine.reset() {
            events.push(ev);
        }
        events.extend(self.cues.on_session_stopped(self.audio.as_mut()));
        self.breathing_dismissed = false;
        self.cancel_ripple();
        events.extend(self.sync_breathing());
        events
    }

    /// Abandon a just-started break and return to a paused work session.
    pub fn skip_break(&mut self) -> Vec<Event> {
        let mut events = Vec::new();
        if let Some(ev) = self.engine.skip_break() {
            events.push(ev);
        }
        events.extend(self.cues.on_session_stopped(self.audio.as_mut()));
        self.cancel_ripple();
        events.extend(self.sync_breathing());
        events
    }

    // ── Duration commands ────────────────────────────────────────────

    /// Set the work duration. Invalid input is logged and discarded;
    /// prior state is kept.
    pub fn set_work_minutes(&mut self, minutes: u32) {
        if let Err(e) = self.engine.set_work_minutes(minutes) {
            tracing::debug!(minutes, error = %e, "work duration edit rejected");
        }
    }

    /// Set the break duration. Invalid input is logged and discarded.
    pub fn set_break_minutes(&mut self, minutes: u32) {
        if let Err(e) = self.engine.set_break_minutes(minutes) {
            tracing::debug!(minutes, error = %e, "break duration edit rejected");
        }
    }

    /// Set remaining time directly. Honored only while paused.
    pub fn set_time_left(&mut self, secs: u32) {
        self.engine.set_time_left(secs);
    }

    // ── Text edit commands ───────────────────────────────────────────

    /// Begin editing the time as text. Refused while running. Cancels
    /// any in-flight dial drag and seeds the buffer with the active
    /// duration as `"MM:00"`.
    pub fn begin_text_edit(&mut self) -> Option<&str> {
        if self.engine.is_running() {
            return None;
        }
        self.drag.dragging = false;
        let minutes = match self.engine.mode() {
            Mode::Work => self.engine.work_minutes(),
            Mode::Break => self.engine.break_minutes(),
        };
        self.edit_buffer = Some(format!("{minutes}:00"));
        self.edit_buffer.as_deref()
    }

    /// Replace the edit buffer with what the user has typed so far.
    pub fn update_text_edit(&mut self, text: &str) {
        if let Some(buffer) = self.edit_buffer.as_mut() {
            *buffer = text.to_string();
        }
    }

    /// Commit the edit. Unparseable or out-of-range input abandons the
    /// edit silently and the prior duration survives.
    pub fn commit_text_edit(&mut self, text: &str) {
        if self.edit_buffer.take().is_none() {
            return;
        }
        let (min, max) = match self.engine.mode() {
            Mode::Work => (WORK_MINUTES_MIN, WORK_MINUTES_MAX),
            Mode::Break => (BREAK_MINUTES_MIN, BREAK_MINUTES_MAX),
        };
        match edit::parse_and_validate(text, min, max) {
            Ok(minutes) => match self.engine.mode() {
                Mode::Work => self.set_work_minutes(minutes),
                Mode::Break => self.set_break_minutes(minutes),
            },
            Err(e) => tracing::debug!(error = %e, "time edit abandoned"),
        }
    }

    /// Discard the edit buffer without applying it.
    pub fn cancel_text_edit(&mut self) {
        self.edit_buffer = None;
    }

    // ── Dial commands ────────────────────────────────────────────────

    /// The host tells us where the dial is; `None` while it has no
    /// layout yet.
    pub fn set_dial_geometry(&mut self, geometry: Option<DialGeometry>) {
        self.dial = geometry;
    }

    /// Pointer-down on the dial. Active only while paused and not
    /// editing; applies one scrub update immediately.
    pub fn begin_drag(&mut self, pointer: Point) {
        if self.engine.is_running() || self.is_editing() {
            return;
        }
        self.drag.dragging = true;
        self.apply_scrub(pointer);
    }

    /// Pointer-move while dragging. An edit starting mid-drag cancels
    /// the drag instead.
    pub fn update_drag(&mut self, pointer: Point) {
        if !self.drag.dragging {
            return;
        }
        if self.is_editing() {
            self.drag.dragging = false;
            return;
        }
        self.apply_scrub(pointer);
    }

    /// Pointer-up anywhere ends the drag.
    pub fn end_drag(&mut self) {
        self.drag.dragging = false;
    }

    fn apply_scrub(&mut self, pointer: Point) {
        // No dial geometry this frame: skip the update, keep dragging.
        let Some(geometry) = self.dial else { return };
        let total = self.engine.total_secs();
        let secs = dial::pointer_to_secs(geometry, pointer, total);
        self.engine.set_time_left(secs);
    }

    // ── Breathing commands ───────────────────────────────────────────

    /// Open the breathing view manually, outside of a break.
    pub fn preview_breathing(&mut self) -> Vec<Event> {
        self.visibility = BreathingVisibility::Previewing;
        let mut events = vec![Event::BreathingShown {
            previewing: true,
            at: Utc::now(),
        }];
        events.extend(self.sync_breathing());
        events
    }

    /// Close the breathing view. During a break this latches dismissal
    /// so the view stays closed until the next break; the cycle itself
    /// keeps running while the break does.
    pub fn dismiss_breathing(&mut self) -> Vec<Event> {
        if self.engine.is_running() && self.engine.mode() == Mode::Break {
            self.breathing_dismissed = true;
        }
        self.visibility = BreathingVisibility::Hidden;
        let mut events = vec![Event::BreathingDismissed { at: Utc::now() }];
        events.extend(self.sync_breathing());
        events
    }

    // ── Tick entry points ────────────────────────────────────────────

    /// One pulse of the main 1-second countdown.
    pub fn tick_second(&mut self) -> Vec<Event> {
        let mut events = Vec::new();
        match self.engine.tick() {
            Some(ev @ Event::InitializationCompleted { .. }) => {
                events.push(ev);
                events.extend(self.cues.on_initialization_complete(self.audio.as_mut()));
            }
            Some(ev @ Event::ModeChanged { from, to, .. }) => {
                events.push(ev);
                events.extend(
                    self.cues
                        .on_transition(TransitionEvent { from, to }, self.audio.as_mut()),
                );
                match to {
                    Mode::Break => {
                        self.ripple.start();
                        self.ripple_active = true;
                        self.can_skip_break = false;
                        if !self.breathing_dismissed {
                            self.visibility = BreathingVisibility::AutoShown;
                            events.push(Event::BreathingShown {
                                previewing: false,
                                at: Utc::now(),
                            });
                        }
                    }
                    Mode::Work => {
                        self.breathing_dismissed = false;
                        self.cancel_ripple();
                        if self.visibility == BreathingVisibility::AutoShown {
                            self.visibility = BreathingVisibility::Hidden;
                        }
                    }
                }
            }
            Some(ev) => events.push(ev),
            None => {}
        }
        events.extend(self.sync_breathing());
        events
    }

    /// One pulse of the 1-second overlay countdown.
    pub fn tick_cue_overlay(&mut self) -> Option<Event> {
        self.cues.tick_overlay()
    }

    /// One pulse of the fine-grained (≈50 ms) loop: breathing phase
    /// progress, the breathe reminder, and transition choreography.
    pub fn advance_breathing(&mut self, ms: u64) {
        if self.breathing.is_active() {
            self.breathing.advance(ms);
        } else {
            self.reminder.advance(ms);
        }
        for step in self.ripple.advance(ms) {
            match step {
                RippleStep::AllowSkip => self.can_skip_break = true,
                RippleStep::Done => self.ripple_active = false,
            }
        }
    }

    // ── Internal ─────────────────────────────────────────────────────

    /// Keep the breathing cycle in lockstep with its activation
    /// condition: `(running and in break) or previewing`.
    fn sync_breathing(&mut self) -> Vec<Event> {
        let in_break = self.engine.is_running()
            && self.engine.phase() == SessionPhase::Running
            && self.engine.mode() == Mode::Break;
        let desired = in_break || self.visibility == BreathingVisibility::Previewing;

        let mut events = Vec::new();
        if desired && !self.breathing.is_active() {
            self.breathing.activate();
            self.reminder.reset();
        } else if !desired && self.breathing.is_active() {
            self.breathing.deactivate();
            if self.visibility == BreathingVisibility::AutoShown {
                self.visibility = BreathingVisibility::Hidden;
                events.push(Event::BreathingDismissed { at: Utc::now() });
            }
        }
        events
    }

    fn cancel_ripple(&mut self) {
        self.ripple.cancel();
        self.ripple_active = false;
        self.can_skip_break = false;
    }
}
