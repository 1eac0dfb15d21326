//! # Simply Time Core Library
//!
//! Core business logic for the Simply Time focus timer: an alternating
//! work/break countdown with a guided box-breathing cycle during breaks
//! and audio/visual cue scheduling on mode transitions. The rendering
//! layer is external -- it observes state snapshots and events, and
//! drives the core through an explicit command surface.
//!
//! ## Architecture
//!
//! - **Timer Engine**: a caller-driven state machine. The caller invokes
//!   `tick()` once per second; the engine decides when a session ends,
//!   flips the mode, and emits a transition event
//! - **Breathing Cycle**: an independent 4-phase loop advanced in small
//!   millisecond steps while break mode (or a manual preview) is active
//! - **Cue Scheduler**: consumes transition events and runs the 60-second
//!   ambient-bridge overlay countdown; audio playback is a collaborator
//!   trait whose failures never touch timer state
//! - **Clock Driver**: tokio-interval pulse sources, one per concern,
//!   with idempotent restart semantics
//!
//! ## Key Components
//!
//! - [`Session`]: command surface tying all the state machines together
//! - [`TimerEngine`]: work/break countdown state machine
//! - [`BreathingCycle`]: box-breathing phase loop and breath counter
//! - [`CueScheduler`]: transition cues and the overlay countdown
//! - [`AudioCue`]: trait for the host's audio backend

pub mod breathing;
pub mod clock;
pub mod cues;
pub mod dial;
pub mod display;
pub mod error;
pub mod events;
pub mod sequencer;
pub mod session;
pub mod timer;

pub use breathing::{BreathingCycle, BreathingPhase, BreathingVisibility};
pub use clock::Ticker;
pub use cues::{AudioCue, CueScheduler, CueState, NullAudio};
pub use dial::{DialDrag, DialGeometry, Point};
pub use error::{CoreError, ValidationError};
pub use events::{Event, TransitionEvent};
pub use session::{Session, Snapshot};
pub use timer::{Mode, SessionPhase, TimerEngine};
