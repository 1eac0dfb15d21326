//! Timer state machine: work/break countdown, duration bounds, and the
//! permissive free-form time-edit parser.

pub mod edit;
pub mod engine;

pub use edit::parse_minutes;
pub use engine::{Mode, SessionPhase, TimerEngine};
