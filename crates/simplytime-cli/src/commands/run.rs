//! Headless session driver.
//!
//! Wires the three pulse sources (1 s countdown, 50 ms breathing step,
//! 1 s cue overlay) to a [`Session`] and prints every event as a JSON
//! line. This is the reference host: a GUI would route the same pulses
//! and commands and render the same snapshots.

use std::time::Duration;

use clap::Args;
use tokio::sync::mpsc::{self, UnboundedSender};

use simplytime_core::breathing::UPDATE_INTERVAL_MS;
use simplytime_core::{AudioCue, Session, Ticker};

#[derive(Args)]
pub struct RunArgs {
    /// Work duration in minutes (1-120)
    #[arg(long, default_value_t = 52)]
    pub work_minutes: u32,
    /// Break duration in minutes (1-60)
    #[arg(long, default_value_t = 17)]
    pub break_minutes: u32,
    /// Stop counting breaths past this ceiling
    #[arg(long)]
    pub breath_cap: Option<u32>,
    /// Treat playback as authorized from the start
    #[arg(long)]
    pub enable_audio: bool,
    /// Skip the 5-second lead-in and start at a full work session
    #[arg(long)]
    pub skip_lead_in: bool,
    /// Exit after this many wall seconds (runs until Ctrl-C otherwise)
    #[arg(long)]
    pub seconds: Option<u64>,
    /// Print a state snapshot every second in addition to events
    #[arg(long)]
    pub snapshots: bool,
}

/// Audio backend that reports cue requests on the log instead of
/// synthesizing them.
struct LoggingAudio;

impl AudioCue for LoggingAudio {
    fn play_work_start_cue(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        tracing::info!(cue = "work_start", "playing ascending swell");
        Ok(())
    }
    fn play_session_end_cue(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        tracing::info!(cue = "session_end", "playing bowl strike");
        Ok(())
    }
    fn start_ambient_bridge(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        tracing::info!(cue = "ambient_bridge", "bridge on");
        Ok(())
    }
    fn stop_ambient_bridge(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        tracing::info!(cue = "ambient_bridge", "bridge off");
        Ok(())
    }
}

pub async fn run(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = Session::with_config(
        args.work_minutes,
        args.break_minutes,
        args.breath_cap,
        Box::new(LoggingAudio),
    );
    session.set_audio_enabled(args.enable_audio);

    if args.skip_lead_in {
        print_events(session.reset())?;
    }
    print_events(session.start())?;

    // Senders stay alive here so a stopped ticker leaves its channel
    // open and quiet rather than closed.
    let (countdown_tx, mut countdown_rx) = mpsc::unbounded_channel();
    let (breathing_tx, mut breathing_rx) = mpsc::unbounded_channel();
    let (overlay_tx, mut overlay_rx) = mpsc::unbounded_channel();

    let mut countdown = Ticker::new();
    let mut overlay = Ticker::new();
    let mut breathing = Ticker::new();
    breathing.start(Duration::from_millis(UPDATE_INTERVAL_MS), breathing_tx.clone());
    reconcile(&session, &mut countdown, &countdown_tx, &mut overlay, &overlay_tx);

    let mut elapsed_secs = 0u64;
    loop {
        tokio::select! {
            Some(()) = countdown_rx.recv() => {
                print_events(session.tick_second())?;
                elapsed_secs += 1;
                if args.snapshots {
                    println!("{}", serde_json::to_string(&session.snapshot())?);
                }
                if args.seconds.is_some_and(|limit| elapsed_secs >= limit) {
                    break;
                }
            }
            Some(()) = overlay_rx.recv() => {
                if let Some(ev) = session.tick_cue_overlay() {
                    print_events(vec![ev])?;
                }
            }
            Some(()) = breathing_rx.recv() => {
                session.advance_breathing(UPDATE_INTERVAL_MS);
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("interrupted, stopping session");
                break;
            }
        }
        reconcile(&session, &mut countdown, &countdown_tx, &mut overlay, &overlay_tx);
    }

    print_events(session.stop())?;
    println!("{}", serde_json::to_string_pretty(&session.snapshot())?);
    Ok(())
}

/// Keep each pulse source live exactly while its concern is.
fn reconcile(
    session: &Session,
    countdown: &mut Ticker,
    countdown_tx: &UnboundedSender<()>,
    overlay: &mut Ticker,
    overlay_tx: &UnboundedSender<()>,
) {
    let snap = session.snapshot();
    if snap.running && !countdown.is_running() {
        countdown.start(Duration::from_secs(1), countdown_tx.clone());
    } else if !snap.running {
        countdown.stop();
    }
    if snap.cue_overlay.active && !overlay.is_running() {
        overlay.start(Duration::from_secs(1), overlay_tx.clone());
    } else if !snap.cue_overlay.active {
        overlay.stop();
    }
}

fn print_events(events: Vec<simplytime_core::Event>) -> Result<(), Box<dyn std::error::Error>> {
    for event in events {
        println!("{}", serde_json::to_string(&event)?);
    }
    Ok(())
}
