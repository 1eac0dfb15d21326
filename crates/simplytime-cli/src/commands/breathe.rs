//! Standalone box-breathing preview, outside of any timer.

use std::time::Duration;

use clap::Args;
use tokio::sync::mpsc;

use simplytime_core::breathing::UPDATE_INTERVAL_MS;
use simplytime_core::{NullAudio, Session, Ticker};

#[derive(Args)]
pub struct BreatheArgs {
    /// Number of full 16-second breaths before exiting
    #[arg(long, default_value_t = 3)]
    pub breaths: u32,
    /// Stop counting past this ceiling
    #[arg(long)]
    pub breath_cap: Option<u32>,
}

pub async fn run(args: BreatheArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = Session::with_config(52, 17, args.breath_cap, Box::new(NullAudio));
    session.preview_breathing();

    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut ticker = Ticker::new();
    ticker.start(Duration::from_millis(UPDATE_INTERVAL_MS), tx);

    let mut last_phase = session.breathing().phase();
    println!("{} ({}s)", last_phase.label(), session.breathing().phase_countdown_secs());

    loop {
        tokio::select! {
            Some(()) = rx.recv() => {
                session.advance_breathing(UPDATE_INTERVAL_MS);
                let phase = session.breathing().phase();
                if phase != last_phase {
                    last_phase = phase;
                    println!(
                        "{} (breath {})",
                        phase.label(),
                        session.breathing().breath_count() + 1
                    );
                }
                if session.breathing().breath_count() >= args.breaths {
                    break;
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    ticker.stop();
    let breaths = session.breathing().breath_count();
    session.dismiss_breathing();
    println!("done: {breaths} breaths");
    Ok(())
}
