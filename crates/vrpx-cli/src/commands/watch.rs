//! Polling loop command

use clap::Args;
use std::path::{Path, PathBuf};
use std::sync::{mpsc, Arc};
use std::time::Duration;
use vrpx_engine::{FileSource, Poller, PollerConfig};

#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Upstream document, re-read every cycle
    #[arg(long, env = "VRPX_INPUT")]
    pub input: PathBuf,

    /// Seconds between cycles
    #[arg(long, env = "VRPX_POLL_INTERVAL_SECONDS", default_value_t = 600)]
    pub interval_secs: u64,

    /// Stop after this many cycles (runs until killed if omitted)
    #[arg(long)]
    pub cycles: Option<u64>,
}

pub fn execute(args: WatchArgs, state_dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let engine = Arc::new(super::open_engine(state_dir)?);
    let config = PollerConfig {
        interval: Duration::from_secs(args.interval_secs),
        max_cycles: args.cycles,
    };
    let poller = Poller::new(Arc::clone(&engine), FileSource::new(args.input), config);

    // Held for the whole run; the loop ends on the cycle budget or when killed
    let (_shutdown_tx, shutdown_rx) = mpsc::channel::<()>();
    let cycles = poller.run(&shutdown_rx)?;

    let state = engine.current_state()?;
    println!("Stopped after {} cycles:", cycles);
    println!("  serial: {}", state.serial);
    println!("  vrp_count: {}", state.vrp_count);
    Ok(())
}
