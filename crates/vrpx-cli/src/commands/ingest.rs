//! One-shot fetch/process command

use clap::Args;
use std::path::{Path, PathBuf};
use vrpx_engine::{ingest, FileSource};

#[derive(Debug, Args)]
pub struct IngestArgs {
    /// Upstream document (`{metadata, roas}` JSON)
    #[arg(long, env = "VRPX_INPUT")]
    pub input: PathBuf,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn execute(args: IngestArgs, state_dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let engine = super::open_engine(state_dir)?;
    let source = FileSource::new(args.input);

    let report = ingest(&engine, &source)?;

    if args.json {
        return super::print_json(&report);
    }
    if report.accepted {
        println!("Snapshot accepted:");
    } else {
        println!("Snapshot unchanged:");
    }
    println!("  serial: {}", report.serial);
    println!("  vrp_count: {}", report.vrp_count);
    println!("  received: {}", report.received);
    Ok(())
}
