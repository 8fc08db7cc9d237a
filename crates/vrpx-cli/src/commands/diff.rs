//! Diff lookup command

use clap::Args;
use std::path::Path;
use vrpx_core::diff::render_human_summary;
use vrpx_engine::StateAccessor;

#[derive(Debug, Args)]
pub struct DiffArgs {
    #[arg(long)]
    pub from: u64,

    #[arg(long)]
    pub to: u64,

    /// Print a human-readable summary instead of JSON
    #[arg(long)]
    pub summary: bool,
}

pub fn execute(args: DiffArgs, state_dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let accessor = StateAccessor::new(super::open_engine(state_dir)?.into());

    let Some(diff) = accessor.diff_between(args.from, args.to)? else {
        return Err(format!("Diff not found for serial {} → {}", args.from, args.to).into());
    };

    if args.summary {
        print!("{}", render_human_summary(&diff));
        Ok(())
    } else {
        super::print_json(&diff)
    }
}
