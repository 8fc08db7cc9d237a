//! Current state command

use clap::Args;
use std::path::Path;
use vrpx_engine::StateAccessor;

#[derive(Debug, Args)]
pub struct StateArgs {
    /// Include the full record list
    #[arg(long)]
    pub vrps: bool,
}

pub fn execute(args: StateArgs, state_dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let accessor = StateAccessor::new(super::open_engine(state_dir)?.into());

    if args.vrps {
        super::print_json(&accessor.current_state()?)
    } else {
        super::print_json(&accessor.summary()?)
    }
}
