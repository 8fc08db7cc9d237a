//! Route origin lookup command

use clap::Args;
use std::path::Path;
use vrpx_engine::{StateAccessor, VrpFilter};

#[derive(Debug, Args)]
pub struct LookupArgs {
    /// Origin AS, with or without the `AS` prefix
    #[arg(long)]
    pub asn: Option<String>,

    /// Announced prefix; must match a VRP prefix exactly
    #[arg(long)]
    pub prefix: Option<String>,
}

/// With both `--asn` and `--prefix`, report route validity. With one or
/// neither, list the VRPs matching the given filter.
pub fn execute(args: LookupArgs, state_dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let accessor = StateAccessor::new(super::open_engine(state_dir)?.into());

    match (args.asn.as_deref(), args.prefix.as_deref()) {
        (Some(asn), Some(prefix)) => super::print_json(&accessor.lookup_route(asn, prefix)?),
        (asn, prefix) => {
            let filter = VrpFilter::parse(asn, prefix)?;
            super::print_json(&accessor.find_vrps(&filter)?)
        }
    }
}
