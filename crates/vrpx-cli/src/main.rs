//! VRPX CLI
//!
//! Command-line interface for VRPX

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use vrpx_core::logging_facility::{self, Profile};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "vrpx")]
#[command(about = "VRPX - RPKI VRP snapshots with serials and diffs", long_about = None)]
struct Cli {
    /// Directory holding state metadata, snapshots and diffs
    #[arg(long, global = true, env = "VRPX_STATE_DIR", default_value = "./state")]
    state_dir: PathBuf,

    /// Log output format (logs go to stderr)
    #[arg(
        long,
        global = true,
        env = "VRPX_LOG_FORMAT",
        value_enum,
        default_value_t = LogFormat::Pretty
    )]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Pretty,
    Json,
}

impl LogFormat {
    fn profile(self) -> Profile {
        match self {
            LogFormat::Pretty => Profile::Development,
            LogFormat::Json => Profile::Production,
        }
    }
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Fetch and process one upstream document
    Ingest(commands::ingest::IngestArgs),
    /// Poll the upstream document on an interval
    Watch(commands::watch::WatchArgs),
    /// Print the current state as JSON
    State(commands::state::StateArgs),
    /// Print the diff for one serial step
    Diff(commands::diff::DiffArgs),
    /// Check whether VRPs authorize an origin AS for a prefix
    Lookup(commands::lookup::LookupArgs),
}

fn main() {
    // A missing .env file is fine
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    logging_facility::init(cli.log_format.profile());

    let state_dir = cli.state_dir;
    let result = match cli.command {
        Commands::Ingest(args) => commands::ingest::execute(args, &state_dir),
        Commands::Watch(args) => commands::watch::execute(args, &state_dir),
        Commands::State(args) => commands::state::execute(args, &state_dir),
        Commands::Diff(args) => commands::diff::execute(args, &state_dir),
        Commands::Lookup(args) => commands::lookup::execute(args, &state_dir),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
