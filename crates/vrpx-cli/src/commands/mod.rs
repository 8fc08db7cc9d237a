pub mod diff;
pub mod ingest;
pub mod lookup;
pub mod state;
pub mod watch;

use std::path::Path;
use vrpx_engine::Engine;
use vrpx_store::StateStore;

/// Restore the engine for `state_dir`; an empty directory yields serial 0.
pub(crate) fn open_engine(state_dir: &Path) -> Result<Engine, Box<dyn std::error::Error>> {
    Ok(Engine::load(StateStore::new(state_dir))?)
}

pub(crate) fn print_json<T: serde::Serialize + ?Sized>(
    value: &T,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
