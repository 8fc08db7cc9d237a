//! VRPX Engine - Serial state machine and its read/ingest surfaces
//!
//! Provides the snapshot/diff/serial engine over a [`vrpx_store::StateStore`],
//! a read-only accessor, and the polling loop that feeds the engine from a
//! [`source::VrpSource`].

pub mod accessor;
pub mod engine;
pub mod poller;
pub mod source;

pub use accessor::{RouteValidity, StateAccessor, StateSummary, VrpFilter, VrpQuery};
pub use engine::{CurrentState, Engine};
pub use poller::{ingest, CycleOutcome, IngestReport, Poller, PollerConfig};
pub use source::{FileSource, VrpSource};
