//! Fetch → parse → canonicalize → process, once or on an interval.
//!
//! Failures that leave persisted state trustworthy (unreachable source,
//! malformed document, invalid records) discard the batch and keep the
//! previous snapshot authoritative. Fatal errors stop the loop.

use chrono::Utc;
use serde::Serialize;
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::sync::Arc;
use std::time::{Duration, Instant};
use vrpx_core::errors::VrpxError;
use vrpx_core::{canonicalize, log_op_end, log_op_error, log_op_start, parse_payload};
use vrpx_core::UpstreamMetadata;
use vrpx_core_types::CycleId;
use vrpx_store::Result;

use crate::engine::Engine;
use crate::source::VrpSource;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(600);

/// Polling loop settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollerConfig {
    /// Time between the starts of consecutive cycles. A cycle that overruns
    /// it is followed immediately by the next one.
    pub interval: Duration,
    /// Stop after this many cycles; `None` runs until shutdown
    pub max_cycles: Option<u64>,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            max_cycles: None,
        }
    }
}

/// What one successful ingest did
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IngestReport {
    /// A new serial was created
    pub accepted: bool,
    /// Serial after processing
    pub serial: u64,
    /// Records in the current snapshot after processing
    pub vrp_count: usize,
    /// Records in the upstream document before dedup
    pub received: usize,
    /// Upstream generation time (unix seconds)
    pub generated: i64,
}

/// Run one fetch/process cycle and propagate every failure.
///
/// # Errors
///
/// - `ExErrorKind::ExternalSource` if the source cannot deliver a document
/// - `ExErrorKind::InvalidInput` if the document is malformed
/// - `ExErrorKind::Validation` if any record is invalid (nothing changes)
/// - any error from [`Engine::process`]
pub fn ingest<S: VrpSource + ?Sized>(engine: &Engine, source: &S) -> Result<IngestReport> {
    let fetched_at = Utc::now();
    let bytes = source.fetch()?;
    let batch = parse_payload(&bytes)?;
    let received = batch.roas.len();
    let generated = batch.metadata.generated;
    let records = canonicalize(&batch.roas).map_err(VrpxError::from)?;

    tracing::debug!(received, canonical = records.len(), generated, "Canonicalized upstream batch");

    let accepted = engine.process(records, UpstreamMetadata::new(generated, fetched_at))?;
    let state = engine.current_state()?;

    Ok(IngestReport {
        accepted,
        serial: state.serial,
        vrp_count: state.vrp_count,
        received,
        generated,
    })
}

/// Result of one poller cycle that did not stop the loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    Accepted { serial: u64 },
    Unchanged { serial: u64 },
    /// The batch was discarded; `code` is the stable error code
    Discarded { code: &'static str },
}

/// Periodic driver feeding an engine from a source
pub struct Poller<S> {
    engine: Arc<Engine>,
    source: S,
    config: PollerConfig,
}

impl<S: VrpSource> Poller<S> {
    pub fn new(engine: Arc<Engine>, source: S, config: PollerConfig) -> Self {
        Self {
            engine,
            source,
            config,
        }
    }

    pub fn config(&self) -> &PollerConfig {
        &self.config
    }

    /// Run one cycle, absorbing non-fatal failures.
    ///
    /// # Errors
    ///
    /// Only fatal errors (see `ExErrorKind::is_fatal`), tagged with the
    /// cycle's correlation ID.
    pub fn run_cycle(&self) -> Result<CycleOutcome> {
        let cycle_id = CycleId::new();
        log_op_start!(
            "poll_cycle",
            cycle_id = %cycle_id,
            source = %self.source.describe()
        );
        let start = Instant::now();

        let result = ingest(self.engine.as_ref(), &self.source);

        let elapsed = start.elapsed().as_millis() as u64;
        match result {
            Ok(report) => {
                log_op_end!(
                    "poll_cycle",
                    duration_ms = elapsed,
                    cycle_id = %cycle_id,
                    serial = report.serial,
                    accepted = report.accepted
                );
                Ok(if report.accepted {
                    CycleOutcome::Accepted {
                        serial: report.serial,
                    }
                } else {
                    CycleOutcome::Unchanged {
                        serial: report.serial,
                    }
                })
            }
            Err(e) => {
                let e = e.with_cycle_id(cycle_id.clone());
                log_op_error!("poll_cycle", e.clone(), duration_ms = elapsed, cycle_id = %cycle_id);
                if e.is_fatal() {
                    Err(e)
                } else {
                    tracing::warn!(
                        cycle_id = %cycle_id,
                        err_code = e.code(),
                        "Batch discarded, previous snapshot stays authoritative"
                    );
                    Ok(CycleOutcome::Discarded { code: e.code() })
                }
            }
        }
    }

    /// Run one cycle now, then one per interval until `shutdown` receives a
    /// message, its sender is dropped, or the cycle budget is spent.
    ///
    /// Returns the number of cycles run.
    ///
    /// # Errors
    ///
    /// The first fatal error; no further cycles run.
    pub fn run(&self, shutdown: &Receiver<()>) -> Result<u64> {
        tracing::info!(
            source = %self.source.describe(),
            interval_secs = self.config.interval.as_secs(),
            "Poller started"
        );

        let mut cycles = 0u64;
        loop {
            let started = Instant::now();
            self.run_cycle()?;
            cycles += 1;

            if self.config.max_cycles.is_some_and(|max| cycles >= max) {
                break;
            }
            match shutdown.recv_timeout(remaining(self.config.interval, started.elapsed())) {
                Err(RecvTimeoutError::Timeout) => continue,
                Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
            }
        }

        tracing::info!(cycles, "Poller stopped");
        Ok(cycles)
    }
}

/// Wait left before the next cycle, given how long the last one ran.
fn remaining(interval: Duration, spent: Duration) -> Duration {
    interval.saturating_sub(spent)
}
