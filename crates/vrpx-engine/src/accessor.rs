//! Read-only query surface over a shared engine.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use vrpx_core::errors::{ExError, ExErrorKind};
use vrpx_core::{Asn, DiffRecord, Prefix, VrpRecord};
use vrpx_store::Result;

use crate::engine::{CurrentState, Engine};

/// State without the record list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StateSummary {
    pub serial: u64,
    pub vrp_count: usize,
    pub hash: String,
    #[serde(with = "vrpx_core::model::timestamp::option")]
    pub last_update: Option<DateTime<Utc>>,
}

/// Exact-match record filter. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VrpFilter {
    pub asn: Option<Asn>,
    pub prefix: Option<Prefix>,
}

impl VrpFilter {
    /// Build a filter from user input. The ASN may omit its `AS` prefix.
    ///
    /// # Errors
    ///
    /// `ExErrorKind::InvalidInput` if either value does not parse.
    pub fn parse(asn: Option<&str>, prefix: Option<&str>) -> Result<Self> {
        Ok(Self {
            asn: asn.map(parse_asn).transpose()?,
            prefix: prefix.map(parse_prefix).transpose()?,
        })
    }

    pub fn matches(&self, record: &VrpRecord) -> bool {
        self.asn.iter().all(|&asn| record.asn() == asn)
            && self.prefix.iter().all(|prefix| record.prefix() == prefix)
    }
}

/// Result of [`StateAccessor::find_vrps`]
#[derive(Debug, Clone, Serialize)]
pub struct VrpQuery {
    pub serial: u64,
    pub total_vrps: usize,
    pub filtered_vrps: usize,
    #[serde(with = "vrpx_core::model::timestamp::option")]
    pub last_update: Option<DateTime<Utc>>,
    pub vrps: Vec<VrpRecord>,
}

/// Result of [`StateAccessor::lookup_route`]
#[derive(Debug, Clone, Serialize)]
pub struct RouteValidity {
    pub asn: Asn,
    pub prefix: Prefix,
    /// At least one VRP authorizes exactly this origin and prefix
    pub valid: bool,
    pub matching_vrps: Vec<VrpRecord>,
    pub serial: u64,
}

/// Cheap to clone; every clone reads the same engine.
#[derive(Debug, Clone)]
pub struct StateAccessor {
    engine: Arc<Engine>,
}

impl StateAccessor {
    pub fn new(engine: Arc<Engine>) -> Self {
        Self { engine }
    }

    /// # Errors
    ///
    /// `ExErrorKind::Concurrency` if the engine lock is poisoned.
    pub fn current_state(&self) -> Result<CurrentState> {
        self.engine.current_state()
    }

    /// # Errors
    ///
    /// See [`Engine::diff_between`].
    pub fn diff_between(&self, from: u64, to: u64) -> Result<Option<DiffRecord>> {
        self.engine.diff_between(from, to)
    }

    /// # Errors
    ///
    /// `ExErrorKind::Concurrency` if the engine lock is poisoned.
    pub fn summary(&self) -> Result<StateSummary> {
        let state = self.engine.current_state()?;
        Ok(StateSummary {
            serial: state.serial,
            vrp_count: state.vrp_count,
            hash: state.hash,
            last_update: state.last_update,
        })
    }

    /// # Errors
    ///
    /// `ExErrorKind::Concurrency` if the engine lock is poisoned.
    pub fn find_vrps(&self, filter: &VrpFilter) -> Result<VrpQuery> {
        let state = self.engine.current_state()?;
        let vrps: Vec<VrpRecord> = state
            .vrps()
            .iter()
            .filter(|record| filter.matches(record))
            .cloned()
            .collect();
        Ok(VrpQuery {
            serial: state.serial,
            total_vrps: state.vrp_count,
            filtered_vrps: vrps.len(),
            last_update: state.last_update,
            vrps,
        })
    }

    /// Find the VRPs whose ASN and prefix both equal the announcement's.
    ///
    /// maxLength is not consulted; only exact prefix matches count.
    ///
    /// # Errors
    ///
    /// - `ExErrorKind::InvalidInput` if the ASN or prefix does not parse
    /// - `ExErrorKind::Concurrency` if the engine lock is poisoned
    pub fn lookup_route(&self, asn: &str, prefix: &str) -> Result<RouteValidity> {
        let asn = parse_asn(asn)?;
        let prefix = parse_prefix(prefix)?;
        let query = self.find_vrps(&VrpFilter {
            asn: Some(asn),
            prefix: Some(prefix),
        })?;
        Ok(RouteValidity {
            asn,
            prefix,
            valid: !query.vrps.is_empty(),
            matching_vrps: query.vrps,
            serial: query.serial,
        })
    }
}

fn parse_asn(raw: &str) -> Result<Asn> {
    Asn::parse_lenient(raw).map_err(|e| invalid_query("asn", e))
}

fn parse_prefix(raw: &str) -> Result<Prefix> {
    raw.parse::<Prefix>().map_err(|e| invalid_query("prefix", e))
}

fn invalid_query(field: &str, err: impl std::fmt::Display) -> ExError {
    ExError::new(ExErrorKind::InvalidInput)
        .with_op("parse_query")
        .with_message(format!("{}: {}", field, err))
}
