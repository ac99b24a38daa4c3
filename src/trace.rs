//! In-memory trace event store and platform metadata
//!
//! A [`Trace`] is the event-source collaborator the analysis modules borrow
//! from: an ordered event log, the logical CPU count, and optional platform
//! metadata. Construction and population are the caller's business (trace
//! parsing lives upstream); analyses only ever read.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::event::{EventKind, TraceEvent};

/// Errors surfaced by trace precondition checks.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TraceError {
    /// One or more required event kinds were never collected into the trace.
    ///
    /// Distinct from "collected but zero events observed": an empty-but-collected
    /// kind passes [`Trace::require_events`] and aggregates to all-zero counts.
    #[error("required trace events not collected: [{}]", join_kinds(.missing))]
    MissingEvents { missing: Vec<EventKind> },
}

fn join_kinds(kinds: &[EventKind]) -> String {
    kinds
        .iter()
        .map(|k| k.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Platform metadata attached to a trace.
///
/// All fields are optional; an absent entry means the platform did not
/// provide that piece of information, which is never an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatInfo {
    /// Rated performance capacity per CPU index.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpu_capacities: Option<BTreeMap<usize, u32>>,
}

impl PlatInfo {
    /// Rated capacity of `cpu`, if the platform reported one.
    pub fn cpu_capacity(&self, cpu: usize) -> Option<u32> {
        self.cpu_capacities
            .as_ref()
            .and_then(|caps| caps.get(&cpu))
            .copied()
    }
}

/// Ordered scheduling-event log for one trace window.
#[derive(Debug, Clone, Default)]
pub struct Trace {
    cpus_count: usize,
    collected: BTreeSet<EventKind>,
    events: Vec<TraceEvent>,
    plat_info: PlatInfo,
}

impl Trace {
    /// Create an empty trace over `cpus_count` logical CPUs.
    pub fn new(cpus_count: usize) -> Self {
        Self {
            cpus_count,
            ..Self::default()
        }
    }

    /// Total number of logical CPUs in the traced system.
    pub fn cpus_count(&self) -> usize {
        self.cpus_count
    }

    /// Register `kind` as collected even when no event of it was observed.
    ///
    /// Collectors call this for every tracepoint they enabled, so that
    /// "enabled but silent" is distinguishable from "never enabled".
    pub fn mark_collected(&mut self, kind: EventKind) {
        self.collected.insert(kind);
    }

    /// Append an event. Its kind is implicitly marked as collected.
    ///
    /// Events are expected in timestamp order; the store does not re-sort.
    pub fn push(&mut self, event: TraceEvent) {
        self.collected.insert(event.kind());
        self.events.push(event);
    }

    pub fn extend<I: IntoIterator<Item = TraceEvent>>(&mut self, events: I) {
        for event in events {
            self.push(event);
        }
    }

    pub fn plat_info(&self) -> &PlatInfo {
        &self.plat_info
    }

    pub fn set_plat_info(&mut self, plat_info: PlatInfo) {
        self.plat_info = plat_info;
    }

    /// Whether `kind` was collected (enabled), regardless of event count.
    pub fn is_collected(&self, kind: EventKind) -> bool {
        self.collected.contains(&kind)
    }

    /// Whether at least one event of `kind` was observed.
    pub fn has_events(&self, kind: EventKind) -> bool {
        self.events.iter().any(|e| e.kind() == kind)
    }

    /// The full event log, in insertion order.
    pub fn events(&self) -> &[TraceEvent] {
        &self.events
    }

    /// Events of one kind, in insertion order.
    pub fn events_of(&self, kind: EventKind) -> impl Iterator<Item = &TraceEvent> + '_ {
        self.events.iter().filter(move |e| e.kind() == kind)
    }

    /// First and last event timestamps, or `None` for an event-free trace.
    pub fn span(&self) -> Option<(f64, f64)> {
        let first = self.events.first()?.timestamp;
        let last = self.events.last()?.timestamp;
        Some((first, last))
    }

    /// Declared-dependency check: every kind in `kinds` must have been
    /// collected. Fails with the complete list of missing kinds.
    pub fn require_events(&self, kinds: &[EventKind]) -> Result<(), TraceError> {
        let missing: Vec<EventKind> = kinds
            .iter()
            .copied()
            .filter(|k| !self.collected.contains(k))
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(TraceError::MissingEvents { missing })
        }
    }
}
