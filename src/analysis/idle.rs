//! CPU idle analysis
//!
//! Wakeup counts and idle state residency derived from `cpu_idle` events.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Result;

use crate::analysis::cpus::count_events_per_cpu;
use crate::event::{EventFields, EventKind, IDLE_EXIT};
use crate::plot::CpuBarChart;
use crate::table::CpuCountTable;
use crate::trace::{Trace, TraceError};

/// Time spent in one idle state on one CPU.
#[derive(Debug, Clone, PartialEq)]
pub struct StateResidency {
    pub state: i64,
    pub time_s: f64,
}

/// Idle analysis over a borrowed trace.
#[derive(Debug, Clone, Copy)]
pub struct IdleAnalysis<'a> {
    trace: &'a Trace,
}

impl<'a> IdleAnalysis<'a> {
    pub fn new(trace: &'a Trace) -> Self {
        Self { trace }
    }

    /// Number of wakeups (transitions out of idle) observed on each CPU.
    pub fn wakeup_counts(&self) -> Result<CpuCountTable, TraceError> {
        self.trace.require_events(&[EventKind::CpuIdle])?;
        let exits = self
            .trace
            .events_of(EventKind::CpuIdle)
            .filter(|e| matches!(e.fields, EventFields::CpuIdle { state: IDLE_EXIT }));
        Ok(count_events_per_cpu(exits, self.trace.cpus_count()))
    }

    /// Time spent by `cpu` in each idle state, one row per state seen,
    /// sorted by state id. The interval left open by the last event is
    /// closed at the end of the trace span.
    pub fn state_residency(&self, cpu: usize) -> Result<Vec<StateResidency>, TraceError> {
        self.trace.require_events(&[EventKind::CpuIdle])?;
        let end = self.trace.span().map(|(_, last)| last).unwrap_or(0.0);

        let mut acc: BTreeMap<i64, f64> = BTreeMap::new();
        let mut current: Option<(i64, f64)> = None;
        for event in self.trace.events_of(EventKind::CpuIdle) {
            if event.cpu != cpu {
                continue;
            }
            let state = match event.fields {
                EventFields::CpuIdle { state } => state,
                _ => continue,
            };
            if let Some((prev_state, entered_at)) = current.take() {
                if prev_state != IDLE_EXIT {
                    *acc.entry(prev_state).or_insert(0.0) +=
                        (event.timestamp - entered_at).max(0.0);
                }
            }
            current = Some((state, event.timestamp));
        }
        if let Some((state, entered_at)) = current {
            if state != IDLE_EXIT {
                *acc.entry(state).or_insert(0.0) += (end - entered_at).max(0.0);
            }
        }

        Ok(acc
            .into_iter()
            .map(|(state, time_s)| StateResidency { state, time_s })
            .collect())
    }

    /// Render the per-CPU wakeup counts as a bar chart.
    ///
    /// Writes the chart to `filepath` when given; the rendered SVG document
    /// is returned either way.
    pub fn plot_wakeups(&self, filepath: Option<&Path>) -> Result<String> {
        let table = self.wakeup_counts()?;
        let chart = CpuBarChart::new(&table)
            .with_title("Per-CPU Wakeups")
            .with_y_label("Wakeups");
        match filepath {
            Some(path) => chart.render_to_file(path),
            None => chart.render_svg(),
        }
    }
}
