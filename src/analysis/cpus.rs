//! Per-CPU context switch analysis
//!
//! Aggregates `sched_switch` events into a per-CPU count table and renders
//! it as a bar chart, optionally overlaid with a CPU's rated capacity.

use std::path::Path;

use anyhow::Result;
use tracing::{debug, warn};

use crate::event::{EventKind, TraceEvent};
use crate::plot::CpuBarChart;
use crate::table::CpuCountTable;
use crate::trace::{Trace, TraceError};

/// Bucket events by originating CPU.
///
/// Single pass. Events whose CPU index falls outside `[0, cpus_count)` have
/// no bucket to land in and are excluded, with the drop count logged at
/// warn level.
pub fn count_events_per_cpu<'a, I>(events: I, cpus_count: usize) -> CpuCountTable
where
    I: IntoIterator<Item = &'a TraceEvent>,
{
    let mut table = CpuCountTable::zeroed(cpus_count);
    let mut dropped = 0usize;
    for event in events {
        if !table.increment(event.cpu) {
            dropped += 1;
        }
    }
    if dropped > 0 {
        warn!(
            dropped,
            cpus_count, "events with out-of-range cpu index excluded from all buckets"
        );
    }
    debug!(
        cpus_count,
        total = table.total(),
        "aggregated events per cpu"
    );
    table
}

/// Context switch analysis over a borrowed trace.
#[derive(Debug, Clone, Copy)]
pub struct CpusAnalysis<'a> {
    trace: &'a Trace,
}

impl<'a> CpusAnalysis<'a> {
    pub fn new(trace: &'a Trace) -> Self {
        Self { trace }
    }

    /// Number of context switches observed on each CPU.
    ///
    /// Requires `sched_switch` to have been collected; a collected-but-silent
    /// trace yields all-zero counts.
    pub fn context_switch_counts(&self) -> Result<CpuCountTable, TraceError> {
        self.trace.require_events(&[EventKind::SchedSwitch])?;
        Ok(count_events_per_cpu(
            self.trace.events_of(EventKind::SchedSwitch),
            self.trace.cpus_count(),
        ))
    }

    /// Render the per-CPU context switch counts as a bar chart.
    ///
    /// Writes the chart to `filepath` when given; the rendered SVG document
    /// is returned either way.
    pub fn plot_context_switches(&self, filepath: Option<&Path>) -> Result<String> {
        let table = self.context_switch_counts()?;
        let chart = CpuBarChart::new(&table)
            .with_title("Per-CPU Task Context Switches")
            .with_y_label("Context switches");
        match filepath {
            Some(path) => chart.render_to_file(path),
            None => chart.render_svg(),
        }
    }

    /// Overlay the rated capacity of `cpu` onto a chart as a dashed
    /// reference line, colored from the chart's ongoing color cycle.
    ///
    /// Draws nothing when the platform metadata has no capacity for `cpu`.
    pub fn overlay_rated_capacity(&self, chart: &mut CpuBarChart<'_>, cpu: usize) {
        if let Some(capacity) = self.trace.plat_info().cpu_capacity(cpu) {
            chart.add_ref_line(f64::from(capacity), "rated_capacity");
        }
    }
}
