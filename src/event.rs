//! Scheduler trace event records
//!
//! Field sets mirror the kernel tracepoints they were collected from.

use std::fmt;

use serde::{Deserialize, Serialize};

/// `cpu_idle` state value marking a CPU leaving idle.
pub const IDLE_EXIT: i64 = -1;

/// Kind of a collectable trace event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    SchedSwitch,
    CpuIdle,
}

impl EventKind {
    /// Returns the canonical tracepoint name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SchedSwitch => "sched_switch",
            Self::CpuIdle => "cpu_idle",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind-specific payload of a trace event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum EventFields {
    /// A context switch: `prev` was scheduled out, `next` was scheduled in.
    SchedSwitch {
        prev_comm: String,
        prev_pid: i32,
        prev_state: i64,
        next_comm: String,
        next_pid: i32,
        next_prio: i32,
    },
    /// An idle state transition. `state >= 0` names the idle state entered;
    /// [`IDLE_EXIT`] marks the CPU becoming active again.
    CpuIdle { state: i64 },
}

/// One trace record, immutable once constructed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceEvent {
    /// Seconds from the start of the trace window.
    pub timestamp: f64,
    /// Index of the CPU the event originated on.
    pub cpu: usize,
    #[serde(flatten)]
    pub fields: EventFields,
}

impl TraceEvent {
    pub fn new(timestamp: f64, cpu: usize, fields: EventFields) -> Self {
        Self {
            timestamp,
            cpu,
            fields,
        }
    }

    /// Convenience constructor for a `sched_switch` record.
    #[allow(clippy::too_many_arguments)]
    pub fn sched_switch(
        timestamp: f64,
        cpu: usize,
        prev_comm: &str,
        prev_pid: i32,
        prev_state: i64,
        next_comm: &str,
        next_pid: i32,
        next_prio: i32,
    ) -> Self {
        Self::new(
            timestamp,
            cpu,
            EventFields::SchedSwitch {
                prev_comm: prev_comm.to_string(),
                prev_pid,
                prev_state,
                next_comm: next_comm.to_string(),
                next_pid,
                next_prio,
            },
        )
    }

    /// Convenience constructor for a `cpu_idle` record.
    pub fn cpu_idle(timestamp: f64, cpu: usize, state: i64) -> Self {
        Self::new(timestamp, cpu, EventFields::CpuIdle { state })
    }

    pub fn kind(&self) -> EventKind {
        match self.fields {
            EventFields::SchedSwitch { .. } => EventKind::SchedSwitch,
            EventFields::CpuIdle { .. } => EventKind::CpuIdle,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_kind_as_str() {
        assert_eq!(EventKind::SchedSwitch.as_str(), "sched_switch");
        assert_eq!(EventKind::CpuIdle.as_str(), "cpu_idle");
    }

    #[test]
    fn test_event_kind_display() {
        assert_eq!(format!("{}", EventKind::SchedSwitch), "sched_switch");
    }

    #[test]
    fn test_sched_switch_kind() {
        let ev = TraceEvent::sched_switch(0.5, 2, "swapper/2", 0, 0, "kworker/2:1", 137, 120);
        assert_eq!(ev.kind(), EventKind::SchedSwitch);
        assert_eq!(ev.cpu, 2);
    }

    #[test]
    fn test_cpu_idle_kind() {
        let ev = TraceEvent::cpu_idle(1.0, 0, 2);
        assert_eq!(ev.kind(), EventKind::CpuIdle);
    }

    #[test]
    fn test_event_json_round_trip() {
        let ev = TraceEvent::sched_switch(1.25, 1, "bash", 442, 1, "vim", 501, 120);
        let json = serde_json::to_string(&ev).unwrap();
        let back: TraceEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ev);
    }

    #[test]
    fn test_event_json_tag() {
        let ev = TraceEvent::cpu_idle(0.0, 3, IDLE_EXIT);
        let json = serde_json::to_string(&ev).unwrap();
        assert!(json.contains("\"event\":\"cpu_idle\""));
        assert!(json.contains("\"state\":-1"));
    }
}
