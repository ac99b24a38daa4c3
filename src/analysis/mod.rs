//! Trace analysis modules
//!
//! Each analysis borrows a [`crate::trace::Trace`] read-only and produces
//! typed tables, optionally rendered through [`crate::plot`].

pub mod cpus;
pub mod idle;

pub use cpus::{count_events_per_cpu, CpusAnalysis};
pub use idle::{IdleAnalysis, StateResidency};
