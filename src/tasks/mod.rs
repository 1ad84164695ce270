//! Background Tasks Module
//!
//! Timer-driven work that runs beside ordinary cache traffic.
//!
//! # Tasks
//! - Maintenance: sweeps expired entries and refreshes the stats snapshot
//! - Debouncer: collapses bursts of triggers into one delayed run

mod debounce;
mod maintenance;

pub use debounce::Debouncer;
pub use maintenance::spawn_maintenance_task;
