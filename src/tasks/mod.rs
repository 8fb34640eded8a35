//! Background Tasks Module
//!
//! Contains background tasks that run periodically during server operation.
//!
//! # Tasks
//! - TTL Sweep: Removes expired cache entries at a fixed interval
//! - Metrics Report: Logs cache size, counters and process memory

mod report;
mod sweep;

pub use report::{collect_report, spawn_report_task};
pub use sweep::spawn_sweep_task;
