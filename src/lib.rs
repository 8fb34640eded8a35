//! Bounded Cache - an in-memory cache server that cannot leak
//!
//! Entries are bounded by a fixed capacity (oldest evicted first) and a
//! per-entry TTL, with a background sweep reclaiming expired entries.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod memory;
pub mod models;
pub mod tasks;

pub use api::{AppState, SharedCache};
pub use cache::{CacheStore, Clock, ManualClock, SystemClock};
pub use config::Config;
pub use tasks::{spawn_report_task, spawn_sweep_task};
