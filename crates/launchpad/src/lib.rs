//! Launchpad: scoped compute configuration and job-template resolution.
//!
//! Administrators define compute specifications, hardware profiles, placement
//! constraints, compute environments, and dashboards, each gated by per-scope
//! visibility rules. The resolution engine decides which of those objects a
//! requester may see and, when every pairing rule holds, merges them into one
//! concrete runnable job template.

pub mod compute;
pub mod config;
pub mod dashboards;
pub mod error;
pub mod telemetry;
