//! Data models and reconciliation for fleet snapshots.
//!
//! This module handles the transformation of raw registry and reading
//! snapshots into a structured per-machine view with aggregate statistics.
//!
//! ## Data Flow
//!
//! ```text
//! (Vec<Machine>, Vec<Reading>)   one cycle's snapshot pair
//!            │
//!            ▼
//! FleetView::reconcile()
//!            │
//!            ├──▶ MachineEntry (machine + most recent reading, if any)
//!            │
//!            └──▶ FleetStats::project() (fleet-wide counts)
//! ```

pub mod machine;
pub mod stats;
pub mod view;

pub use machine::{
    Machine, MachineId, MachineKind, MachinePayload, MachineStatus, MachineUpdate, Reading,
};
pub use stats::FleetStats;
pub use view::{FleetView, MachineEntry};
