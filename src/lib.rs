//! # fleetwatch
//!
//! A diagnostic client and library for monitoring the live health of an
//! industrial machine fleet.
//!
//! The crate polls an authenticated fleet API for paired snapshots of the
//! machine registry and the latest sensor readings, reconciles them into a
//! coherent per-machine view, classifies health from the fleet-authoritative
//! status, and raises de-duplicated alerts exactly once per state transition.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                          Watcher task                          │
//! │  ┌─────────┐   ┌───────────┐   ┌────────────┐   ┌──────────┐  │
//! │  │ source  │──▶│   data    │──▶│   alert    │──▶│  watch   │  │
//! │  │ (fetch) │   │(reconcile)│   │  (dedupe)  │   │ channel  │  │
//! │  └────┬────┘   └───────────┘   └────────────┘   └──────────┘  │
//! │       │                                                        │
//! │       ▼                                                        │
//! │  ┌─────────┐                                                   │
//! │  │   api   │◀── ApiClient + Session (bearer token)             │
//! │  └─────────┘                                                   │
//! └────────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`api`]**: authenticated HTTP transport - registry CRUD, telemetry
//!   reads, login, report download, and the [`Session`] credential lifecycle
//! - **[`source`]**: the [`SnapshotSource`] abstraction producing paired
//!   registry/reading snapshots with fail-fast semantics
//! - **[`data`]**: domain model and reconciliation - [`FleetView`] merging
//!   and [`FleetStats`] projection
//! - **[`alert`]**: per-machine alert state with stable notification
//!   identifiers and explicit raised/active/resolved transitions
//! - **[`watcher`]**: the fixed-delay polling scheduler publishing
//!   [`FleetUpdate`] snapshots to the presentation boundary
//!
//! ## Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use fleetwatch::{ApiClient, ApiSource, Session, Watcher};
//!
//! # tokio_test::block_on(async {
//! let session = Arc::new(Session::with_store("/tmp/fleetwatch-token"));
//! let client = ApiClient::builder()
//!     .base_url("http://localhost:8000")
//!     .session(session)
//!     .build();
//! client.login("operator@plant.local", "secret").await?;
//!
//! let source = ApiSource::new(client, "http://localhost:8000");
//! let (mut updates, handle) = Watcher::new(source).start();
//!
//! while updates.changed().await.is_ok() {
//!     let update = updates.borrow_and_update().clone();
//!     for alert in &update.alerts {
//!         println!("[{}] {}", alert.notification_id, alert.message);
//!     }
//! }
//! # Ok::<_, fleetwatch::ApiError>(())
//! # });
//! ```

pub mod alert;
pub mod api;
pub mod config;
pub mod data;
pub mod source;
pub mod watcher;

// Re-export main types for convenience
pub use alert::{AlertEvent, AlertSeverity, AlertTracker, AlertTransition};
pub use api::{ApiClient, ApiError, Session};
pub use config::WatchConfig;
pub use data::{
    FleetStats, FleetView, Machine, MachineEntry, MachineId, MachineKind, MachineStatus, Reading,
};
pub use source::{ApiSource, FetchError, SnapshotPair, SnapshotSource};
pub use watcher::{FleetUpdate, Watcher, WatcherHandle, DEFAULT_CADENCE};
