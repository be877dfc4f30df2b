//! Snapshot source abstraction for the polling pipeline.
//!
//! A source produces paired snapshots of the machine registry and the
//! latest-reading set. The pairing matters: downstream reconciliation only
//! ever sees two collections fetched in the same cycle, never a newer
//! registry mixed with older readings.

mod api;

pub use api::ApiSource;

use async_trait::async_trait;
use thiserror::Error;

use crate::data::{Machine, Reading};

/// One cycle's snapshot pair: the machine registry and the latest readings.
pub type SnapshotPair = (Vec<Machine>, Vec<Reading>);

/// Failure modes of a snapshot fetch.
///
/// `Unreachable` is transient and retried on the next cadence tick.
/// `Unauthorized` means the credential was rejected and has been invalidated;
/// polling must not retry it without a fresh login.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    #[error("server unreachable: {0}")]
    Unreachable(String),
    #[error("authentication rejected")]
    Unauthorized,
}

/// Trait for fetching fleet snapshot pairs.
///
/// Implementations must fail fast: if either half of the pair cannot be
/// retrieved, no partial snapshot is handed downstream. Retry is the
/// scheduler's responsibility, never the source's.
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    /// Fetch the registry and latest-reading snapshots for one cycle.
    async fn fetch_snapshot(&self) -> Result<SnapshotPair, FetchError>;

    /// Returns a human-readable description of the source.
    fn description(&self) -> &str;
}
