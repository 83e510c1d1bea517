//! Persistence of linked graphs
//!
//! A loaded graph is written as a single snapshot file so later runs can
//! skip parsing and linking the raw tables.

pub mod snapshot;

pub use snapshot::{
    load, read_snapshot, save, write_snapshot, SnapshotError, SnapshotOptions, SnapshotResult,
    SNAPSHOT_MAGIC, SNAPSHOT_VERSION,
};
