//! Snapshot files of a linked graph
//!
//! Layout:
//!
//! ```text
//! +--------+-------------+-------+---------------------------------+
//! | CVSNAP | version u16 | flags | bincode { saved_at, graph }     |
//! | 6 B    | LE, 2 B     | 1 B   | gzip-wrapped if flags & 1       |
//! +--------+-------------+-------+---------------------------------+
//! ```
//!
//! Handles serialize as plain indices, so the stored graph keeps every
//! shared reference and cycle exactly as it was.

use crate::graph::CareerVillage;
use chrono::{DateTime, Utc};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

pub const SNAPSHOT_MAGIC: &[u8; 6] = b"CVSNAP";
pub const SNAPSHOT_VERSION: u16 = 1;

const FLAG_COMPRESSED: u8 = 0b0000_0001;

/// Snapshot errors
#[derive(Error, Debug)]
pub enum SnapshotError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] bincode::Error),

    /// The file does not start with the snapshot magic
    #[error("Not a snapshot file")]
    BadMagic,

    /// Written by an incompatible format version
    #[error("Unsupported snapshot version {0}")]
    UnsupportedVersion(u16),

    /// The body decoded but does not describe a consistent graph
    #[error("Corrupt snapshot: {0}")]
    Corrupt(String),
}

pub type SnapshotResult<T> = Result<T, SnapshotError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnapshotOptions {
    /// Gzip the body
    pub compress: bool,
}

impl Default for SnapshotOptions {
    fn default() -> Self {
        SnapshotOptions { compress: true }
    }
}

#[derive(Serialize)]
struct BodyRef<'a> {
    saved_at: DateTime<Utc>,
    graph: &'a CareerVillage,
}

#[derive(Deserialize)]
struct Body {
    saved_at: DateTime<Utc>,
    graph: CareerVillage,
}

/// Write a snapshot of `graph` to `path`, replacing any existing file
pub fn save(graph: &CareerVillage, path: &Path, options: SnapshotOptions) -> SnapshotResult<()> {
    info!("Saving snapshot to {:?} (compress: {})", path, options.compress);
    let writer = BufWriter::new(File::create(path)?);
    write_snapshot(graph, writer, options)?;
    Ok(())
}

/// Read a snapshot written by [`save`]
pub fn load(path: &Path) -> SnapshotResult<CareerVillage> {
    info!("Loading snapshot from {:?}", path);
    let reader = BufReader::new(File::open(path)?);
    read_snapshot(reader)
}

pub fn write_snapshot<W: Write>(graph: &CareerVillage, mut writer: W, options: SnapshotOptions) -> SnapshotResult<W> {
    let flags = if options.compress { FLAG_COMPRESSED } else { 0 };
    writer.write_all(SNAPSHOT_MAGIC)?;
    writer.write_all(&SNAPSHOT_VERSION.to_le_bytes())?;
    writer.write_all(&[flags])?;

    let body = BodyRef {
        saved_at: Utc::now(),
        graph,
    };

    let mut writer = if options.compress {
        let mut encoder = GzEncoder::new(writer, Compression::default());
        bincode::serialize_into(&mut encoder, &body)?;
        encoder.finish()?
    } else {
        bincode::serialize_into(&mut writer, &body)?;
        writer
    };
    writer.flush()?;
    Ok(writer)
}

pub fn read_snapshot<R: Read>(mut reader: R) -> SnapshotResult<CareerVillage> {
    let mut magic = [0u8; 6];
    match reader.read_exact(&mut magic) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => return Err(SnapshotError::BadMagic),
        Err(e) => return Err(e.into()),
    }
    if &magic != SNAPSHOT_MAGIC {
        return Err(SnapshotError::BadMagic);
    }

    let mut version = [0u8; 2];
    reader.read_exact(&mut version)?;
    let version = u16::from_le_bytes(version);
    if version != SNAPSHOT_VERSION {
        return Err(SnapshotError::UnsupportedVersion(version));
    }

    let mut flags = [0u8; 1];
    reader.read_exact(&mut flags)?;

    let body: Body = if flags[0] & FLAG_COMPRESSED != 0 {
        bincode::deserialize_from(GzDecoder::new(reader))?
    } else {
        bincode::deserialize_from(reader)?
    };

    debug!("Snapshot saved at {}", body.saved_at);
    body.graph.verify()?;
    Ok(body.graph)
}
