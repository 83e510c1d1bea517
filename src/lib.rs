//! CareerVillage Graph
//!
//! Loads the CareerVillage mentorship dataset (students, professionals,
//! questions, answers, tags, groups, schools and notification emails) into
//! an in-memory linked object graph.
//!
//! # Architecture
//!
//! - [`loader`]: raw tables → typed records with unresolved identifiers
//! - [`graph`]: arena collections, entity types, the resolver and queries
//! - [`persistence`]: snapshot files of a linked graph
//! - [`config`]: YAML configuration for the loader and snapshot paths
//!
//! Entities never own each other. Every relation is a [`Handle`] into the
//! owning [`CareerVillage`], which makes shared references and cycles
//! (question ↔ answer, email ↔ question) plain indices.
//!
//! ## Example Usage
//!
//! ```rust
//! use careervillage::loader::{MemorySource, Table};
//! use careervillage::CareerVillage;
//!
//! let mut source = MemorySource::new()
//!     .with_table(Table::Tags, &["tags_tag_id", "tags_tag_name"], [["1", "college"]])
//!     .with_table(
//!         Table::Students,
//!         &["students_id", "students_location", "students_date_joined"],
//!         [["s1", "Boston", "2016-04-26 16:02:45 UTC+0000"]],
//!     )
//!     .with_table(Table::TagUsers, &["tag_users_tag_id", "tag_users_user_id"], [["1", "s1"]]);
//!
//! let graph = CareerVillage::load_raw(&mut source).unwrap();
//!
//! let tag = graph.tags().get_by_id(&1i64).unwrap();
//! let followers = graph.users(&tag.users);
//! assert_eq!(followers.len(), 1);
//! assert_eq!(followers.first().unwrap().id(), "s1");
//! ```

pub mod config;
pub mod graph;
pub mod loader;
pub mod persistence;

pub use config::{Config, ConfigError, ConfigResult, SnapshotConfig};
pub use graph::{
    Answer, CareerVillage, Collection, Email, Entity, EntityKind, GraphStatistics, Group, Groups,
    Handle, HasCollection, HasUsers, LinkStats, LookupError, PersonLinks, Professional, Question,
    School, Seq, Student, Tag, User, UserRef,
};
pub use loader::{LoadError, LoadResult, MemorySource, RecordSource, Table};
pub use persistence::{SnapshotError, SnapshotOptions, SnapshotResult};

use thiserror::Error;

/// Any error the crate can produce
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Lookup(#[from] LookupError),

    #[error(transparent)]
    Snapshot(#[from] SnapshotError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get version string
pub fn version() -> &'static str {
    VERSION
}
