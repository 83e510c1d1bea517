//! Linked entity graph
//!
//! This module implements the CareerVillage data model:
//! - Fixed entity types with scalar fields and handle-based relations
//! - Arena collections keyed by identifier, in load order
//! - Two-stage linking of raw tables into a graph
//! - Restartable query sequences over collections

pub mod collection;
pub mod entity;
pub mod person;
pub mod post;
pub mod resolver;
pub mod seq;
pub mod store;
pub mod types;

// Re-export main types
pub use collection::{Collection, LookupError};
pub use entity::{Entity, Group, HasUsers, School, Tag, SUMMARY_TIME_FORMAT};
pub use person::{PersonLinks, Professional, Student, User};
pub use post::{Answer, Email, Question};
pub use resolver::{LinkStats, Resolver};
pub use seq::{Groups, Seq};
pub use store::{CareerVillage, GraphStatistics, HasCollection};
pub use types::{EntityKind, Handle, UserRef};
