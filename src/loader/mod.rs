//! Record table loading
//!
//! The loader turns source tables into [`Row`]s (field name → string value)
//! and then into typed records whose foreign keys are still raw
//! identifiers. Linking those identifiers is the resolver's job.

pub mod delimited;
pub mod records;

pub use delimited::DelimitedDirectory;
pub use records::{
    parse_timestamp, AnswerRecord, EmailRecord, FromRow, GroupMembershipRecord, GroupRecord,
    MatchRecord, ProfessionalRecord, QuestionRecord, RawTables, SchoolMembershipRecord,
    StudentRecord, TagQuestionRecord, TagRecord, TagUserRecord, TIMESTAMP_FORMAT,
};

use crate::graph::EntityKind;
use indexmap::IndexMap;
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

/// Errors raised while loading and linking a dataset. Every variant aborts
/// the load; no partially linked graph is ever returned.
#[derive(Error, Debug)]
pub enum LoadError {
    /// A row is missing a required column or holds an unparseable value
    #[error("Malformed row in {table} at line {line}: field `{field}` {reason}")]
    MalformedRow {
        table: Table,
        line: u64,
        field: String,
        reason: String,
    },

    /// A foreign key names an entity that does not exist
    #[error("Dangling reference from {origin}: field `{field}` names missing {target} {missing_id}")]
    DanglingReference {
        origin: RefOrigin,
        field: &'static str,
        /// Entity kind name, or `user` for the student/professional union
        target: &'static str,
        missing_id: String,
    },

    /// Two rows of one entity type share an identifier
    #[error("Duplicate {kind} id {id}")]
    DuplicateId { kind: EntityKind, id: String },

    /// The delimited reader failed
    #[error("Failed to read table {table}: {source}")]
    Csv {
        table: Table,
        #[source]
        source: csv::Error,
    },
}

pub type LoadResult<T> = Result<T, LoadError>;

/// Where a dangling reference was found
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefOrigin {
    /// A forward reference field on an entity
    Entity { kind: EntityKind, id: String },
    /// A row of a join table
    JoinRow { table: Table, line: u64 },
}

impl fmt::Display for RefOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RefOrigin::Entity { kind, id } => write!(f, "{} {}", kind, id),
            RefOrigin::JoinRow { table, line } => write!(f, "{} line {}", table, line),
        }
    }
}

/// Source tables of the dataset, in the order they are read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Table {
    Tags,
    Groups,
    Students,
    Professionals,
    Questions,
    Answers,
    Emails,
    TagUsers,
    GroupMemberships,
    SchoolMemberships,
    TagQuestions,
    Matches,
}

impl Table {
    pub const ALL: [Table; 12] = [
        Table::Tags,
        Table::Groups,
        Table::Students,
        Table::Professionals,
        Table::Questions,
        Table::Answers,
        Table::Emails,
        Table::TagUsers,
        Table::GroupMemberships,
        Table::SchoolMemberships,
        Table::TagQuestions,
        Table::Matches,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Table::Tags => "tags",
            Table::Groups => "groups",
            Table::Students => "students",
            Table::Professionals => "professionals",
            Table::Questions => "questions",
            Table::Answers => "answers",
            Table::Emails => "emails",
            Table::TagUsers => "tag_users",
            Table::GroupMemberships => "group_memberships",
            Table::SchoolMemberships => "school_memberships",
            Table::TagQuestions => "tag_questions",
            Table::Matches => "matches",
        }
    }

    pub fn file_name(&self) -> String {
        format!("{}.csv", self.name())
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One raw row: column name → string value, plus its position in the source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    table: Table,
    line: u64,
    fields: IndexMap<String, String>,
}

impl Row {
    pub fn new(table: Table, line: u64, fields: IndexMap<String, String>) -> Self {
        Row { table, line, fields }
    }

    pub fn from_pairs<K, V>(table: Table, line: u64, pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let fields = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Row { table, line, fields }
    }

    pub fn table(&self) -> Table {
        self.table
    }

    pub fn line(&self) -> u64 {
        self.line
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    /// Value of a column that must be present
    pub fn required(&self, field: &str) -> LoadResult<&str> {
        self.get(field)
            .ok_or_else(|| self.malformed(field, "is missing"))
    }

    /// Value of a column that must be present but may be empty
    pub fn optional(&self, field: &str) -> LoadResult<Option<&str>> {
        let value = self.required(field)?;
        Ok(if value.is_empty() { None } else { Some(value) })
    }

    pub fn malformed(&self, field: &str, reason: impl Into<String>) -> LoadError {
        LoadError::MalformedRow {
            table: self.table,
            line: self.line,
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

/// Supplier of raw table rows.
///
/// Implementations decide where rows come from; the loader only needs every
/// row of a table, in source order.
pub trait RecordSource {
    fn read_table(&mut self, table: Table) -> LoadResult<Vec<Row>>;
}

/// In-memory rows, keyed by table. Tables never added read as empty.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    tables: HashMap<Table, Vec<Row>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a table from a header and value rows. Line numbers are assigned
    /// as if the header were line 1 of a file.
    pub fn with_table<R, S>(mut self, table: Table, header: &[&str], rows: impl IntoIterator<Item = R>) -> Self
    where
        R: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for values in rows {
            self.push_row(table, header.iter().copied().zip(values));
        }
        self
    }

    pub fn push_row<K, V>(&mut self, table: Table, pairs: impl IntoIterator<Item = (K, V)>)
    where
        K: Into<String>,
        V: Into<String>,
    {
        let rows = self.tables.entry(table).or_default();
        let line = rows.len() as u64 + 2;
        rows.push(Row::from_pairs(table, line, pairs));
    }
}

impl RecordSource for MemorySource {
    fn read_table(&mut self, table: Table) -> LoadResult<Vec<Row>> {
        Ok(self.tables.get(&table).cloned().unwrap_or_default())
    }
}
