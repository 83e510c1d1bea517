//! Typed records parsed from raw rows
//!
//! A record holds the scalar values of one row, already parsed, and its
//! foreign keys as the raw identifiers found in the source.

use super::{LoadResult, RecordSource, Row, Table};
use chrono::{DateTime, Utc};
use tracing::{debug, info};

/// Timestamp layout used throughout the dataset, e.g. `2011-10-05 20:35:19 UTC+0000`
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC%z";

pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_str(raw, TIMESTAMP_FORMAT).map(|ts| ts.with_timezone(&Utc))
}

impl Row {
    fn identifier(&self, field: &str) -> LoadResult<String> {
        let value = self.required(field)?;
        if value.is_empty() {
            return Err(self.malformed(field, "is empty"));
        }
        Ok(value.to_string())
    }

    fn text(&self, field: &str) -> LoadResult<String> {
        self.required(field).map(str::to_string)
    }

    fn optional_text(&self, field: &str) -> LoadResult<Option<String>> {
        Ok(self.optional(field)?.map(str::to_string))
    }

    fn integer(&self, field: &str) -> LoadResult<i64> {
        let value = self.required(field)?;
        value
            .trim()
            .parse()
            .map_err(|e| self.malformed(field, format!("is not an integer ({:?}: {})", value, e)))
    }

    fn timestamp(&self, field: &str) -> LoadResult<DateTime<Utc>> {
        let value = self.required(field)?;
        parse_timestamp(value)
            .map_err(|e| self.malformed(field, format!("is not a timestamp ({:?}: {})", value, e)))
    }
}

/// Conversion from a raw row of a specific table
pub trait FromRow: Sized {
    const TABLE: Table;

    fn from_row(row: &Row) -> LoadResult<Self>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct TagRecord {
    pub id: i64,
    pub name: String,
}

impl FromRow for TagRecord {
    const TABLE: Table = Table::Tags;

    fn from_row(row: &Row) -> LoadResult<Self> {
        Ok(TagRecord {
            id: row.integer("tags_tag_id")?,
            name: row.text("tags_tag_name")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GroupRecord {
    pub id: String,
    pub group_type: String,
}

impl FromRow for GroupRecord {
    const TABLE: Table = Table::Groups;

    fn from_row(row: &Row) -> LoadResult<Self> {
        Ok(GroupRecord {
            id: row.identifier("groups_id")?,
            group_type: row.text("groups_group_type")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StudentRecord {
    pub id: String,
    pub location: Option<String>,
    pub date_joined: DateTime<Utc>,
}

impl FromRow for StudentRecord {
    const TABLE: Table = Table::Students;

    fn from_row(row: &Row) -> LoadResult<Self> {
        Ok(StudentRecord {
            id: row.identifier("students_id")?,
            location: row.optional_text("students_location")?,
            date_joined: row.timestamp("students_date_joined")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProfessionalRecord {
    pub id: String,
    pub location: Option<String>,
    pub industry: Option<String>,
    pub headline: Option<String>,
    pub date_joined: DateTime<Utc>,
}

impl FromRow for ProfessionalRecord {
    const TABLE: Table = Table::Professionals;

    fn from_row(row: &Row) -> LoadResult<Self> {
        Ok(ProfessionalRecord {
            id: row.identifier("professionals_id")?,
            location: row.optional_text("professionals_location")?,
            industry: row.optional_text("professionals_industry")?,
            headline: row.optional_text("professionals_headline")?,
            date_joined: row.timestamp("professionals_date_joined")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct QuestionRecord {
    pub id: String,
    pub author_id: String,
    pub date_added: DateTime<Utc>,
    pub title: String,
    pub body: String,
}

impl FromRow for QuestionRecord {
    const TABLE: Table = Table::Questions;

    fn from_row(row: &Row) -> LoadResult<Self> {
        Ok(QuestionRecord {
            id: row.identifier("questions_id")?,
            author_id: row.text("questions_author_id")?,
            date_added: row.timestamp("questions_date_added")?,
            title: row.text("questions_title")?,
            body: row.text("questions_body")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnswerRecord {
    pub id: String,
    pub author_id: String,
    pub question_id: String,
    pub date_added: DateTime<Utc>,
    pub body: String,
}

impl FromRow for AnswerRecord {
    const TABLE: Table = Table::Answers;

    fn from_row(row: &Row) -> LoadResult<Self> {
        Ok(AnswerRecord {
            id: row.identifier("answers_id")?,
            author_id: row.text("answers_author_id")?,
            question_id: row.text("answers_question_id")?,
            date_added: row.timestamp("answers_date_added")?,
            body: row.text("answers_body")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EmailRecord {
    pub id: String,
    pub recipient_id: String,
    pub date_sent: DateTime<Utc>,
    pub frequency_level: String,
}

impl FromRow for EmailRecord {
    const TABLE: Table = Table::Emails;

    fn from_row(row: &Row) -> LoadResult<Self> {
        Ok(EmailRecord {
            id: row.identifier("emails_id")?,
            recipient_id: row.text("emails_recipient_id")?,
            date_sent: row.timestamp("emails_date_sent")?,
            frequency_level: row.text("emails_frequency_level")?,
        })
    }
}

/// A user following a tag
#[derive(Debug, Clone, PartialEq)]
pub struct TagUserRecord {
    pub line: u64,
    pub tag_id: i64,
    pub user_id: String,
}

impl FromRow for TagUserRecord {
    const TABLE: Table = Table::TagUsers;

    fn from_row(row: &Row) -> LoadResult<Self> {
        Ok(TagUserRecord {
            line: row.line(),
            tag_id: row.integer("tag_users_tag_id")?,
            user_id: row.text("tag_users_user_id")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GroupMembershipRecord {
    pub line: u64,
    pub group_id: String,
    pub user_id: String,
}

impl FromRow for GroupMembershipRecord {
    const TABLE: Table = Table::GroupMemberships;

    fn from_row(row: &Row) -> LoadResult<Self> {
        Ok(GroupMembershipRecord {
            line: row.line(),
            group_id: row.text("group_memberships_group_id")?,
            user_id: row.text("group_memberships_user_id")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SchoolMembershipRecord {
    pub line: u64,
    pub school_id: i64,
    pub user_id: String,
}

impl FromRow for SchoolMembershipRecord {
    const TABLE: Table = Table::SchoolMemberships;

    fn from_row(row: &Row) -> LoadResult<Self> {
        Ok(SchoolMembershipRecord {
            line: row.line(),
            school_id: row.integer("school_memberships_school_id")?,
            user_id: row.text("school_memberships_user_id")?,
        })
    }
}

/// A question filed under a tag
#[derive(Debug, Clone, PartialEq)]
pub struct TagQuestionRecord {
    pub line: u64,
    pub tag_id: i64,
    pub question_id: String,
}

impl FromRow for TagQuestionRecord {
    const TABLE: Table = Table::TagQuestions;

    fn from_row(row: &Row) -> LoadResult<Self> {
        Ok(TagQuestionRecord {
            line: row.line(),
            tag_id: row.integer("tag_questions_tag_id")?,
            question_id: row.text("tag_questions_question_id")?,
        })
    }
}

/// A question recommended by an email
#[derive(Debug, Clone, PartialEq)]
pub struct MatchRecord {
    pub line: u64,
    pub email_id: String,
    pub question_id: String,
}

impl FromRow for MatchRecord {
    const TABLE: Table = Table::Matches;

    fn from_row(row: &Row) -> LoadResult<Self> {
        Ok(MatchRecord {
            line: row.line(),
            email_id: row.text("matches_email_id")?,
            question_id: row.text("matches_question_id")?,
        })
    }
}

/// Every table of a dataset, parsed but not linked
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTables {
    pub tags: Vec<TagRecord>,
    pub groups: Vec<GroupRecord>,
    pub students: Vec<StudentRecord>,
    pub professionals: Vec<ProfessionalRecord>,
    pub questions: Vec<QuestionRecord>,
    pub answers: Vec<AnswerRecord>,
    pub emails: Vec<EmailRecord>,
    pub tag_users: Vec<TagUserRecord>,
    pub group_memberships: Vec<GroupMembershipRecord>,
    pub school_memberships: Vec<SchoolMembershipRecord>,
    pub tag_questions: Vec<TagQuestionRecord>,
    pub matches: Vec<MatchRecord>,
}

impl RawTables {
    /// Read and parse every table, in [`Table::ALL`] order
    pub fn read<S: RecordSource + ?Sized>(source: &mut S) -> LoadResult<Self> {
        Ok(RawTables {
            tags: read_records(source)?,
            groups: read_records(source)?,
            students: read_records(source)?,
            professionals: read_records(source)?,
            questions: read_records(source)?,
            answers: read_records(source)?,
            emails: read_records(source)?,
            tag_users: read_records(source)?,
            group_memberships: read_records(source)?,
            school_memberships: read_records(source)?,
            tag_questions: read_records(source)?,
            matches: read_records(source)?,
        })
    }
}

fn read_records<R, S>(source: &mut S) -> LoadResult<Vec<R>>
where
    R: FromRow + std::fmt::Debug,
    S: RecordSource + ?Sized,
{
    let table = R::TABLE;
    let rows = source.read_table(table)?;
    let records = rows
        .iter()
        .map(R::from_row)
        .collect::<LoadResult<Vec<R>>>()?;
    info!(table = %table, rows = records.len(), "read table");
    if let Some(first) = records.first() {
        debug!(table = %table, "first record: {:?}", first);
    }
    Ok(records)
}
