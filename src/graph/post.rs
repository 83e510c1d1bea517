//! Content entities: questions, answers and notification emails

use super::entity::{display_as_summary, timestamp_value, Entity, Tag};
use super::person::Professional;
use super::store::CareerVillage;
use super::types::{EntityKind, Handle, UserRef};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

fn author_summary(graph: &CareerVillage, author: Option<UserRef>) -> Value {
    author
        .map(|user| graph.user(user).summary_json())
        .unwrap_or(Value::Null)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    /// Author identifier as it appears in the source table
    pub author_id: String,
    /// Resolved author; `None` when `author_id` names no known user
    pub author: Option<UserRef>,
    pub date_added: DateTime<Utc>,
    pub title: String,
    pub body: String,
    pub tags: Vec<Handle<Tag>>,
    /// Emails that recommended this question to a professional
    pub emails: Vec<Handle<Email>>,
    pub answers: Vec<Handle<Answer>>,
}

impl Question {
    pub fn new(
        id: impl Into<String>,
        author_id: impl Into<String>,
        date_added: DateTime<Utc>,
        title: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Question {
            id: id.into(),
            author_id: author_id.into(),
            author: None,
            date_added,
            title: title.into(),
            body: body.into(),
            tags: Vec::new(),
            emails: Vec::new(),
            answers: Vec::new(),
        }
    }

    pub fn is_answered(&self) -> bool {
        !self.answers.is_empty()
    }
}

impl Entity for Question {
    type Key = String;
    const KIND: EntityKind = EntityKind::Question;

    fn key(&self) -> &String {
        &self.id
    }

    fn scalars(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("id", Value::from(self.id.clone())),
            ("date_added", timestamp_value(&self.date_added)),
            ("title", Value::from(self.title.clone())),
            ("body", Value::from(self.body.clone())),
        ]
    }

    fn list_lengths(&self) -> Vec<(&'static str, usize)> {
        vec![
            ("tags", self.tags.len()),
            ("emails", self.emails.len()),
            ("answers", self.answers.len()),
        ]
    }

    fn references(&self, graph: &CareerVillage) -> Vec<(&'static str, Value)> {
        vec![("author", author_summary(graph, self.author))]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    pub id: String,
    pub author_id: String,
    pub author: Option<UserRef>,
    pub question: Handle<Question>,
    pub date_added: DateTime<Utc>,
    pub body: String,
}

impl Entity for Answer {
    type Key = String;
    const KIND: EntityKind = EntityKind::Answer;

    fn key(&self) -> &String {
        &self.id
    }

    fn scalars(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("id", Value::from(self.id.clone())),
            ("date_added", timestamp_value(&self.date_added)),
            ("body", Value::from(self.body.clone())),
        ]
    }

    fn list_lengths(&self) -> Vec<(&'static str, usize)> {
        Vec::new()
    }

    fn references(&self, graph: &CareerVillage) -> Vec<(&'static str, Value)> {
        vec![
            ("author", author_summary(graph, self.author)),
            ("question", graph.get(self.question).summary_json()),
        ]
    }
}

/// A notification email recommending questions to a professional
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Email {
    pub id: String,
    pub recipient: Handle<Professional>,
    pub date_sent: DateTime<Utc>,
    pub frequency_level: String,
    /// Questions the email recommended
    pub questions: Vec<Handle<Question>>,
}

impl Entity for Email {
    type Key = String;
    const KIND: EntityKind = EntityKind::Email;

    fn key(&self) -> &String {
        &self.id
    }

    fn scalars(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("id", Value::from(self.id.clone())),
            ("date_sent", timestamp_value(&self.date_sent)),
            ("frequency_level", Value::from(self.frequency_level.clone())),
        ]
    }

    fn list_lengths(&self) -> Vec<(&'static str, usize)> {
        vec![("questions", self.questions.len())]
    }

    fn references(&self, graph: &CareerVillage) -> Vec<(&'static str, Value)> {
        vec![("recipient", graph.get(self.recipient).summary_json())]
    }
}

display_as_summary!(Question, Answer, Email);
