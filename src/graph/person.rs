//! Platform users: students who ask and professionals who answer

use super::entity::{display_as_summary, timestamp_value, Entity, Group, School, Tag};
use super::post::{Answer, Email, Question};
use super::types::{EntityKind, Handle};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Relations every user carries, filled by the resolver
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersonLinks {
    /// Tags the user follows
    pub tags: Vec<Handle<Tag>>,
    pub groups: Vec<Handle<Group>>,
    pub schools: Vec<Handle<School>>,
    /// Questions authored by the user
    pub questions: Vec<Handle<Question>>,
    /// Answers authored by the user
    pub answers: Vec<Handle<Answer>>,
}

impl PersonLinks {
    fn lengths(&self) -> Vec<(&'static str, usize)> {
        vec![
            ("tags", self.tags.len()),
            ("groups", self.groups.len()),
            ("schools", self.schools.len()),
            ("questions", self.questions.len()),
            ("answers", self.answers.len()),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    pub id: String,
    pub location: Option<String>,
    pub date_joined: DateTime<Utc>,
    pub links: PersonLinks,
}

impl Student {
    pub fn new(id: impl Into<String>, location: Option<String>, date_joined: DateTime<Utc>) -> Self {
        Student {
            id: id.into(),
            location,
            date_joined,
            links: PersonLinks::default(),
        }
    }
}

impl Entity for Student {
    type Key = String;
    const KIND: EntityKind = EntityKind::Student;

    fn key(&self) -> &String {
        &self.id
    }

    fn scalars(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("id", Value::from(self.id.clone())),
            ("location", Value::from(self.location.clone())),
            ("date_joined", timestamp_value(&self.date_joined)),
        ]
    }

    fn list_lengths(&self) -> Vec<(&'static str, usize)> {
        self.links.lengths()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Professional {
    pub id: String,
    pub location: Option<String>,
    pub industry: Option<String>,
    pub headline: Option<String>,
    pub date_joined: DateTime<Utc>,
    pub links: PersonLinks,
    /// Notification emails sent to this professional
    pub emails: Vec<Handle<Email>>,
}

impl Professional {
    pub fn new(
        id: impl Into<String>,
        location: Option<String>,
        industry: Option<String>,
        headline: Option<String>,
        date_joined: DateTime<Utc>,
    ) -> Self {
        Professional {
            id: id.into(),
            location,
            industry,
            headline,
            date_joined,
            links: PersonLinks::default(),
            emails: Vec::new(),
        }
    }
}

impl Entity for Professional {
    type Key = String;
    const KIND: EntityKind = EntityKind::Professional;

    fn key(&self) -> &String {
        &self.id
    }

    fn scalars(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("id", Value::from(self.id.clone())),
            ("location", Value::from(self.location.clone())),
            ("industry", Value::from(self.industry.clone())),
            ("headline", Value::from(self.headline.clone())),
            ("date_joined", timestamp_value(&self.date_joined)),
        ]
    }

    fn list_lengths(&self) -> Vec<(&'static str, usize)> {
        let mut lengths = self.links.lengths();
        lengths.push(("emails", self.emails.len()));
        lengths
    }
}

display_as_summary!(Student, Professional);

/// Borrowed view of a user, as returned by [`CareerVillage::user`](super::CareerVillage::user)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum User<'a> {
    Student(&'a Student),
    Professional(&'a Professional),
}

impl<'a> User<'a> {
    pub fn id(&self) -> &'a str {
        match self {
            User::Student(s) => &s.id,
            User::Professional(p) => &p.id,
        }
    }

    pub fn kind(&self) -> EntityKind {
        match self {
            User::Student(_) => EntityKind::Student,
            User::Professional(_) => EntityKind::Professional,
        }
    }

    pub fn links(&self) -> &'a PersonLinks {
        match self {
            User::Student(s) => &s.links,
            User::Professional(p) => &p.links,
        }
    }

    pub fn location(&self) -> Option<&'a str> {
        match self {
            User::Student(s) => s.location.as_deref(),
            User::Professional(p) => p.location.as_deref(),
        }
    }

    pub fn summary_json(&self) -> Value {
        match self {
            User::Student(s) => s.summary_json(),
            User::Professional(p) => p.summary_json(),
        }
    }
}
