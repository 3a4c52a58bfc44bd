use std::fmt;
use std::fmt::Formatter;
use std::str::FromStr;

use bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const TITLE_MAX_CHARS: usize = 200;
pub const DESCRIPTION_MAX_CHARS: usize = 1000;

/// Stored shape of a todo. Field names match the `todos` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub due_date: Option<DateTime>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub category: Category,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl Todo {
    /// Builds a fresh record from a validated draft. Both timestamps are `now`.
    pub fn create(id: ObjectId, draft: TodoDraft, now: DateTime) -> Self {
        Self::from_parts(id, draft, now, now)
    }

    /// Applies `draft` on top of this record, keeping `id` and `created_at`
    /// and moving `updated_at` forward.
    pub fn revise(&self, draft: TodoDraft, now: DateTime) -> Self {
        Self::from_parts(
            self.id,
            draft,
            self.created_at,
            advance_timestamp(self.updated_at, now),
        )
    }

    fn from_parts(id: ObjectId, draft: TodoDraft, created_at: DateTime, updated_at: DateTime) -> Self {
        Self {
            id,
            title: draft.title,
            description: draft.description,
            completed: draft.completed,
            priority: draft.priority,
            due_date: draft.due_date,
            tags: draft.tags,
            category: draft.category,
            created_at,
            updated_at,
        }
    }

    pub fn is_overdue_at(&self, now: DateTime) -> bool {
        match self.due_date {
            Some(due) if !self.completed => now > due,
            _ => false,
        }
    }

    pub fn is_overdue(&self) -> bool {
        self.is_overdue_at(DateTime::now())
    }
}

/// The client-settable part of a todo, already trimmed and validated.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TodoDraft {
    pub title: String,
    pub description: String,
    pub completed: bool,
    pub priority: Priority,
    pub due_date: Option<DateTime>,
    pub tags: Vec<String>,
    pub category: Category,
}

impl TodoDraft {
    /// Flips `completed`, leaving every other field alone.
    pub fn toggle_complete(mut self) -> Self {
        self.completed = !self.completed;
        self
    }

    /// Length and presence checks, one message per violated field.
    pub fn violations(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.title.is_empty() {
            errors.push("Please add a todo title".to_string());
        } else if self.title.chars().count() > TITLE_MAX_CHARS {
            errors.push(format!("Title cannot be more than {} characters", TITLE_MAX_CHARS));
        }
        if self.description.chars().count() > DESCRIPTION_MAX_CHARS {
            errors.push(format!(
                "Description cannot be more than {} characters",
                DESCRIPTION_MAX_CHARS
            ));
        }
        errors
    }
}

impl From<&Todo> for TodoDraft {
    fn from(value: &Todo) -> Self {
        Self {
            title: value.title.clone(),
            description: value.description.clone(),
            completed: value.completed,
            priority: value.priority,
            due_date: value.due_date,
            tags: value.tags.clone(),
            category: value.category,
        }
    }
}

/// Stored timestamps have millisecond precision, so a mutation landing in the
/// same millisecond as the previous one is pushed one millisecond past it.
pub fn advance_timestamp(previous: DateTime, now: DateTime) -> DateTime {
    if now > previous {
        now
    } else {
        DateTime::from_millis(previous.timestamp_millis() + 1)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("`{value}` is not a valid {field}, expected one of: {expected}")]
pub struct InvalidEnumValue {
    pub field: &'static str,
    pub value: String,
    pub expected: &'static str,
}

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

impl FromStr for Priority {
    type Err = InvalidEnumValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            other => Err(InvalidEnumValue {
                field: "priority",
                value: other.to_string(),
                expected: "low, medium, high",
            }),
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    #[default]
    Personal,
    Work,
    Shopping,
    Health,
    Other,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Personal => "personal",
            Category::Work => "work",
            Category::Shopping => "shopping",
            Category::Health => "health",
            Category::Other => "other",
        }
    }
}

impl FromStr for Category {
    type Err = InvalidEnumValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "personal" => Ok(Category::Personal),
            "work" => Ok(Category::Work),
            "shopping" => Ok(Category::Shopping),
            "health" => Ok(Category::Health),
            "other" => Ok(Category::Other),
            other => Err(InvalidEnumValue {
                field: "category",
                value: other.to_string(),
                expected: "personal, work, shopping, health, other",
            }),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
