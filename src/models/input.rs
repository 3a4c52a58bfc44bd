use bson::DateTime;
use chrono::{NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::models::todo::{Category, Priority, Todo, TodoDraft};

/// Request body accepted by create and update. Every field is optional so the
/// same shape serves full and partial updates; server-owned fields such as
/// `id` or `createdAt` are simply not part of it.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    /// `None` leaves the due date untouched, `Some(None)` clears it.
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub due_date: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl TodoInput {
    /// Validates a create request. `completed` is not accepted on create.
    pub fn into_new_draft(self) -> Result<TodoDraft, Vec<String>> {
        let input = TodoInput {
            completed: None,
            ..self
        };
        input.merge_into(TodoDraft::default())
    }

    /// Validates an update request against the record it modifies.
    pub fn apply_to(self, existing: &Todo) -> Result<TodoDraft, Vec<String>> {
        self.merge_into(TodoDraft::from(existing))
    }

    fn merge_into(self, mut draft: TodoDraft) -> Result<TodoDraft, Vec<String>> {
        let mut field_errors = Vec::new();

        if let Some(title) = self.title {
            draft.title = title.trim().to_string();
        }
        if let Some(description) = self.description {
            draft.description = description.trim().to_string();
        }
        if let Some(completed) = self.completed {
            draft.completed = completed;
        }
        if let Some(priority) = self.priority {
            match priority.parse::<Priority>() {
                Ok(priority) => draft.priority = priority,
                Err(err) => field_errors.push(err.to_string()),
            }
        }
        if let Some(due_date) = self.due_date {
            match due_date.as_deref().map(str::trim) {
                None | Some("") => draft.due_date = None,
                Some(raw) => match parse_due_date(raw) {
                    Some(due) => draft.due_date = Some(due),
                    None => field_errors.push(format!("`{}` is not a valid dueDate", raw)),
                },
            }
        }
        if let Some(tags) = self.tags {
            draft.tags = tags.iter().map(|tag| tag.trim().to_string()).collect();
        }
        if let Some(category) = self.category {
            match category.parse::<Category>() {
                Ok(category) => draft.category = category,
                Err(err) => field_errors.push(err.to_string()),
            }
        }

        let mut errors = draft.violations();
        errors.extend(field_errors);
        if errors.is_empty() {
            Ok(draft)
        } else {
            Err(errors)
        }
    }
}

/// Accepts RFC 3339 timestamps, naive date-times and plain dates; the latter
/// two are read as UTC.
fn parse_due_date(raw: &str) -> Option<DateTime> {
    if let Ok(parsed) = chrono::DateTime::parse_from_rfc3339(raw) {
        return Some(DateTime::from_chrono(parsed.with_timezone(&Utc)));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(DateTime::from_chrono(Utc.from_utc_datetime(&naive)));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| DateTime::from_chrono(Utc.from_utc_datetime(&naive)))
}
