use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::todo::{Category, Priority, Todo};

/// Wire representation of a todo, including the derived `isOverdue`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoDto {
    pub id: String,
    pub title: String,
    pub description: String,
    pub completed: bool,
    pub priority: Priority,
    pub due_date: Option<DateTime<Utc>>,
    pub tags: Vec<String>,
    pub category: Category,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub is_overdue: bool,
}

impl From<&Todo> for TodoDto {
    fn from(value: &Todo) -> Self {
        Self {
            id: value.id.to_hex(),
            title: value.title.clone(),
            description: value.description.clone(),
            completed: value.completed,
            priority: value.priority,
            due_date: value.due_date.map(|due| due.to_chrono()),
            tags: value.tags.clone(),
            category: value.category,
            created_at: value.created_at.to_chrono(),
            updated_at: value.updated_at.to_chrono(),
            is_overdue: value.is_overdue(),
        }
    }
}

/// `{}` on the wire.
#[derive(Debug, Serialize)]
pub struct Empty {}

/// Success envelope shared by every todo endpoint.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn data(data: T) -> Self {
        Self {
            success: true,
            message: None,
            count: None,
            data,
        }
    }

    pub fn with_message(message: impl Into<String>, data: T) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::data(data)
        }
    }
}

impl ApiResponse<TodoDto> {
    pub fn todo(message: Option<String>, todo: &Todo) -> Self {
        Self {
            message,
            ..Self::data(TodoDto::from(todo))
        }
    }
}

impl ApiResponse<Vec<TodoDto>> {
    pub fn list(todos: &[Todo]) -> Self {
        Self {
            count: Some(todos.len()),
            ..Self::data(todos.iter().map(TodoDto::from).collect())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::todo::TodoDraft;
    use bson::oid::ObjectId;

    #[test]
    fn test_todo_dto_json_shape() {
        let todo = Todo::create(
            ObjectId::new(),
            TodoDraft {
                title: "Buy milk".to_string(),
                due_date: Some(bson::DateTime::from_millis(0)),
                ..TodoDraft::default()
            },
            bson::DateTime::now(),
        );
        let json = serde_json::to_value(TodoDto::from(&todo)).unwrap();

        assert_eq!(json["id"], todo.id.to_hex());
        assert_eq!(json["priority"], "medium");
        assert_eq!(json["category"], "personal");
        assert_eq!(json["isOverdue"], true);
        assert_eq!(json["dueDate"], "1970-01-01T00:00:00Z");
        assert!(json["createdAt"].is_string());
        assert!(json.get("_id").is_none());
    }

    #[test]
    fn test_list_envelope_counts() {
        let json = serde_json::to_value(ApiResponse::list(&[])).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["count"], 0);
        assert!(json["data"].as_array().unwrap().is_empty());
        assert!(json.get("message").is_none());
    }

    #[test]
    fn test_empty_payload() {
        let json = serde_json::to_value(ApiResponse::with_message("Todo deleted successfully", Empty {})).unwrap();
        assert_eq!(json["data"], serde_json::json!({}));
    }
}
