use std::str::FromStr;
use std::sync::Arc;

use bson::oid::ObjectId;

use crate::errors::TodoError;
use crate::models::input::TodoInput;
use crate::models::todo::{Todo, TodoDraft};
use crate::repository::TodoStore;

/// Status token that selects completed todos; anything else selects open ones.
pub const COMPLETED_STATUS: &str = "completed";

/// The todo operations exposed over HTTP, independent of actix.
#[derive(Clone)]
pub struct TodoService {
    store: Arc<dyn TodoStore>,
}

impl TodoService {
    pub fn new(store: Arc<dyn TodoStore>) -> Self {
        Self { store }
    }

    pub async fn list(&self) -> Result<Vec<Todo>, TodoError> {
        let todos = self.store.find_all(None).await?;
        tracing::info!(count = todos.len(), "listed todos");
        Ok(todos)
    }

    pub async fn filter_by_status(&self, status: &str) -> Result<Vec<Todo>, TodoError> {
        let completed = status == COMPLETED_STATUS;
        let todos = self.store.find_all(Some(completed)).await?;
        tracing::info!(count = todos.len(), status, "filtered todos");
        Ok(todos)
    }

    pub async fn get(&self, id: &str) -> Result<Todo, TodoError> {
        let object_id = parse_id(id)?;
        self.store
            .find_by_id(object_id)
            .await?
            .ok_or_else(|| not_found(id))
    }

    pub async fn create(&self, input: TodoInput) -> Result<Todo, TodoError> {
        let draft = input.into_new_draft().map_err(rejected)?;
        let todo = self.store.insert(draft).await?;
        tracing::info!(id = %todo.id, title = %todo.title, "created todo");
        Ok(todo)
    }

    /// Partial or full update. The record is looked up first, so an unknown id
    /// is reported as not found even when the body is also invalid.
    pub async fn update(&self, id: &str, input: TodoInput) -> Result<Todo, TodoError> {
        let existing = self.get(id).await?;
        let draft = input.apply_to(&existing).map_err(rejected)?;
        let todo = self.replace(id, existing.id, draft).await?;
        tracing::info!(id = %todo.id, title = %todo.title, "updated todo");
        Ok(todo)
    }

    pub async fn toggle(&self, id: &str) -> Result<Todo, TodoError> {
        let existing = self.get(id).await?;
        let draft = TodoDraft::from(&existing).toggle_complete();
        let todo = self.replace(id, existing.id, draft).await?;
        tracing::info!(id = %todo.id, completed = todo.completed, "toggled todo");
        Ok(todo)
    }

    pub async fn delete(&self, id: &str) -> Result<Todo, TodoError> {
        let object_id = parse_id(id)?;
        let todo = self
            .store
            .delete(object_id)
            .await?
            .ok_or_else(|| not_found(id))?;
        tracing::info!(id = %todo.id, title = %todo.title, "deleted todo");
        Ok(todo)
    }

    async fn replace(&self, id: &str, object_id: ObjectId, draft: TodoDraft) -> Result<Todo, TodoError> {
        self.store
            .replace(object_id, draft)
            .await?
            .ok_or_else(|| not_found(id))
    }
}

/// Ids that are not valid ObjectIds can never match a record, so they are
/// reported as not found rather than as a bad request.
fn parse_id(id: &str) -> Result<ObjectId, TodoError> {
    ObjectId::from_str(id).map_err(|_| {
        tracing::warn!(id, "malformed todo id");
        TodoError::invalid_id(id)
    })
}

fn not_found(id: &str) -> TodoError {
    tracing::warn!(id, "todo not found");
    TodoError::not_found(id)
}

fn rejected(errors: Vec<String>) -> TodoError {
    tracing::warn!(?errors, "todo rejected by validation");
    TodoError::Validation(errors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::todo::{Category, Priority};
    use crate::repository::InMemoryTodoStore;

    fn service() -> TodoService {
        TodoService::new(Arc::new(InMemoryTodoStore::new()))
    }

    fn titled(title: &str) -> TodoInput {
        TodoInput {
            title: Some(title.to_string()),
            ..TodoInput::default()
        }
    }

    #[actix_web::test]
    async fn test_create_trims_title_and_applies_defaults() {
        let service = service();
        let todo = service.create(titled("  Buy milk ")).await.unwrap();
        assert_eq!(todo.title, "Buy milk");
        assert!(!todo.completed);
        assert_eq!(todo.priority, Priority::Medium);
        assert_eq!(todo.category, Category::Personal);
        assert_eq!(todo.created_at, todo.updated_at);
    }

    #[actix_web::test]
    async fn test_create_rejects_blank_title() {
        let err = service().create(titled("   ")).await.unwrap_err();
        match err {
            TodoError::Validation(errors) => assert!(errors[0].contains("title")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[actix_web::test]
    async fn test_toggle_twice_restores_state() {
        let service = service();
        let todo = service.create(titled("Walk the dog")).await.unwrap();

        let once = service.toggle(&todo.id.to_hex()).await.unwrap();
        assert!(once.completed);
        assert!(once.updated_at > todo.updated_at);

        let twice = service.toggle(&todo.id.to_hex()).await.unwrap();
        assert!(!twice.completed);
        assert!(twice.updated_at > once.updated_at);
        assert_eq!(twice.created_at, todo.created_at);
        assert_eq!(twice.title, todo.title);
    }

    #[actix_web::test]
    async fn test_filter_by_status() {
        let service = service();
        let done = service.create(titled("done")).await.unwrap();
        service.toggle(&done.id.to_hex()).await.unwrap();
        service.create(titled("open")).await.unwrap();

        let completed = service.filter_by_status("completed").await.unwrap();
        assert_eq!(completed.len(), 1);
        assert!(completed.iter().all(|t| t.completed));

        for token in ["incomplete", "pending", "COMPLETED"] {
            let open = service.filter_by_status(token).await.unwrap();
            assert_eq!(open.len(), 1);
            assert!(open.iter().all(|t| !t.completed));
        }
    }

    #[actix_web::test]
    async fn test_delete_then_get_is_not_found() {
        let service = service();
        let todo = service.create(titled("temp")).await.unwrap();
        let id = todo.id.to_hex();

        service.delete(&id).await.unwrap();
        assert!(matches!(service.get(&id).await, Err(TodoError::NotFound(_))));
        assert!(matches!(service.delete(&id).await, Err(TodoError::NotFound(_))));
    }

    #[actix_web::test]
    async fn test_malformed_id_is_not_found() {
        let service = service();
        assert!(matches!(service.get("not-an-id").await, Err(TodoError::NotFound(_))));
        assert!(matches!(service.update("123", titled("x")).await, Err(TodoError::NotFound(_))));
        assert!(matches!(service.delete("zz").await, Err(TodoError::NotFound(_))));
        assert!(matches!(service.toggle("").await, Err(TodoError::NotFound(_))));
    }

    #[actix_web::test]
    async fn test_update_revalidates() {
        let service = service();
        let todo = service.create(titled("Plan trip")).await.unwrap();
        let id = todo.id.to_hex();

        let invalid = TodoInput {
            priority: Some("urgent".to_string()),
            ..TodoInput::default()
        };
        assert!(matches!(service.update(&id, invalid).await, Err(TodoError::Validation(_))));
        assert_eq!(service.get(&id).await.unwrap(), todo);

        let valid = TodoInput {
            priority: Some("high".to_string()),
            completed: Some(true),
            ..TodoInput::default()
        };
        let updated = service.update(&id, valid).await.unwrap();
        assert_eq!(updated.priority, Priority::High);
        assert!(updated.completed);
        assert_eq!(updated.title, "Plan trip");
        assert!(updated.updated_at > todo.updated_at);
    }
}
