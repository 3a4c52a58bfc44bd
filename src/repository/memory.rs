use std::cmp::Reverse;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use bson::{oid::ObjectId, DateTime};

use crate::errors::StoreError;
use crate::models::todo::{Todo, TodoDraft};
use crate::repository::TodoStore;

/// Process-local store with the same semantics as the MongoDB one.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTodoStore {
    todos: Arc<Mutex<Vec<Todo>>>,
}

impl InMemoryTodoStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Vec<Todo>>, StoreError> {
        self.todos
            .lock()
            .map_err(|err| StoreError::Unavailable(err.to_string()))
    }
}

#[async_trait]
impl TodoStore for InMemoryTodoStore {
    async fn find_all(&self, completed: Option<bool>) -> Result<Vec<Todo>, StoreError> {
        let todos = self.lock()?;
        let mut result: Vec<Todo> = todos
            .iter()
            .filter(|todo| completed.map_or(true, |c| todo.completed == c))
            .cloned()
            .collect();
        result.sort_by_key(|todo| Reverse((todo.created_at, todo.id)));
        Ok(result)
    }

    async fn find_by_id(&self, id: ObjectId) -> Result<Option<Todo>, StoreError> {
        let todos = self.lock()?;
        Ok(todos.iter().find(|todo| todo.id == id).cloned())
    }

    async fn insert(&self, draft: TodoDraft) -> Result<Todo, StoreError> {
        let mut todos = self.lock()?;
        let todo = Todo::create(ObjectId::new(), draft, DateTime::now());
        todos.push(todo.clone());
        Ok(todo)
    }

    async fn replace(&self, id: ObjectId, draft: TodoDraft) -> Result<Option<Todo>, StoreError> {
        let mut todos = self.lock()?;
        let Some(existing) = todos.iter_mut().find(|todo| todo.id == id) else {
            return Ok(None);
        };
        *existing = existing.revise(draft, DateTime::now());
        Ok(Some(existing.clone()))
    }

    async fn delete(&self, id: ObjectId) -> Result<Option<Todo>, StoreError> {
        let mut todos = self.lock()?;
        let Some(index) = todos.iter().position(|todo| todo.id == id) else {
            return Ok(None);
        };
        Ok(Some(todos.remove(index)))
    }
}
