use std::sync::Arc;

use async_trait::async_trait;
use bson::oid::ObjectId;

use crate::config::{Config, StoreBackend};
use crate::errors::StoreError;
use crate::models::todo::{Todo, TodoDraft};

pub mod memory;
pub mod mongo;

pub use memory::InMemoryTodoStore;
pub use mongo::MongoTodoStore;

/// Persistence surface the service layer talks to.
///
/// Implementations own id and timestamp generation, and every write touches a
/// single record. There is no optimistic locking: two concurrent `replace`
/// calls for the same id both succeed and the last one wins.
#[async_trait]
pub trait TodoStore: Send + Sync {
    /// Records matching `completed` (or all of them), newest `createdAt` first.
    async fn find_all(&self, completed: Option<bool>) -> Result<Vec<Todo>, StoreError>;

    async fn find_by_id(&self, id: ObjectId) -> Result<Option<Todo>, StoreError>;

    async fn insert(&self, draft: TodoDraft) -> Result<Todo, StoreError>;

    /// Overwrites the client-settable fields. `None` when `id` is unknown.
    async fn replace(&self, id: ObjectId, draft: TodoDraft) -> Result<Option<Todo>, StoreError>;

    /// Removes the record and hands it back. `None` when `id` is unknown.
    async fn delete(&self, id: ObjectId) -> Result<Option<Todo>, StoreError>;
}

pub async fn connect(config: &Config) -> anyhow::Result<Arc<dyn TodoStore>> {
    match config.backend {
        StoreBackend::Memory => {
            tracing::warn!("using the in-memory todo store, data is lost on restart");
            Ok(Arc::new(InMemoryTodoStore::new()))
        }
        StoreBackend::MongoDb => {
            let uri = config
                .mongodb_uri
                .as_deref()
                .ok_or_else(|| anyhow::anyhow!("MONGODB_URI must be set for the mongodb backend"))?;
            let store = MongoTodoStore::connect(uri, &config.database_name, &config.app_name).await?;
            Ok(Arc::new(store))
        }
    }
}
