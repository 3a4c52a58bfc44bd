use async_trait::async_trait;
use bson::{doc, oid::ObjectId, DateTime, Document};
use mongodb::options::{ClientOptions, FindOptions};
use mongodb::{Client, Collection, IndexModel};

use crate::errors::StoreError;
use crate::models::todo::{Todo, TodoDraft};
use crate::repository::TodoStore;

const COLLECTION_NAME: &str = "todos";

#[derive(Clone, Debug)]
pub struct MongoTodoStore {
    client: Client,
    database_name: String,
}

impl MongoTodoStore {
    /// Connects, pings the server and makes sure the listing index exists.
    pub async fn connect(uri: &str, database_name: &str, app_name: &str) -> Result<Self, StoreError> {
        let mut client_options = ClientOptions::parse(uri).await?;
        client_options.app_name = Some(app_name.to_string());
        let client = Client::with_options(client_options)?;

        let store = Self {
            client,
            database_name: database_name.to_string(),
        };
        store
            .client
            .database(&store.database_name)
            .run_command(doc! { "ping": 1 }, None)
            .await?;
        tracing::info!(database = %store.database_name, "connected to MongoDB");

        let index = IndexModel::builder()
            .keys(doc! { "createdAt": -1, "_id": -1 })
            .build();
        store.todos_collection().create_index(index, None).await?;
        Ok(store)
    }

    fn todos_collection(&self) -> Collection<Todo> {
        let db = self.client.database(&self.database_name);
        db.collection(COLLECTION_NAME)
    }
}

fn by_id(id: ObjectId) -> Document {
    doc! { "_id": id }
}

#[async_trait]
impl TodoStore for MongoTodoStore {
    async fn find_all(&self, completed: Option<bool>) -> Result<Vec<Todo>, StoreError> {
        let filter = match completed {
            Some(completed) => doc! { "completed": completed },
            None => doc! {},
        };
        let options = FindOptions::builder()
            .sort(doc! { "createdAt": -1, "_id": -1 })
            .build();

        let mut cursor = self.todos_collection().find(filter, options).await?;
        let mut result: Vec<Todo> = Vec::new();
        while cursor.advance().await? {
            result.push(cursor.deserialize_current()?);
        }
        tracing::debug!(count = result.len(), ?completed, "loaded todos");
        Ok(result)
    }

    async fn find_by_id(&self, id: ObjectId) -> Result<Option<Todo>, StoreError> {
        Ok(self.todos_collection().find_one(by_id(id), None).await?)
    }

    async fn insert(&self, draft: TodoDraft) -> Result<Todo, StoreError> {
        let todo = Todo::create(ObjectId::new(), draft, DateTime::now());
        self.todos_collection().insert_one(&todo, None).await?;
        Ok(todo)
    }

    async fn replace(&self, id: ObjectId, draft: TodoDraft) -> Result<Option<Todo>, StoreError> {
        let collection = self.todos_collection();
        let Some(existing) = collection.find_one(by_id(id), None).await? else {
            return Ok(None);
        };
        let todo = existing.revise(draft, DateTime::now());
        let result = collection.replace_one(by_id(id), &todo, None).await?;
        if result.matched_count == 0 {
            // deleted between the read and the write
            return Ok(None);
        }
        Ok(Some(todo))
    }

    async fn delete(&self, id: ObjectId) -> Result<Option<Todo>, StoreError> {
        Ok(self.todos_collection().find_one_and_delete(by_id(id), None).await?)
    }
}
