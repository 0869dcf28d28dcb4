//! Thing storage trait and the in-memory implementation.
//!
//! The store is an ordered list behind one lock. Things keep insertion order,
//! there is no persistence and no transactional behavior.

use super::{NewThing, Thing};
use chrono::Utc;
use serde_json::Value;
use std::future::Future;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

/// Error type for thing storage operations.
#[derive(Debug, thiserror::Error)]
pub enum ThingStorageError {
    /// Invalid input was provided.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The backing store failed.
    #[error("Storage error: {0}")]
    StorageError(String),
}

pub trait ThingStorage: Clone + Send + Sync + 'static {
    /// The error type for storage operations.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Validate and store a new thing, assigning its id and creation time.
    fn add_thing(&self, input: NewThing) -> impl Future<Output = Result<Thing, Self::Error>> + Send;

    /// All things in insertion order.
    fn list_things(&self) -> impl Future<Output = Result<Vec<Thing>, Self::Error>> + Send;

    fn get_thing(
        &self,
        thing_id: &str,
    ) -> impl Future<Output = Result<Option<Thing>, Self::Error>> + Send;

    /// Remove a thing. Returns `false` when no thing had that id.
    fn delete_thing(&self, thing_id: &str)
    -> impl Future<Output = Result<bool, Self::Error>> + Send;
}

#[derive(Clone, Default)]
pub struct MemoryThingStorage {
    things: Arc<RwLock<Vec<Thing>>>,
}

impl MemoryThingStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a storage pre-populated with the given things.
    pub fn with_things(things: impl IntoIterator<Item = Thing>) -> Self {
        Self {
            things: Arc::new(RwLock::new(things.into_iter().collect())),
        }
    }

    /// Returns the number of stored things.
    pub fn len(&self) -> usize {
        self.things.read().map(|things| things.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned<T>(err: std::sync::PoisonError<T>) -> ThingStorageError {
    ThingStorageError::StorageError(err.to_string())
}

impl ThingStorage for MemoryThingStorage {
    type Error = ThingStorageError;

    async fn add_thing(&self, input: NewThing) -> Result<Thing, Self::Error> {
        let input = input.normalized();
        if input.name.trim().is_empty() {
            return Err(ThingStorageError::InvalidInput(
                "Name cannot be empty".to_owned(),
            ));
        }

        // Metadata is offered as a file download, so it must have a file form.
        let is_file_like = |metadata: &Value| {
            matches!(metadata, Value::Object(_) | Value::Array(_) | Value::String(_))
        };
        if input.metadata.as_ref().is_some_and(|m| !is_file_like(m)) {
            return Err(ThingStorageError::InvalidInput(
                "Metadata must be a JSON object, array or string".to_owned(),
            ));
        }

        let thing = Thing {
            thing_id: Uuid::new_v4().to_string(),
            name: input.name,
            description: input.description,
            metadata: input.metadata,
            created_at: Utc::now(),
        };

        self.things.write().map_err(poisoned)?.push(thing.clone());
        tracing::debug!(thing_id = %thing.thing_id, "thing added");

        Ok(thing)
    }

    async fn list_things(&self) -> Result<Vec<Thing>, Self::Error> {
        Ok(self.things.read().map_err(poisoned)?.clone())
    }

    async fn get_thing(&self, thing_id: &str) -> Result<Option<Thing>, Self::Error> {
        let things = self.things.read().map_err(poisoned)?;
        Ok(things.iter().find(|t| t.thing_id == thing_id).cloned())
    }

    async fn delete_thing(&self, thing_id: &str) -> Result<bool, Self::Error> {
        let mut things = self.things.write().map_err(poisoned)?;
        let before = things.len();
        things.retain(|t| t.thing_id != thing_id);
        let deleted = things.len() != before;
        if deleted {
            tracing::debug!(thing_id, "thing deleted");
        }
        Ok(deleted)
    }
}
