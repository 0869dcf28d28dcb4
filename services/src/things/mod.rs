//! The `Thing` resource: storage and CRUD routes.

pub mod routes;
pub mod storage;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub use storage::{MemoryThingStorage, ThingStorage, ThingStorageError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Thing {
    pub thing_id: String,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub metadata: Option<Value>,
    pub created_at: DateTime<Utc>,
}

/// Fields supplied when creating a thing.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NewThing {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub metadata: Option<Value>,
}

impl NewThing {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            metadata: None,
        }
    }

    pub fn with_metadata(mut self, metadata: Value) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Form posts carry metadata as text: blank text means no metadata and
    /// text holding a JSON object or array is stored structured.
    pub fn normalized(mut self) -> Self {
        self.metadata = match self.metadata {
            Some(Value::String(text)) if text.trim().is_empty() => None,
            Some(Value::String(text)) => match serde_json::from_str::<Value>(&text) {
                Ok(parsed @ (Value::Object(_) | Value::Array(_))) => Some(parsed),
                _ => Some(Value::String(text)),
            },
            other => other,
        };
        self
    }
}
