//! Client caches and the snapshots used to move their contents from a server render to the
//! browser.

use parking_lot::RwLock;
use serde_json::Value;
use std::{
    collections::{hash_map, HashMap},
    convert::TryFrom
};
use thiserror::Error;
use tracing::trace;


type Fields = HashMap<String, Value>;
type Records = HashMap<String, Fields>;

/// A cache that can be rehydrated from a snapshot and dumped back into one.
pub trait Cache: Send + Sync {
    /// Write the snapshot into the cache in place.
    fn restore(&self, state: SerializedState) -> Result<(), CacheError>;

    /// Take a snapshot of the current cache contents.
    fn extract(&self) -> SerializedState;
}

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("malformed cache snapshot: {0}")]
    Json(#[from] serde_json::Error),
    #[error("cache snapshot must be a JSON object, found {0}")]
    NotAnObject(&'static str)
}

/// A plain-data copy of a cache, keyed by entity (`Query`, `User:1`, ...) and then by field.
///
/// This is what a server render embeds into the page and what the browser hands back to
/// [`ClientProvider::init_client`](../struct.ClientProvider.html#method.init_client).
/// It serializes as a bare JSON object:
///
/// ```
/// # use client_provider::SerializedState;
/// let state = SerializedState::from_json(r#"{ "Query": { "data": 1 } }"#).unwrap();
/// assert_eq!(state.get("Query", "data"), Some(&serde_json::json!(1)));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SerializedState {
    records: Records
}

impl SerializedState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(json: &str) -> Result<Self, CacheError> {
        let value: Value = serde_json::from_str(json)?;
        Self::try_from(value)
    }

    pub fn to_json(&self) -> Result<String, CacheError> {
        Ok(serde_json::to_string(&self.records)?)
    }

    /// Add a field to the snapshot, replacing any previous value.
    pub fn with_field<E, F>(mut self, entity: E, field: F, value: Value) -> Self
    where
        E: Into<String>,
        F: Into<String>
    {
        self.insert(entity, field, value);
        self
    }

    pub fn insert<E, F>(&mut self, entity: E, field: F, value: Value) -> Option<Value>
    where
        E: Into<String>,
        F: Into<String>
    {
        self.records
            .entry(entity.into())
            .or_insert_with(HashMap::new)
            .insert(field.into(), value)
    }

    pub fn get(&self, entity: &str, field: &str) -> Option<&Value> {
        self.records.get(entity).and_then(|fields| fields.get(field))
    }

    pub fn entity(&self, entity: &str) -> Option<&HashMap<String, Value>> {
        self.records.get(entity)
    }

    pub fn entities(&self) -> impl Iterator<Item = &str> {
        self.records.keys().map(String::as_str)
    }

    /// Number of entities in the snapshot.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl TryFrom<Value> for SerializedState {
    type Error = CacheError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        if value.is_object() {
            return Ok(serde_json::from_value(value)?);
        }

        let kind = match value {
            Value::Null => "null",
            Value::Bool(_) => "a boolean",
            Value::Number(_) => "a number",
            Value::String(_) => "a string",
            Value::Array(_) => "an array",
            Value::Object(_) => "an object"
        };
        Err(CacheError::NotAnObject(kind))
    }
}

impl IntoIterator for SerializedState {
    type Item = (String, HashMap<String, Value>);
    type IntoIter = hash_map::IntoIter<String, HashMap<String, Value>>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

/// A flat in-memory entity cache.
#[derive(Default)]
pub struct InMemoryCache {
    records: RwLock<Records>
}

impl InMemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_state(state: SerializedState) -> Self {
        Self {
            records: RwLock::new(state.records)
        }
    }

    pub fn write_field<E, F>(&self, entity: E, field: F, value: Value)
    where
        E: Into<String>,
        F: Into<String>
    {
        let mut records = self.records.write();
        records
            .entry(entity.into())
            .or_insert_with(HashMap::new)
            .insert(field.into(), value);
    }

    pub fn read_field(&self, entity: &str, field: &str) -> Option<Value> {
        let records = self.records.read();
        records
            .get(entity)
            .and_then(|fields| fields.get(field))
            .cloned()
    }

    pub fn read_entity(&self, entity: &str) -> Option<HashMap<String, Value>> {
        self.records.read().get(entity).cloned()
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

impl Cache for InMemoryCache {
    /// Merges the snapshot into the existing records. Fields present in the snapshot overwrite
    /// the cached ones, everything else is left alone.
    fn restore(&self, state: SerializedState) -> Result<(), CacheError> {
        let mut records = self.records.write();
        for (entity, fields) in state {
            trace!(entity = %entity, fields = fields.len(), "restoring entity");
            records
                .entry(entity)
                .or_insert_with(HashMap::new)
                .extend(fields);
        }
        Ok(())
    }

    fn extract(&self) -> SerializedState {
        SerializedState {
            records: self.records.read().clone()
        }
    }
}
