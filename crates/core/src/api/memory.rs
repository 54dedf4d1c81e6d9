//! In-process records API holding JSON rows in memory.
//!
//! Behaves like the REST service from the engine's point of view: ids are
//! assigned on create, updates replace the whole row, and list filters match
//! by field equality. Every call yields to the scheduler once so concurrent
//! callers interleave the way they would over the network.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{Map, Value};

use super::{FieldNaming, Filter, RecordsApi};
use crate::error::{ClassbookError, Result};
use crate::models::common::{Collection, EntityId};
use crate::models::Collections;

#[derive(Debug, Default)]
struct MemoryState {
    rows: HashMap<Collection, Vec<Value>>,
    failing: HashSet<Collection>,
    requests: usize,
}

/// A [`RecordsApi`] backed by in-memory collections.
#[derive(Debug, Default)]
pub struct InMemoryApi {
    state: Mutex<MemoryState>,
    naming: FieldNaming,
}

impl InMemoryApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with the rows of `collections`.
    pub fn from_collections(collections: &Collections) -> Result<Self> {
        let api = Self::new();
        {
            let mut state = api.lock();
            for collection in Collection::ALL {
                let rows = match collection {
                    Collection::Courses => serde_json::to_value(&collections.courses),
                    Collection::Classes => serde_json::to_value(&collections.classes),
                    Collection::Students => serde_json::to_value(&collections.students),
                    Collection::Enrollments => serde_json::to_value(&collections.enrollments),
                    Collection::Grades => serde_json::to_value(&collections.grades),
                }
                .map_err(|e| ClassbookError::Serialization(e.to_string()))?;
                let rows = match rows {
                    Value::Array(rows) => rows,
                    _ => Vec::new(),
                };
                state.rows.insert(collection, rows);
            }
        }
        Ok(api)
    }

    /// Store and filter rows under `naming` instead of the canonical names.
    pub fn with_naming(mut self, naming: FieldNaming) -> Self {
        self.naming = naming;
        self
    }

    /// Append raw rows to `collection` as-is.
    pub fn seed(&self, collection: Collection, rows: impl IntoIterator<Item = Value>) {
        self.lock().rows.entry(collection).or_default().extend(rows);
    }

    /// Make every request against `collection` fail until [`Self::recover`] is called.
    pub fn fail(&self, collection: Collection) {
        self.lock().failing.insert(collection);
    }

    pub fn recover(&self, collection: Collection) {
        self.lock().failing.remove(&collection);
    }

    /// Current rows of `collection`.
    pub fn rows(&self, collection: Collection) -> Vec<Value> {
        self.lock().rows.get(&collection).cloned().unwrap_or_default()
    }

    /// Number of requests served so far, failed ones included.
    pub fn request_count(&self) -> usize {
        self.lock().requests
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Count the request and report whether the collection is set to fail.
    fn begin(&self, collection: Collection) -> bool {
        let mut state = self.lock();
        state.requests += 1;
        state.failing.contains(&collection)
    }
}

fn row_id(row: &Value) -> Option<EntityId> {
    row.get("id").and_then(Value::as_i64)
}

fn matches_filter(row: &Value, filter: &[(String, String)]) -> bool {
    filter.iter().all(|(field, expected)| match row.get(field.as_str()) {
        Some(Value::String(s)) => s == expected,
        Some(other) => other.to_string() == *expected,
        None => false,
    })
}

fn with_id(collection: Collection, id: EntityId, body: Value) -> Result<Value> {
    let mut fields: Map<String, Value> = match body {
        Value::Object(fields) => fields,
        other => {
            return Err(ClassbookError::mutation(
                collection,
                Some(id),
                format!("body must be a JSON object, got {other}"),
            ))
        }
    };
    fields.insert("id".into(), Value::from(id));
    Ok(Value::Object(fields))
}

#[async_trait]
impl RecordsApi for InMemoryApi {
    async fn list(&self, collection: Collection, filter: Filter<'_>) -> Result<Vec<Value>> {
        tokio::task::yield_now().await;
        if self.begin(collection) {
            return Err(ClassbookError::fetch(collection, None, "service unavailable"));
        }
        let filter = self.naming.filter(collection, filter);
        let state = self.lock();
        Ok(state
            .rows
            .get(&collection)
            .map(|rows| {
                rows.iter()
                    .filter(|row| matches_filter(row, &filter))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn get(&self, collection: Collection, id: EntityId) -> Result<Option<Value>> {
        tokio::task::yield_now().await;
        if self.begin(collection) {
            return Err(ClassbookError::fetch(collection, Some(id), "service unavailable"));
        }
        let state = self.lock();
        Ok(state
            .rows
            .get(&collection)
            .and_then(|rows| rows.iter().find(|row| row_id(row) == Some(id)))
            .cloned())
    }

    async fn create(&self, collection: Collection, body: Value) -> Result<Value> {
        tokio::task::yield_now().await;
        if self.begin(collection) {
            return Err(ClassbookError::mutation(collection, None, "service unavailable"));
        }
        let mut state = self.lock();
        let rows = state.rows.entry(collection).or_default();
        let id = rows.iter().filter_map(row_id).max().unwrap_or(0) + 1;
        let row = with_id(collection, id, self.naming.encode(collection, body))?;
        rows.push(row.clone());
        Ok(row)
    }

    async fn update(&self, collection: Collection, id: EntityId, body: Value) -> Result<Value> {
        tokio::task::yield_now().await;
        if self.begin(collection) {
            return Err(ClassbookError::mutation(collection, Some(id), "service unavailable"));
        }
        let mut state = self.lock();
        let slot = state
            .rows
            .get_mut(&collection)
            .and_then(|rows| rows.iter_mut().find(|row| row_id(row) == Some(id)))
            .ok_or_else(|| ClassbookError::mutation(collection, Some(id), "not found"))?;
        let row = with_id(collection, id, self.naming.encode(collection, body))?;
        *slot = row.clone();
        Ok(row)
    }

    async fn delete(&self, collection: Collection, id: EntityId) -> Result<()> {
        tokio::task::yield_now().await;
        if self.begin(collection) {
            return Err(ClassbookError::mutation(collection, Some(id), "service unavailable"));
        }
        let mut state = self.lock();
        let rows = state.rows.entry(collection).or_default();
        let before = rows.len();
        rows.retain(|row| row_id(row) != Some(id));
        if rows.len() == before {
            return Err(ClassbookError::mutation(collection, Some(id), "not found"));
        }
        Ok(())
    }
}
