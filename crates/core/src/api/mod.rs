//! The records API collaborator: the REST service that owns all five collections.

pub mod http;
pub mod memory;
pub mod wire;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{ClassbookError, Result};
use crate::models::common::{Collection, EntityId};

pub use http::HttpApi;
pub use memory::InMemoryApi;
pub use wire::FieldNaming;

/// Equality filters sent as query parameters, e.g. `[("class_id", "3")]`.
pub type Filter<'a> = &'a [(&'a str, String)];

/// CRUD surface of the records API, one JSON collection per entity type.
///
/// Read failures are reported as [`ClassbookError::Fetch`], write failures as
/// [`ClassbookError::Mutation`].
#[async_trait]
pub trait RecordsApi: Send + Sync {
    /// `GET /<collection>` (with `?k=v` for each filter pair).
    async fn list(&self, collection: Collection, filter: Filter<'_>) -> Result<Vec<Value>>;

    /// `GET /<collection>/<id>`. A missing record is `Ok(None)`.
    async fn get(&self, collection: Collection, id: EntityId) -> Result<Option<Value>>;

    /// `POST /<collection>`. Returns the created record with its assigned id.
    async fn create(&self, collection: Collection, body: Value) -> Result<Value>;

    /// `PUT /<collection>/<id>` with a full replacement body.
    async fn update(&self, collection: Collection, id: EntityId, body: Value) -> Result<Value>;

    /// `DELETE /<collection>/<id>`.
    async fn delete(&self, collection: Collection, id: EntityId) -> Result<()>;
}

pub(crate) fn decode_rows<T: DeserializeOwned>(
    collection: Collection,
    rows: Vec<Value>,
) -> Result<Vec<T>> {
    rows.into_iter()
        .map(|row| {
            serde_json::from_value(row).map_err(|e| {
                ClassbookError::fetch(collection, None, format!("failed to decode row: {e}"))
            })
        })
        .collect()
}

pub(crate) fn decode_written<T: DeserializeOwned>(
    collection: Collection,
    id: Option<EntityId>,
    row: Value,
) -> Result<T> {
    serde_json::from_value(row).map_err(|e| {
        ClassbookError::mutation(collection, id, format!("failed to decode response: {e}"))
    })
}

pub(crate) fn encode_body<T: serde::Serialize>(
    collection: Collection,
    id: Option<EntityId>,
    body: &T,
) -> Result<Value> {
    serde_json::to_value(body).map_err(|e| {
        ClassbookError::mutation(collection, id, format!("failed to encode body: {e}"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::course::Course;

    #[test]
    fn decode_rows_reports_collection() {
        let rows = vec![serde_json::json!({"id": 1, "name": "Art"}), serde_json::json!({"id": "x"})];
        let err = decode_rows::<Course>(Collection::Courses, rows).unwrap_err();
        assert_eq!(err.collection(), Some(Collection::Courses));
        assert!(matches!(err, ClassbookError::Fetch { .. }));
    }

    #[test]
    fn decode_written_is_a_mutation_error() {
        let err =
            decode_written::<Course>(Collection::Courses, Some(3), serde_json::json!(null)).unwrap_err();
        assert!(err.to_string().starts_with("failed to modify courses/3"));
    }
}
