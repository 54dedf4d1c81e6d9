//! Typed reqwest wrapper for the records REST API.

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde_json::Value;
use tracing::{debug, warn};

use super::{FieldNaming, Filter, RecordsApi};
use crate::config::{ApiConfig, CollectionPaths};
use crate::error::{ClassbookError, Result};
use crate::models::common::{Collection, EntityId};

/// HTTP client for the records API.
pub struct HttpApi {
    base_url: String,
    paths: CollectionPaths,
    naming: FieldNaming,
    http: Client,
}

impl HttpApi {
    pub fn new(base_url: &str) -> Self {
        Self::with_http_client(base_url, Client::new())
    }

    /// Create a client with a custom reqwest::Client (useful for testing).
    pub fn with_http_client(base_url: &str, http: Client) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            paths: CollectionPaths::default(),
            naming: FieldNaming::default(),
            http,
        }
    }

    pub fn from_config(config: &ApiConfig) -> Self {
        Self::new(&config.base_url)
            .with_paths(config.paths.clone())
            .with_naming(config.naming)
    }

    /// Override the per-collection path segments.
    pub fn with_paths(mut self, paths: CollectionPaths) -> Self {
        self.paths = paths;
        self
    }

    pub fn with_naming(mut self, naming: FieldNaming) -> Self {
        self.naming = naming;
        self
    }

    fn collection_url(&self, collection: Collection) -> String {
        format!(
            "{}/{}",
            self.base_url,
            self.paths.path_for(collection).trim_matches('/')
        )
    }

    fn item_url(&self, collection: Collection, id: EntityId) -> String {
        format!("{}/{id}", self.collection_url(collection))
    }
}

/// Read the body of a non-success response for error reporting.
async fn failure_message(response: Response) -> String {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    format!("status {status}: {body}")
}

#[async_trait]
impl RecordsApi for HttpApi {
    async fn list(&self, collection: Collection, filter: Filter<'_>) -> Result<Vec<Value>> {
        let url = self.collection_url(collection);
        let filter = self.naming.filter(collection, filter);
        debug!(url = %url, ?filter, "Fetching collection");

        let response = self
            .http
            .get(&url)
            .query(&filter)
            .send()
            .await
            .map_err(|e| ClassbookError::fetch(collection, None, format!("request failed: {e}")))?;

        if !response.status().is_success() {
            let message = failure_message(response).await;
            warn!(collection = %collection, message = %message, "List request failed");
            return Err(ClassbookError::fetch(collection, None, message));
        }

        response.json::<Vec<Value>>().await.map_err(|e| {
            ClassbookError::fetch(collection, None, format!("failed to parse response: {e}"))
        })
    }

    async fn get(&self, collection: Collection, id: EntityId) -> Result<Option<Value>> {
        let url = self.item_url(collection, id);
        debug!(url = %url, "Fetching record");

        let response = self.http.get(&url).send().await.map_err(|e| {
            ClassbookError::fetch(collection, Some(id), format!("request failed: {e}"))
        })?;

        if response.status() == StatusCode::NOT_FOUND {
            debug!(collection = %collection, id, "Record not found");
            return Ok(None);
        }

        if !response.status().is_success() {
            let message = failure_message(response).await;
            warn!(collection = %collection, id, message = %message, "Get request failed");
            return Err(ClassbookError::fetch(collection, Some(id), message));
        }

        let row = response.json::<Value>().await.map_err(|e| {
            ClassbookError::fetch(collection, Some(id), format!("failed to parse response: {e}"))
        })?;
        Ok(Some(row))
    }

    async fn create(&self, collection: Collection, body: Value) -> Result<Value> {
        let url = self.collection_url(collection);
        debug!(url = %url, "Creating record");
        let body = self.naming.encode(collection, body);

        let response = self.http.post(&url).json(&body).send().await.map_err(|e| {
            ClassbookError::mutation(collection, None, format!("request failed: {e}"))
        })?;

        if !response.status().is_success() {
            let message = failure_message(response).await;
            warn!(collection = %collection, message = %message, "Create request failed");
            return Err(ClassbookError::mutation(collection, None, message));
        }

        response.json::<Value>().await.map_err(|e| {
            ClassbookError::mutation(collection, None, format!("failed to parse response: {e}"))
        })
    }

    async fn update(&self, collection: Collection, id: EntityId, body: Value) -> Result<Value> {
        let url = self.item_url(collection, id);
        debug!(url = %url, "Replacing record");
        let body = self.naming.encode(collection, body);

        let response = self.http.put(&url).json(&body).send().await.map_err(|e| {
            ClassbookError::mutation(collection, Some(id), format!("request failed: {e}"))
        })?;

        if !response.status().is_success() {
            let message = failure_message(response).await;
            warn!(collection = %collection, id, message = %message, "Update request failed");
            return Err(ClassbookError::mutation(collection, Some(id), message));
        }

        response.json::<Value>().await.map_err(|e| {
            ClassbookError::mutation(
                collection,
                Some(id),
                format!("failed to parse response: {e}"),
            )
        })
    }

    async fn delete(&self, collection: Collection, id: EntityId) -> Result<()> {
        let url = self.item_url(collection, id);
        debug!(url = %url, "Deleting record");

        let response = self.http.delete(&url).send().await.map_err(|e| {
            ClassbookError::mutation(collection, Some(id), format!("request failed: {e}"))
        })?;

        if !response.status().is_success() {
            let message = failure_message(response).await;
            warn!(collection = %collection, id, message = %message, "Delete request failed");
            return Err(ClassbookError::mutation(collection, Some(id), message));
        }

        Ok(())
    }
}
