//! Direct lookup and mutation operations against a REST endpoint

use super::config::{records_at_path, RestConfig};
use super::cursor::RestCursor;
use crate::error::{Error, Result};
use crate::http::{HttpClient, RequestConfig};
use crate::repository::{DataSource, SearchParams};
use crate::types::JsonValue;
use async_trait::async_trait;
use tracing::debug;

/// REST-backed [`DataSource`] for JSON records.
///
/// Direct lookup uses `GET {endpoint}/{id}` when the search parameters carry
/// the configured id field, and a filtered listing otherwise. `update` maps
/// to `PUT`, `delete` to `DELETE`. `delete_all` is deliberately left at the
/// `Unsupported` default: a predicate cannot be evaluated server-side.
pub struct RestSource {
    client: HttpClient,
    config: RestConfig,
}

impl RestSource {
    /// Create a source over an existing client
    pub fn new(client: HttpClient, config: RestConfig) -> Self {
        Self { client, config }
    }

    /// Create a source with a client derived from the config's base URL
    pub fn from_config(config: RestConfig) -> Self {
        let client = super::default_client(&config);
        Self::new(client, config)
    }

    /// Open a traversal cursor over the same endpoint
    pub async fn cursor(&self) -> Result<RestCursor> {
        RestCursor::open(self.client.clone(), self.config.clone()).await
    }

    fn item_url(&self, id: &str) -> String {
        format!("{}/{}", self.config.endpoint.trim_end_matches('/'), id)
    }

    fn base_request(&self) -> RequestConfig {
        let mut req = RequestConfig::new();
        for (key, value) in &self.config.headers {
            req = req.header(key, value);
        }
        req
    }

    /// Pull the record id out of a record, rendered as a string
    fn record_id(&self, record: &JsonValue) -> Result<String> {
        record
            .get(&self.config.id_field)
            .and_then(scalar_to_string)
            .ok_or_else(|| Error::invalid_argument(self.config.id_field.clone()))
    }
}

#[async_trait]
impl DataSource<JsonValue> for RestSource {
    async fn get(&self, params: &SearchParams) -> Result<Option<JsonValue>> {
        if params.is_empty() {
            return Err(Error::invalid_argument("params"));
        }

        // Targeted retrieval when the id is known
        if let Some(id) = params.get_string(&self.config.id_field) {
            debug!(%id, "direct lookup");
            let req = self.base_request();
            return match self
                .client
                .get_json_with_config::<JsonValue>(&self.item_url(&id), req)
                .await
            {
                Ok(record) => Ok(Some(record)),
                Err(Error::HttpStatus { status: 404, .. }) => Ok(None),
                Err(e) => Err(e),
            };
        }

        // Otherwise a filtered listing; the first record wins
        let mut req = self.base_request();
        for (key, value) in &self.config.query {
            req = req.query(key, value);
        }
        for (key, value) in params.to_query_pairs() {
            req = req.query(key, value);
        }

        let body: JsonValue = self
            .client
            .get_json_with_config(&self.config.endpoint, req)
            .await?;
        let records = records_at_path(&body, &self.config.record_path)?;
        Ok(records.into_iter().next())
    }

    async fn update(&self, record: &JsonValue) -> Result<()> {
        let id = self.record_id(record)?;
        debug!(%id, "updating record");
        self.client.put(&self.item_url(&id), record.clone()).await?;
        Ok(())
    }

    async fn delete(&self, record: &JsonValue) -> Result<()> {
        let id = self.record_id(record)?;
        debug!(%id, "deleting record");
        self.client.delete(&self.item_url(&id)).await?;
        Ok(())
    }
}

/// Render a scalar JSON value as a plain string
fn scalar_to_string(value: &JsonValue) -> Option<String> {
    match value {
        JsonValue::String(s) => Some(s.clone()),
        JsonValue::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
