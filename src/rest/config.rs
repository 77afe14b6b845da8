//! REST data source configuration
//!
//! Defines the YAML-loadable description of one remote collection endpoint
//! and the dot-path record extraction helpers shared by the cursor and the
//! data source.

use crate::error::{Error, Result, ResultExt};
use crate::types::{JsonValue, StringMap};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for one REST collection endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestConfig {
    /// Base URL for API requests
    pub base_url: String,

    /// Collection endpoint path (e.g. `/users`)
    pub endpoint: String,

    /// Dot path to the records array inside the response body; empty means
    /// the body itself is the array
    #[serde(default)]
    pub record_path: String,

    /// Pagination mode
    #[serde(default)]
    pub page: PageMode,

    /// Initial number of records requested per fetch
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Static query parameters sent with every request
    #[serde(default)]
    pub query: StringMap,

    /// Static headers sent with every request
    #[serde(default)]
    pub headers: StringMap,

    /// Field identifying a record, used for direct lookup and mutations
    #[serde(default = "default_id_field")]
    pub id_field: String,
}

fn default_page_size() -> u32 {
    100
}

fn default_id_field() -> String {
    "id".to_string()
}

impl RestConfig {
    /// Create a config with defaults for everything but the addresses
    pub fn new(base_url: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            endpoint: endpoint.into(),
            record_path: String::new(),
            page: PageMode::default(),
            page_size: default_page_size(),
            query: StringMap::new(),
            headers: StringMap::new(),
            id_field: default_id_field(),
        }
    }

    /// Set the record path, builder style
    #[must_use]
    pub fn with_record_path(mut self, path: impl Into<String>) -> Self {
        self.record_path = path.into();
        self
    }

    /// Set the pagination mode
    #[must_use]
    pub fn with_page_mode(mut self, page: PageMode) -> Self {
        self.page = page;
        self
    }

    /// Set the initial page size
    #[must_use]
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Load a config from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config from a YAML file
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_yaml_str(&content)
    }

    /// Validate required fields
    pub fn validate(&self) -> Result<()> {
        if self.base_url.is_empty() {
            return Err(Error::missing_field("base_url"));
        }
        if self.endpoint.is_empty() {
            return Err(Error::missing_field("endpoint"));
        }
        Ok(())
    }
}

/// Pagination mode for a REST collection endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum PageMode {
    /// Offset/limit pagination (`?offset=100&limit=50`)
    Offset {
        #[serde(default = "default_offset_param")]
        offset_param: String,
        #[serde(default = "default_limit_param")]
        limit_param: String,
    },

    /// Page number pagination (`?page=2&per_page=50`)
    PageNumber {
        #[serde(default = "default_page_param")]
        page_param: String,
        /// Query parameter carrying the page size; when absent, exhaustion
        /// is detected by fetching one empty page
        #[serde(default)]
        size_param: Option<String>,
        /// First page number (usually 0 or 1)
        #[serde(default = "default_start_page")]
        start_page: u32,
    },

    /// Cursor pagination (`?starting_after=obj_123`), with the next cursor
    /// extracted from the response body
    Cursor {
        cursor_param: String,
        /// Dot path to the next cursor in the response
        cursor_path: String,
        #[serde(default = "default_limit_param")]
        limit_param: String,
    },
}

impl Default for PageMode {
    fn default() -> Self {
        Self::Offset {
            offset_param: default_offset_param(),
            limit_param: default_limit_param(),
        }
    }
}

fn default_offset_param() -> String {
    "offset".to_string()
}

fn default_limit_param() -> String {
    "limit".to_string()
}

fn default_page_param() -> String {
    "page".to_string()
}

fn default_start_page() -> u32 {
    1
}

// ============================================================================
// Dot-path extraction
// ============================================================================

/// Walk a dot path (optionally prefixed with `$.`) into a JSON value
pub(crate) fn value_at_path<'a>(value: &'a JsonValue, path: &str) -> Option<&'a JsonValue> {
    let path = path.strip_prefix("$.").unwrap_or(path);
    if path.is_empty() || path == "$" {
        return Some(value);
    }

    let mut current = value;
    for part in path.split('.') {
        current = current.as_object()?.get(part)?;
    }
    Some(current)
}

/// Extract the records array at a path
pub(crate) fn records_at_path(body: &JsonValue, path: &str) -> Result<Vec<JsonValue>> {
    let value = value_at_path(body, path)
        .ok_or_else(|| Error::record_extraction(path, "path not found in response"))?;
    let records = value
        .as_array()
        .ok_or_else(|| Error::record_extraction(path, "value at path is not an array"))?;
    Ok(records.clone())
}

/// Extract a scalar at a path, rendered as a string
pub(crate) fn string_at_path(body: &JsonValue, path: &str) -> Option<String> {
    match value_at_path(body, path)? {
        JsonValue::String(s) => Some(s.clone()),
        JsonValue::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
