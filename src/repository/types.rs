//! Repository types and traits
//!
//! Defines the search-parameter bag, the iteration-error notification
//! payload, and the data-source capability trait the engine delegates to.

use crate::error::{Error, Result};
use crate::types::JsonValue;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ============================================================================
// Search Parameters
// ============================================================================

/// Open, loosely-typed key/value bag consumed by direct lookups.
///
/// Keys are strings; the meaning of each key is defined by the concrete data
/// source, not by the engine. The engine only requires the bag to be
/// non-empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SearchParams {
    values: HashMap<String, JsonValue>,
}

impl SearchParams {
    /// Create an empty bag
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a parameter, builder style
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    /// Insert a parameter
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<JsonValue>) {
        self.values.insert(key.into(), value.into());
    }

    /// Get a parameter value
    pub fn get(&self, key: &str) -> Option<&JsonValue> {
        self.values.get(key)
    }

    /// Get a parameter as a string slice, if it is a JSON string
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.values.get(key).and_then(JsonValue::as_str)
    }

    /// Get a scalar parameter rendered as a string
    pub fn get_string(&self, key: &str) -> Option<String> {
        self.values.get(key).and_then(scalar_to_string)
    }

    /// Check whether the bag is empty
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of parameters
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Iterate over parameters
    pub fn iter(&self) -> impl Iterator<Item = (&String, &JsonValue)> {
        self.values.iter()
    }

    /// Render scalar parameters as query pairs; composite values are skipped
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        self.values
            .iter()
            .filter_map(|(k, v)| scalar_to_string(v).map(|s| (k.clone(), s)))
            .collect()
    }
}

impl From<HashMap<String, JsonValue>> for SearchParams {
    fn from(values: HashMap<String, JsonValue>) -> Self {
        Self { values }
    }
}

/// Render a scalar JSON value as a plain string
fn scalar_to_string(value: &JsonValue) -> Option<String> {
    match value {
        JsonValue::String(s) => Some(s.clone()),
        JsonValue::Number(n) => Some(n.to_string()),
        JsonValue::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

// ============================================================================
// Iteration Error Notification
// ============================================================================

/// Traversal operation during which a fault was caught
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraversalOp {
    /// Early-exit search
    Find,
    /// Exhaustive materialization
    GetAll,
}

impl std::fmt::Display for TraversalOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TraversalOp::Find => write!(f, "find"),
            TraversalOp::GetAll => write!(f, "get_all"),
        }
    }
}

/// Immutable notification payload emitted when a traversal-scoped operation
/// catches a fault instead of propagating it.
#[derive(Debug)]
pub struct IterationError {
    operation: TraversalOp,
    error: Error,
    occurred_at: DateTime<Utc>,
}

impl IterationError {
    pub(crate) fn new(operation: TraversalOp, error: Error) -> Self {
        Self {
            operation,
            error,
            occurred_at: Utc::now(),
        }
    }

    /// The traversal operation that caught the fault
    pub fn operation(&self) -> TraversalOp {
        self.operation
    }

    /// The causing fault
    pub fn error(&self) -> &Error {
        &self.error
    }

    /// When the fault was caught
    pub fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }
}

/// Handle returned by listener registration, used for removal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub(crate) u64);

// ============================================================================
// Data Source Capability
// ============================================================================

/// Direct remote operations a concrete data source may support.
///
/// Every method defaults to [`Error::Unsupported`]: capability absence is a
/// first-class error kind deliberately returned by implementations that omit
/// an operation, not something encoded through the type hierarchy. Faults
/// from these operations propagate directly to the caller; the iteration
/// error channel is reserved for traversals.
#[async_trait]
pub trait DataSource<T: Send + Sync>: Send + Sync {
    /// Direct, server-side single-item lookup.
    ///
    /// Implementations without a targeted retrieval endpoint may fall back
    /// to a filtered listing built from `params`.
    async fn get(&self, params: &SearchParams) -> Result<Option<T>> {
        let _ = params;
        Err(Error::unsupported("get"))
    }

    /// Update one record on the remote data source. Takes effect
    /// immediately; there is no save step.
    async fn update(&self, record: &T) -> Result<()> {
        let _ = record;
        Err(Error::unsupported("update"))
    }

    /// Delete one record on the remote data source
    async fn delete(&self, record: &T) -> Result<()> {
        let _ = record;
        Err(Error::unsupported("delete"))
    }

    /// Delete every record matching the predicate. Returns the number of
    /// records deleted.
    async fn delete_all(&self, predicate: &(dyn for<'a> Fn(&'a T) -> bool + Send + Sync)) -> Result<u64> {
        let _ = predicate;
        Err(Error::unsupported("delete_all"))
    }
}
