// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]

//! # pagerepo
//!
//! Repository-style access to paginated remote data sets.
//!
//! The crate wraps a greedy paging cursor behind a small repository facade:
//! traversal-scoped searches, exhaustive materialization, and direct remote
//! operations, with traversal faults reported through a notification channel
//! instead of poisoning every call site.
//!
//! ## Features
//!
//! - **Greedy cursor contract**: read the current record, then advance; no
//!   separate has-next probe
//! - **Page-size bracketing**: `find` drops the page size to one record,
//!   `get_all` raises it to the configured maximum, and the previous value is
//!   restored either way
//! - **Fault isolation**: traversal faults surface as listener notifications
//!   and an empty result; direct-operation faults propagate to the caller
//! - **REST backend**: YAML-configurable cursor and data source over
//!   offset, page-number, and cursor pagination
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use pagerepo::{Repository, RestConfig, RestCursor, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = RestConfig::from_yaml_file("users.yaml")?;
//!     let cursor = RestCursor::connect(config).await?;
//!
//!     let mut repo = Repository::new(500);
//!     repo.on_iteration_error(|event| {
//!         eprintln!("traversal fault during {}: {}", event.operation(), event.error());
//!     });
//!     repo.attach(Some(Box::new(cursor)))?;
//!
//!     let admin = repo.find(|user| user["role"] == "admin").await;
//!     let everyone = repo.get_all().await;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                        Repository                          │
//! │  find(pred) → Option<T>        get_all() → Vec<T>          │
//! │  get(params) / update / delete / delete_all                │
//! │  on_iteration_error(listener) → ListenerId                 │
//! └───────────────┬────────────────────────────┬───────────────┘
//!                 │ traversal                  │ direct
//! ┌───────────────┴───────────┐  ┌─────────────┴───────────────┐
//! │     RecordCursor<T>       │  │        DataSource<T>        │
//! │  current / advance        │  │  get / update / delete      │
//! │  page_size / set          │  │  delete_all                 │
//! ├───────────────────────────┤  ├─────────────────────────────┤
//! │ MemoryCursor │ RestCursor │  │         RestSource          │
//! └───────────────────────────┘  └─────────────────────────────┘
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// HTTP client with retry support
pub mod http;

/// Greedy record cursor contract and in-memory implementation
pub mod cursor;

/// Repository engine, search parameters, and the data-source trait
pub mod repository;

/// REST-backed cursor and data source
pub mod rest;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

pub use cursor::{MemoryCursor, RecordCursor};
pub use repository::{
    DataSource, IterationError, ListenerId, Repository, SearchParams, TraversalOp,
};
pub use rest::{PageMode, RestConfig, RestCursor, RestSource};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
