//! REST data source module
//!
//! Concrete collaborators for REST-style APIs: a YAML-loadable
//! configuration, a paging cursor implementing [`RecordCursor`], and a
//! [`DataSource`] with direct lookup and mutation operations.
//!
//! Supports: Offset, Page Number, and Cursor pagination.
//!
//! [`RecordCursor`]: crate::cursor::RecordCursor
//! [`DataSource`]: crate::repository::DataSource

mod config;
mod cursor;
mod source;

pub use config::{PageMode, RestConfig};
pub use cursor::RestCursor;
pub use source::RestSource;

use crate::http::{HttpClient, HttpClientConfig};

/// Build an HTTP client preconfigured for a REST config's base URL
pub fn default_client(config: &RestConfig) -> HttpClient {
    HttpClient::with_config(
        HttpClientConfig::builder()
            .base_url(&config.base_url)
            .build(),
    )
}
