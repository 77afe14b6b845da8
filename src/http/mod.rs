//! HTTP client with retry support
//!
//! Provides the transport layer used by the concrete REST cursor and
//! data source. Handles:
//! - Automatic retries with configurable backoff
//! - Response body parsing
//! - Error classification for retry decisions

mod client;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder, RequestConfig};

#[cfg(test)]
mod tests;
