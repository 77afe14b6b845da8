//! Paging cursor over a REST collection endpoint

use super::config::{records_at_path, string_at_path, PageMode, RestConfig};
use crate::cursor::RecordCursor;
use crate::error::Result;
use crate::http::{HttpClient, RequestConfig};
use crate::types::{JsonValue, OptionStringExt};
use async_trait::async_trait;
use tracing::debug;

/// Greedy cursor over a paginated REST endpoint.
///
/// Buffers one page of records and fetches the next page on demand when an
/// advance steps past the buffer. The page size is read at fetch time, so a
/// change mid-traversal takes effect on the next request.
pub struct RestCursor {
    client: HttpClient,
    config: RestConfig,
    page_size: u32,
    buffer: Vec<JsonValue>,
    index: usize,
    state: PageState,
    more: bool,
}

#[derive(Debug)]
struct PageState {
    offset: u64,
    page: u32,
    cursor: Option<String>,
    fetched: u64,
}

impl PageState {
    fn new(mode: &PageMode) -> Self {
        let page = match mode {
            PageMode::PageNumber { start_page, .. } => *start_page,
            _ => 0,
        };
        Self {
            offset: 0,
            page,
            cursor: None,
            fetched: 0,
        }
    }
}

impl RestCursor {
    /// Open a cursor, fetching the first page so the cursor is positioned on
    /// the first element (or on nothing if the data set is empty)
    pub async fn open(client: HttpClient, config: RestConfig) -> Result<Self> {
        config.validate()?;
        let state = PageState::new(&config.page);
        let page_size = config.page_size;
        let mut cursor = Self {
            client,
            config,
            page_size,
            buffer: Vec::new(),
            index: 0,
            state,
            more: true,
        };
        cursor.buffer = cursor.fetch_page().await?;
        Ok(cursor)
    }

    /// Open a cursor with a client derived from the config's base URL
    pub async fn connect(config: RestConfig) -> Result<Self> {
        let client = super::default_client(&config);
        Self::open(client, config).await
    }

    /// Total records fetched so far, across all pages
    pub fn fetched(&self) -> u64 {
        self.state.fetched
    }

    /// Fetch the next page, updating the paging state and the `more` flag
    async fn fetch_page(&mut self) -> Result<Vec<JsonValue>> {
        let limit = self.page_size.max(1);

        let mut req = RequestConfig::new();
        for (key, value) in &self.config.query {
            req = req.query(key, value);
        }
        for (key, value) in &self.config.headers {
            req = req.header(key, value);
        }

        match &self.config.page {
            PageMode::Offset {
                offset_param,
                limit_param,
            } => {
                req = req
                    .query(offset_param, self.state.offset.to_string())
                    .query(limit_param, limit.to_string());
            }
            PageMode::PageNumber {
                page_param,
                size_param,
                ..
            } => {
                req = req.query(page_param, self.state.page.to_string());
                if let Some(param) = size_param {
                    req = req.query(param, limit.to_string());
                }
            }
            PageMode::Cursor {
                cursor_param,
                limit_param,
                ..
            } => {
                req = req.query(limit_param, limit.to_string());
                if let Some(cursor) = &self.state.cursor {
                    req = req.query(cursor_param, cursor);
                }
            }
        }

        let body: JsonValue = self
            .client
            .get_json_with_config(&self.config.endpoint, req)
            .await?;
        let records = records_at_path(&body, &self.config.record_path)?;
        let count = records.len();
        self.state.fetched += count as u64;
        debug!(count, total = self.state.fetched, "fetched page");

        self.more = match &self.config.page {
            PageMode::Offset { .. } => {
                self.state.offset += count as u64;
                count > 0 && count == limit as usize
            }
            PageMode::PageNumber { size_param, .. } => {
                self.state.page += 1;
                if size_param.is_some() {
                    count > 0 && count == limit as usize
                } else {
                    // Without a size parameter a short page proves nothing;
                    // exhaustion is an empty page
                    count > 0
                }
            }
            PageMode::Cursor { cursor_path, .. } => {
                match string_at_path(&body, cursor_path).none_if_empty() {
                    Some(next) => {
                        self.state.cursor = Some(next);
                        count > 0
                    }
                    None => false,
                }
            }
        };

        Ok(records)
    }
}

#[async_trait]
impl RecordCursor<JsonValue> for RestCursor {
    fn current(&self) -> Option<&JsonValue> {
        self.buffer.get(self.index)
    }

    async fn advance(&mut self) -> Result<bool> {
        if self.index + 1 < self.buffer.len() {
            self.index += 1;
            return Ok(true);
        }
        if !self.more {
            self.index = self.buffer.len();
            return Ok(false);
        }

        let next = self.fetch_page().await?;
        if next.is_empty() {
            self.more = false;
            self.index = self.buffer.len();
            return Ok(false);
        }
        self.buffer = next;
        self.index = 0;
        Ok(true)
    }

    fn page_size(&self) -> u32 {
        self.page_size
    }

    fn set_page_size(&mut self, page_size: u32) {
        self.page_size = page_size;
    }
}

impl std::fmt::Debug for RestCursor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestCursor")
            .field("endpoint", &self.config.endpoint)
            .field("page_size", &self.page_size)
            .field("buffered", &self.buffer.len())
            .field("fetched", &self.state.fetched)
            .field("more", &self.more)
            .finish()
    }
}
