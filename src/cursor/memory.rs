//! In-memory cursor over a fixed set of records

use super::types::RecordCursor;
use crate::error::Result;
use async_trait::async_trait;

/// Cursor over an in-memory `Vec<T>`.
///
/// Useful for composing a [`Repository`](crate::repository::Repository) with
/// local data and as a fixture in tests. The page size is plain state: no
/// fetching happens, but the save/restore discipline of the engine is still
/// observable through it.
#[derive(Debug, Clone)]
pub struct MemoryCursor<T> {
    items: Vec<T>,
    index: usize,
    past_end: bool,
    page_size: u32,
}

impl<T> MemoryCursor<T> {
    /// Create a cursor positioned on the first item, if any
    pub fn new(items: Vec<T>) -> Self {
        let past_end = items.is_empty();
        Self {
            items,
            index: 0,
            past_end,
            page_size: 100,
        }
    }

    /// Set the initial page size
    #[must_use]
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Number of items remaining at or after the cursor position
    pub fn remaining(&self) -> usize {
        if self.past_end {
            0
        } else {
            self.items.len() - self.index
        }
    }
}

#[async_trait]
impl<T: Send + Sync> RecordCursor<T> for MemoryCursor<T> {
    fn current(&self) -> Option<&T> {
        if self.past_end {
            None
        } else {
            self.items.get(self.index)
        }
    }

    async fn advance(&mut self) -> Result<bool> {
        if self.past_end {
            return Ok(false);
        }
        if self.index + 1 < self.items.len() {
            self.index += 1;
            Ok(true)
        } else {
            self.past_end = true;
            Ok(false)
        }
    }

    fn page_size(&self) -> u32 {
        self.page_size
    }

    fn set_page_size(&mut self, page_size: u32) {
        self.page_size = page_size;
    }
}
