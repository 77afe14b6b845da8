//! Cursor trait definition

use crate::error::Result;
use async_trait::async_trait;

/// Stateful cursor over a remote, paginated data set.
///
/// A freshly constructed cursor over a non-empty data set is positioned on
/// the first element; over an empty data set `current()` returns `None`.
///
/// The cursor is greedy: there is no way to test for further elements
/// without calling [`advance`](RecordCursor::advance), which may perform a
/// remote fetch. Traversals therefore always read `current()`, act on it,
/// and only then attempt to advance.
#[async_trait]
pub trait RecordCursor<T>: Send {
    /// The element at the present cursor position. Never fetches.
    fn current(&self) -> Option<&T>;

    /// Attempt to move the cursor to the next element, fetching the next
    /// remote page if the current page is exhausted.
    ///
    /// Returns `Ok(true)` iff a valid element is now positioned, `Ok(false)`
    /// on exhaustion, and `Err` on any transport or decoding fault.
    async fn advance(&mut self) -> Result<bool>;

    /// Number of elements requested per underlying fetch.
    fn page_size(&self) -> u32;

    /// Change the page size. Permitted mid-traversal; takes effect on the
    /// next fetch.
    fn set_page_size(&mut self, page_size: u32);
}
