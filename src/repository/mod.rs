//! Repository engine module
//!
//! Search and bulk materialization over an attached greedy cursor.
//!
//! # Overview
//!
//! [`Repository`] consumes one [`RecordCursor`] and implements `find` /
//! `get_all` against it with correct page-size bracketing and fault
//! isolation, plus pass-through `get` / `update` / `delete` / `delete_all`
//! delegated to an optional [`DataSource`]. Traversal faults never surface
//! as errors: they are published to registered iteration-error listeners and
//! the call returns an absent or empty result.

mod types;

pub use types::{DataSource, IterationError, ListenerId, SearchParams, TraversalOp};

use crate::cursor::RecordCursor;
use crate::error::{Error, Result};
use tracing::{debug, warn};

type Listener = Box<dyn Fn(&IterationError) + Send + Sync>;

/// Repository over one attached cursor.
///
/// Stateless façade apart from the attached collaborators: `max_page_size`
/// is the hard ceiling the remote API allows (fixed at construction), while
/// `page_size` is the caller-configurable default, pushed to the attached
/// cursor whenever it changes. `find` and `get_all` override the cursor's page size for the
/// duration of the call and restore it before returning, whatever the
/// outcome.
///
/// The engine assumes at most one in-flight traversal per attached cursor;
/// concurrent calls against the same instance race on the cursor position
/// and page-size setting.
pub struct Repository<T: Send + Sync> {
    cursor: Option<Box<dyn RecordCursor<T>>>,
    source: Option<Box<dyn DataSource<T>>>,
    max_page_size: u32,
    page_size: u32,
    listeners: Vec<(ListenerId, Listener)>,
    next_listener_id: u64,
}

impl<T: Send + Sync> Repository<T> {
    /// Create a repository with the given page-size ceiling
    pub fn new(max_page_size: u32) -> Self {
        Self {
            cursor: None,
            source: None,
            max_page_size,
            page_size: max_page_size.max(1),
            listeners: Vec::new(),
            next_listener_id: 0,
        }
    }

    /// Set the default page size, clamped to the ceiling
    #[must_use]
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.set_page_size(page_size);
        self
    }

    /// Set the data source used for direct lookups and mutations
    #[must_use]
    pub fn with_source<S: DataSource<T> + 'static>(mut self, source: S) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// The hard page-size ceiling
    pub fn max_page_size(&self) -> u32 {
        self.max_page_size
    }

    /// The default page size
    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Change the default page size; applies to the attached cursor as well
    pub fn set_page_size(&mut self, page_size: u32) {
        let page_size = if self.max_page_size >= 1 {
            page_size.clamp(1, self.max_page_size)
        } else {
            page_size
        };
        self.page_size = page_size;
        if let Some(cursor) = self.cursor.as_deref_mut() {
            cursor.set_page_size(page_size);
        }
    }

    /// Whether a cursor is attached
    pub fn has_cursor(&self) -> bool {
        self.cursor.is_some()
    }

    /// Attach the cursor all subsequent traversals run against.
    ///
    /// Re-attaching replaces the previous cursor outright. `None` fails with
    /// [`Error::InvalidArgument`] and leaves any previously attached cursor
    /// untouched. Returns the repository for fluent configuration chains.
    pub fn attach(&mut self, cursor: Option<Box<dyn RecordCursor<T>>>) -> Result<&mut Self> {
        let cursor = cursor.ok_or_else(|| Error::invalid_argument("cursor"))?;
        self.cursor = Some(cursor);
        Ok(self)
    }

    // ========================================================================
    // Iteration-error listeners
    // ========================================================================

    /// Register a listener invoked synchronously, on the calling task, for
    /// every fault caught during `find` or `get_all`
    pub fn on_iteration_error<F>(&mut self, listener: F) -> ListenerId
    where
        F: Fn(&IterationError) + Send + Sync + 'static,
    {
        let id = ListenerId(self.next_listener_id);
        self.next_listener_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a previously registered listener. Returns whether it existed.
    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _)| *lid != id);
        self.listeners.len() != before
    }

    fn notify(&self, operation: TraversalOp, error: Error) {
        warn!(%operation, %error, "traversal fault caught; returning empty result");
        let event = IterationError::new(operation, error);
        for (_, listener) in &self.listeners {
            listener(&event);
        }
    }

    // ========================================================================
    // Traversal operations
    // ========================================================================

    /// Return the first element matching the predicate, in traversal order.
    ///
    /// The cursor's page size is forced to 1 for the duration of the call
    /// (only one match matters, so look-ahead is wasted work) and restored
    /// before returning. Without an attached cursor this returns `None`
    /// silently: that is a configuration gap, not a fault. A fault raised by
    /// the cursor is published to the iteration-error listeners and the
    /// result is `None`.
    pub async fn find<F>(&mut self, mut predicate: F) -> Option<T>
    where
        T: Clone,
        F: FnMut(&T) -> bool,
    {
        self.try_find(|record| Ok(predicate(record))).await
    }

    /// Like [`find`](Repository::find), but with a fallible predicate.
    ///
    /// A predicate error is treated exactly like a cursor fault: it is
    /// routed through the iteration-error channel and the result is `None`.
    pub async fn try_find<F>(&mut self, mut predicate: F) -> Option<T>
    where
        T: Clone,
        F: FnMut(&T) -> Result<bool>,
    {
        let max_page_size = self.max_page_size;
        let Some(cursor) = self.cursor.as_deref_mut() else {
            debug!("find called with no cursor attached");
            return None;
        };

        let saved = cursor.page_size();
        if max_page_size >= 1 {
            cursor.set_page_size(1);
        }

        let outcome = search(cursor, &mut predicate).await;

        // Restore unconditionally, match or fault
        cursor.set_page_size(saved);

        match outcome {
            Ok(found) => found,
            Err(error) => {
                self.notify(TraversalOp::Find, error);
                None
            }
        }
    }

    /// Materialize every element of the data set, in traversal order.
    ///
    /// The cursor's page size is forced to `max_page_size` for the duration
    /// of the call (everything will be consumed, so round-trips are the
    /// cost) and restored before returning. On a fault the partial
    /// accumulator is discarded: the listeners are notified once and the
    /// result is empty, never partial.
    ///
    /// Unbounded in cost and memory for large or infinite data sets.
    pub async fn get_all(&mut self) -> Vec<T>
    where
        T: Clone,
    {
        let max_page_size = self.max_page_size;
        let Some(cursor) = self.cursor.as_deref_mut() else {
            debug!("get_all called with no cursor attached");
            return Vec::new();
        };

        let saved = cursor.page_size();
        if max_page_size >= 1 {
            cursor.set_page_size(max_page_size);
        }

        let outcome = drain(cursor).await;

        cursor.set_page_size(saved);

        match outcome {
            Ok(all) => {
                debug!(count = all.len(), "get_all completed");
                all
            }
            Err(error) => {
                self.notify(TraversalOp::GetAll, error);
                Vec::new()
            }
        }
    }

    // ========================================================================
    // Delegated operations
    // ========================================================================

    /// Direct, server-side single-item lookup via the attached data source.
    ///
    /// Fails with [`Error::InvalidArgument`] when `params` is empty and with
    /// [`Error::Unsupported`] when no data source is attached. Faults from
    /// the data source propagate directly.
    pub async fn get(&self, params: &SearchParams) -> Result<Option<T>> {
        if params.is_empty() {
            return Err(Error::invalid_argument("params"));
        }
        match &self.source {
            Some(source) => source.get(params).await,
            None => Err(Error::unsupported("get")),
        }
    }

    /// Update one record on the remote data source; takes effect immediately
    pub async fn update(&self, record: &T) -> Result<()> {
        match &self.source {
            Some(source) => source.update(record).await,
            None => Err(Error::unsupported("update")),
        }
    }

    /// Delete one record on the remote data source
    pub async fn delete(&self, record: &T) -> Result<()> {
        match &self.source {
            Some(source) => source.delete(record).await,
            None => Err(Error::unsupported("delete")),
        }
    }

    /// Delete every record matching the predicate; returns the count deleted
    pub async fn delete_all<F>(&self, predicate: F) -> Result<u64>
    where
        F: Fn(&T) -> bool + Send + Sync,
    {
        match &self.source {
            Some(source) => source.delete_all(&predicate).await,
            None => Err(Error::unsupported("delete_all")),
        }
    }
}

impl<T: Send + Sync> std::fmt::Debug for Repository<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repository")
            .field("max_page_size", &self.max_page_size)
            .field("page_size", &self.page_size)
            .field("has_cursor", &self.cursor.is_some())
            .field("has_source", &self.source.is_some())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

/// Greedy-cursor search loop: read current, test, then attempt advance
async fn search<T, F>(cursor: &mut dyn RecordCursor<T>, predicate: &mut F) -> Result<Option<T>>
where
    T: Clone,
    F: FnMut(&T) -> Result<bool>,
{
    loop {
        match cursor.current() {
            Some(record) => {
                if predicate(record)? {
                    return Ok(Some(record.clone()));
                }
            }
            None => return Ok(None),
        }
        if !cursor.advance().await? {
            return Ok(None);
        }
    }
}

/// Greedy-cursor materialization loop
async fn drain<T>(cursor: &mut dyn RecordCursor<T>) -> Result<Vec<T>>
where
    T: Clone,
{
    let mut all = Vec::new();
    loop {
        match cursor.current() {
            Some(record) => all.push(record.clone()),
            None => return Ok(all),
        }
        if !cursor.advance().await? {
            return Ok(all);
        }
    }
}
