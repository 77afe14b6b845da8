//! Cursor module
//!
//! The greedy-cursor contract over a remote, paginated data set.
//!
//! # Overview
//!
//! A [`RecordCursor`] exposes the element under the cursor, a mutable page
//! size, and a step-forward operation that fetches the next remote page when
//! the current one is exhausted. There is deliberately no "has next" probe:
//! discovering whether more elements exist requires attempting to advance,
//! which shapes every traversal the repository engine runs.

mod memory;
mod types;

pub use memory::MemoryCursor;
pub use types::RecordCursor;
