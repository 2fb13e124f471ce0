//! Pagination module
//!
//! Resumable iteration over collections split across pages.
//!
//! # Overview
//!
//! A `PageIterator` is built from the first page of a collection and a
//! callback. Each `iterate()` / `resume()` call feeds items to the callback in
//! order and follows `@odata.nextLink` until the callback pauses or no pages
//! remain. The iterator tracks its position, so a paused walk continues at the
//! item after the pause.

mod iterator;
mod types;

pub use iterator::PageIterator;
pub use types::{CallbackResult, IterationSignal, IteratorState};
