//! Paged iterator module
//!
//! Walks the results of a paginated list query one item at a time, holding at
//! most one page in memory.
//!
//! # Overview
//!
//! `PagedIter` fetches a page eagerly on construction, then serves items from
//! its buffer and calls its `PageFetcher` again only once the buffer runs dry.
//! A failed fetch or an empty page stops it for good; callers poll
//! `last_error` after `advance` returns false to tell the two apart.
//!
//! ```rust
//! use pagewalk::{PagedIter, Params};
//!
//! let mut pages = vec![vec![3, 4], vec![1, 2]];
//! let mut iter = PagedIter::new(Params::new(), move |_: &mut Params| {
//!     Ok::<_, pagewalk::Error>(pages.pop().unwrap_or_default())
//! });
//!
//! let mut seen = Vec::new();
//! while iter.advance() {
//!     seen.push(*iter.current().unwrap());
//! }
//! assert!(iter.last_error().is_none());
//! assert_eq!(seen, vec![1, 2, 3, 4]);
//! ```

mod types;

pub use types::{BoxFetcher, PageFetcher};

use crate::params::Params;
use std::collections::VecDeque;
use std::fmt;
use std::iter::FusedIterator;
use tracing::{debug, warn};
use types::Buffer;

/// Lazy, forward-only iterator over a paginated query
///
/// Not reentrant: one fetch runs at a time, and the type does no internal
/// synchronization.
pub struct PagedIter<T, F: PageFetcher<T>> {
    /// Item set by the last successful `advance`
    current: Option<T>,
    /// Error from the fetch that stopped iteration
    error: Option<F::Error>,
    /// Parameters handed to every fetch; only the fetcher edits them
    params: Params,
    /// Items left from the current page
    buffer: Buffer<T>,
    /// Absent for iterators created already failed
    fetcher: Option<F>,
    /// Number of fetch calls made so far
    pages_fetched: usize,
}

impl<T, F: PageFetcher<T>> PagedIter<T, F> {
    /// Create an iterator and fetch its first page immediately
    pub fn new(params: Params, fetcher: F) -> Self {
        let mut iter = Self {
            current: None,
            error: None,
            params,
            buffer: Buffer::Pending(VecDeque::new()),
            fetcher: Some(fetcher),
            pages_fetched: 0,
        };
        iter.fetch_page();
        iter
    }

    /// Create an iterator that has already failed with `error`
    ///
    /// Every `advance` returns false and no fetch ever happens, so setup
    /// failures reach the caller through the same `last_error` path as
    /// failures during iteration.
    pub fn failed(error: F::Error) -> Self {
        Self {
            current: None,
            error: Some(error),
            params: Params::new(),
            buffer: Buffer::Stopped,
            fetcher: None,
            pages_fetched: 0,
        }
    }

    /// Move to the next item, fetching a new page if the buffer is empty
    ///
    /// Returns false once iteration has stopped, either at the end of the
    /// data or because a fetch failed. Check `last_error` to tell which.
    pub fn advance(&mut self) -> bool {
        if matches!(&self.buffer, Buffer::Pending(items) if items.is_empty()) {
            self.fetch_page();
        }

        let next = match &mut self.buffer {
            Buffer::Pending(items) => items.pop_front(),
            Buffer::Stopped => return false,
        };

        match next {
            Some(item) => {
                self.current = Some(item);
                true
            }
            None => {
                self.buffer = Buffer::Stopped;
                false
            }
        }
    }

    /// Item yielded by the most recent successful `advance`
    pub fn current(&self) -> Option<&T> {
        self.current.as_ref()
    }

    /// Error that stopped iteration, if any
    ///
    /// Only meaningful after `advance` has returned false.
    pub fn last_error(&self) -> Option<&F::Error> {
        self.error.as_ref()
    }

    /// Items still buffered from the current page only
    ///
    /// This says nothing about pages not fetched yet.
    pub fn remaining_in_page(&self) -> usize {
        self.buffer.len()
    }

    /// Parameters as last left by the fetcher
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Number of fetch calls made so far
    pub fn pages_fetched(&self) -> usize {
        self.pages_fetched
    }

    /// True once iteration has permanently stopped
    pub fn is_done(&self) -> bool {
        matches!(self.buffer, Buffer::Stopped)
    }

    /// Consume the iterator, returning the error that stopped it
    pub fn into_error(self) -> Option<F::Error> {
        self.error
    }

    /// Drain every remaining item
    ///
    /// Items collected before a failed fetch are discarded with it.
    pub fn collect_all(mut self) -> Result<Vec<T>, F::Error> {
        let mut items = Vec::new();
        while self.advance() {
            if let Some(item) = self.current.take() {
                items.push(item);
            }
        }
        match self.error {
            Some(err) => Err(err),
            None => Ok(items),
        }
    }

    fn fetch_page(&mut self) {
        let Some(fetcher) = self.fetcher.as_mut() else {
            self.buffer = Buffer::Stopped;
            return;
        };

        self.pages_fetched += 1;
        match fetcher.fetch(&mut self.params) {
            Ok(items) if items.is_empty() => {
                debug!(page = self.pages_fetched, "empty page, end of data");
                self.error = None;
                self.buffer = Buffer::Stopped;
            }
            Ok(items) => {
                debug!(page = self.pages_fetched, items = items.len(), "fetched page");
                self.error = None;
                self.buffer = Buffer::Pending(items.into());
            }
            Err(err) => {
                warn!(page = self.pages_fetched, "page fetch failed, stopping iteration");
                self.error = Some(err);
                self.buffer = Buffer::Stopped;
            }
        }
    }
}

impl<T: Clone, F: PageFetcher<T>> Iterator for PagedIter<T, F> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if self.advance() {
            self.current.clone()
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.is_done() {
            (0, Some(0))
        } else {
            (self.remaining_in_page(), None)
        }
    }
}

impl<T: Clone, F: PageFetcher<T>> FusedIterator for PagedIter<T, F> {}

impl<T, F: PageFetcher<T>> fmt::Debug for PagedIter<T, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PagedIter")
            .field("params", &self.params)
            .field("remaining_in_page", &self.remaining_in_page())
            .field("pages_fetched", &self.pages_fetched)
            .field("failed", &self.error.is_some())
            .field("done", &self.is_done())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests;
