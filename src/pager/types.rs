//! Pager types and traits
//!
//! Defines the fetch capability injected into the iterator and the buffer
//! state it walks.

use crate::params::Params;
use std::collections::VecDeque;

/// Capability that retrieves one page of items
///
/// `fetch` may rewrite `params` in place to encode the cursor or offset of
/// the *next* page. Returning an empty page with no error signals the
/// end of the data; returning an error stops iteration for good.
pub trait PageFetcher<T> {
    /// Error reported by a failed fetch, handed to the caller unmodified
    type Error;

    /// Fetch the page described by `params`
    fn fetch(&mut self, params: &mut Params) -> Result<Vec<T>, Self::Error>;
}

impl<T, E, F> PageFetcher<T> for F
where
    F: FnMut(&mut Params) -> Result<Vec<T>, E>,
{
    type Error = E;

    fn fetch(&mut self, params: &mut Params) -> Result<Vec<T>, E> {
        self(params)
    }
}

/// Type-erased fetcher, for storing iterators over differing fetchers
///
/// Closures, `Paginated` adapters and custom fetchers all box into it.
pub type BoxFetcher<'a, T, E> = Box<dyn PageFetcher<T, Error = E> + 'a>;

// Only the boxed trait object is covered. A blanket impl over `Box<P>` would
// overlap the closure impl above, since a boxed closure is itself `FnMut`.
impl<T, E> PageFetcher<T> for BoxFetcher<'_, T, E> {
    type Error = E;

    fn fetch(&mut self, params: &mut Params) -> Result<Vec<T>, E> {
        (**self).fetch(params)
    }
}

/// Items not yet yielded from the most recent page
#[derive(Debug, Clone)]
pub(crate) enum Buffer<T> {
    /// Iteration can continue; an empty queue means a fetch is due
    Pending(VecDeque<T>),
    /// Iteration has permanently stopped
    Stopped,
}

impl<T> Buffer<T> {
    pub(crate) fn len(&self) -> usize {
        match self {
            Self::Pending(items) => items.len(),
            Self::Stopped => 0,
        }
    }
}
