//! Adapter from a single-page query plus a paginator to a `PageFetcher`

use super::types::{Page, PaginationState, Paginator};
use crate::error::Error;
use crate::pager::PageFetcher;
use crate::params::Params;
use tracing::debug;

/// Page fetcher built from a one-page query and a pagination strategy
///
/// The query sees the current parameters and returns one `Page`. After each
/// page the paginator rewrites the parameters for the next request. Once the
/// paginator reports the last page, further fetches return an empty page
/// without calling the query, which ends iteration.
///
/// Seeding the first request can fail when the caller preset a paging
/// parameter the paginator cannot read. That error is converted into the
/// query's error type and returned from the first fetch.
#[derive(Debug)]
pub struct Paginated<Q, P> {
    query: Q,
    paginator: P,
    state: PaginationState,
    started: bool,
}

impl<Q, P: Paginator> Paginated<Q, P> {
    /// Create a fetcher from a paginator and a query
    pub fn new(paginator: P, query: Q) -> Self {
        Self::with_state(paginator, PaginationState::new(), query)
    }

    /// Create a fetcher resuming from a saved pagination state
    pub fn with_state(paginator: P, state: PaginationState, query: Q) -> Self {
        Self {
            query,
            paginator,
            state,
            started: false,
        }
    }

    /// Pagination progress so far
    pub fn state(&self) -> &PaginationState {
        &self.state
    }
}

impl<T, E, Q, P> PageFetcher<T> for Paginated<Q, P>
where
    Q: FnMut(&Params) -> Result<Page<T>, E>,
    P: Paginator,
    E: From<Error>,
{
    type Error = E;

    fn fetch(&mut self, params: &mut Params) -> Result<Vec<T>, E> {
        if self.state.done {
            return Ok(Vec::new());
        }
        if !self.started {
            self.started = true;
            if let Err(err) = self.paginator.start(&mut self.state, params) {
                self.state.done = true;
                return Err(err.into());
            }
        }

        let page = (self.query)(&*params)?;
        let next = self
            .paginator
            .process_page(&page.meta(), &mut self.state, params);
        if next.is_done() {
            debug!(
                total_fetched = self.state.total_fetched,
                "pagination complete"
            );
        }
        Ok(page.items)
    }
}
