//! Page metadata, progress tracking and the `Paginator` trait

use crate::error::Result;
use crate::params::Params;
use serde::{Deserialize, Serialize};

/// One page as returned by a single-page query
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    /// Records on this page
    pub items: Vec<T>,
    /// Cursor pointing at the next page, if the service returned one
    pub next_cursor: Option<String>,
    /// Total number of records across all pages, if known
    pub total: Option<u64>,
    /// Whether the service says more pages follow
    pub has_more: Option<bool>,
}

impl<T> Page<T> {
    /// Wrap a batch of records with no metadata
    pub fn new(items: Vec<T>) -> Self {
        Self {
            items,
            next_cursor: None,
            total: None,
            has_more: None,
        }
    }

    /// Attach the cursor for the following page
    #[must_use]
    pub fn with_cursor(mut self, cursor: impl Into<String>) -> Self {
        self.next_cursor = Some(cursor.into());
        self
    }

    /// Attach the collection-wide record count
    #[must_use]
    pub fn with_total(mut self, total: u64) -> Self {
        self.total = Some(total);
        self
    }

    /// Attach the service's has-more flag
    #[must_use]
    pub fn with_has_more(mut self, has_more: bool) -> Self {
        self.has_more = Some(has_more);
        self
    }

    pub fn meta(&self) -> PageMeta<'_> {
        PageMeta {
            records_count: self.items.len(),
            next_cursor: self.next_cursor.as_deref(),
            total: self.total,
            has_more: self.has_more,
        }
    }
}

impl<T> From<Vec<T>> for Page<T> {
    fn from(items: Vec<T>) -> Self {
        Self::new(items)
    }
}

/// What a paginator sees of a page: counts and metadata, never the records
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageMeta<'a> {
    pub records_count: usize,
    pub next_cursor: Option<&'a str>,
    pub total: Option<u64>,
    pub has_more: Option<bool>,
}

/// Outcome of rewriting the parameters after a page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextPage {
    /// `Params` now describe the following page
    Continue,
    /// The page just processed was the last one
    Done,
}

impl NextPage {
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done)
    }
}

/// When a strategy should give up even though it could compute a next page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StopCondition {
    /// Only an empty page ends the walk
    #[default]
    EmptyPage,

    /// A page flagged `has_more: false` is the last one
    HasMore,

    /// The walk ends once the reported total has been fetched
    TotalCount,
}

impl StopCondition {
    /// Decide whether `page` ends the walk
    ///
    /// `progress.total_fetched` must already count the page's records. An
    /// empty page ends the walk under every condition.
    pub fn is_met(&self, page: &PageMeta<'_>, progress: &PaginationState) -> bool {
        if page.records_count == 0 {
            return true;
        }
        match self {
            Self::EmptyPage => false,
            Self::HasMore => page.has_more == Some(false),
            Self::TotalCount => page.total.is_some_and(|t| progress.total_fetched >= t),
        }
    }
}

/// Progress of a paged walk, kept by `Paginated` between fetches
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaginationState {
    /// Page number of the request in flight
    pub page: u32,
    /// Record offset of the request in flight
    pub offset: u32,
    /// Cursor sent with the request in flight
    pub cursor: Option<String>,
    /// Records received so far
    pub total_fetched: u64,
    /// Set once no further page should be requested
    pub done: bool,
}

impl PaginationState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count a page's records and report whether `stop` ends the walk here
    pub(crate) fn record_page(&mut self, page: &PageMeta<'_>, stop: &StopCondition) -> bool {
        self.total_fetched = self.total_fetched.saturating_add(page.records_count as u64);
        let stopped = stop.is_met(page, self);
        if stopped {
            self.done = true;
        }
        stopped
    }

    /// Mark the walk finished and return `NextPage::Done`
    pub(crate) fn finish(&mut self) -> NextPage {
        self.done = true;
        NextPage::Done
    }
}

/// Strategy that rewrites request parameters from one page to the next
///
/// Paginators are stateless; all progress lives in `PaginationState` and in
/// the `Params` they edit.
pub trait Paginator: Send + Sync {
    /// Seed first-page parameters
    ///
    /// Paging values the caller already put in `params` are taken as the
    /// starting point. A value that does not parse is an error rather than
    /// being replaced.
    fn start(&self, state: &mut PaginationState, params: &mut Params) -> Result<()>;

    /// Account for a fetched page and point `params` at the next one
    fn process_page(
        &self,
        page: &PageMeta<'_>,
        state: &mut PaginationState,
        params: &mut Params,
    ) -> NextPage;
}

impl<P: Paginator + ?Sized> Paginator for Box<P> {
    fn start(&self, state: &mut PaginationState, params: &mut Params) -> Result<()> {
        (**self).start(state, params)
    }

    fn process_page(
        &self,
        page: &PageMeta<'_>,
        state: &mut PaginationState,
        params: &mut Params,
    ) -> NextPage {
        (**self).process_page(page, state, params)
    }
}
