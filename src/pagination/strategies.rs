//! Built-in paginators
//!
//! Each one owns a few parameter names and rewrites their values in the
//! shared `Params` after every page.

use super::types::{NextPage, PageMeta, PaginationState, Paginator, StopCondition};
use crate::error::Result;
use crate::params::Params;
use tracing::{trace, warn};

/// Read a numeric paging value the caller may have preset
fn preset_number(params: &Params, key: &str) -> Result<Option<u32>> {
    params.get_parsed::<u32>(key).inspect_err(|e| {
        warn!(param = key, error = %e, "unusable paging value in request params");
    })
}

// ============================================================================
// Cursor
// ============================================================================

/// Follows the opaque cursor each page reports, e.g. `?starting_after=obj_9`
#[derive(Debug, Clone)]
pub struct CursorPaginator {
    /// Parameter that carries the cursor
    pub cursor_param: String,
    pub stop_condition: StopCondition,
}

impl CursorPaginator {
    pub fn new(cursor_param: impl Into<String>) -> Self {
        Self {
            cursor_param: cursor_param.into(),
            stop_condition: StopCondition::default(),
        }
    }

    #[must_use]
    pub fn with_stop_condition(mut self, condition: StopCondition) -> Self {
        self.stop_condition = condition;
        self
    }
}

impl Paginator for CursorPaginator {
    fn start(&self, state: &mut PaginationState, params: &mut Params) -> Result<()> {
        if let Some(preset) = params.get(&self.cursor_param) {
            state.cursor = Some(preset.to_string());
        } else if let Some(saved) = &state.cursor {
            params.set(&self.cursor_param, saved.as_str());
        }
        Ok(())
    }

    fn process_page(
        &self,
        page: &PageMeta<'_>,
        state: &mut PaginationState,
        params: &mut Params,
    ) -> NextPage {
        if state.record_page(page, &self.stop_condition) {
            return NextPage::Done;
        }

        // a missing or blank cursor marks the tail of the collection
        let Some(cursor) = page.next_cursor.filter(|c| !c.is_empty()) else {
            return state.finish();
        };
        trace!(param = %self.cursor_param, cursor, "moving cursor");
        params.set(&self.cursor_param, cursor);
        state.cursor = Some(cursor.to_string());
        NextPage::Continue
    }
}

// ============================================================================
// Offset
// ============================================================================

/// Steps a record offset by a fixed window, e.g. `?offset=40&limit=20`
#[derive(Debug, Clone)]
pub struct OffsetPaginator {
    pub offset_param: String,
    pub limit_param: String,
    /// Window size, sent as `limit_param` and added to the offset per page
    pub limit_value: u32,
    pub stop_condition: StopCondition,
}

impl OffsetPaginator {
    pub fn new(
        offset_param: impl Into<String>,
        limit_param: impl Into<String>,
        limit_value: u32,
    ) -> Self {
        Self {
            offset_param: offset_param.into(),
            limit_param: limit_param.into(),
            limit_value,
            stop_condition: StopCondition::default(),
        }
    }

    #[must_use]
    pub fn with_stop_condition(mut self, condition: StopCondition) -> Self {
        self.stop_condition = condition;
        self
    }
}

impl Paginator for OffsetPaginator {
    fn start(&self, state: &mut PaginationState, params: &mut Params) -> Result<()> {
        match preset_number(params, &self.offset_param)? {
            Some(offset) => state.offset = offset,
            None => params.set(&self.offset_param, state.offset.to_string()),
        }
        params.set(&self.limit_param, self.limit_value.to_string());
        Ok(())
    }

    fn process_page(
        &self,
        page: &PageMeta<'_>,
        state: &mut PaginationState,
        params: &mut Params,
    ) -> NextPage {
        if state.record_page(page, &self.stop_condition) {
            return NextPage::Done;
        }
        // a short window is the tail
        if page.records_count < self.limit_value as usize {
            return state.finish();
        }

        let Some(offset) = state.offset.checked_add(self.limit_value) else {
            warn!(offset = state.offset, "offset would overflow, ending pagination");
            return state.finish();
        };
        state.offset = offset;
        trace!(param = %self.offset_param, offset, "moving offset");
        params.set(&self.offset_param, offset.to_string());
        NextPage::Continue
    }
}

// ============================================================================
// Page number
// ============================================================================

/// Counts pages up from `start_page`, e.g. `?page=3&per_page=50`
#[derive(Debug, Clone)]
pub struct PageNumberPaginator {
    pub page_param: String,
    /// Number of the first page, usually 0 or 1
    pub start_page: u32,
    pub page_size_param: Option<String>,
    /// When set, a page with fewer records is treated as the last
    pub page_size: Option<u32>,
    pub stop_condition: StopCondition,
}

impl PageNumberPaginator {
    pub fn new(page_param: impl Into<String>, start_page: u32) -> Self {
        Self {
            page_param: page_param.into(),
            start_page,
            page_size_param: None,
            page_size: None,
            stop_condition: StopCondition::default(),
        }
    }

    #[must_use]
    pub fn with_page_size(mut self, param: impl Into<String>, size: u32) -> Self {
        self.page_size_param = Some(param.into());
        self.page_size = Some(size);
        self
    }

    #[must_use]
    pub fn with_stop_condition(mut self, condition: StopCondition) -> Self {
        self.stop_condition = condition;
        self
    }
}

impl Paginator for PageNumberPaginator {
    fn start(&self, state: &mut PaginationState, params: &mut Params) -> Result<()> {
        state.page = preset_number(params, &self.page_param)?.unwrap_or(self.start_page);
        params.set(&self.page_param, state.page.to_string());
        if let (Some(param), Some(size)) = (&self.page_size_param, self.page_size) {
            params.set(param, size.to_string());
        }
        Ok(())
    }

    fn process_page(
        &self,
        page: &PageMeta<'_>,
        state: &mut PaginationState,
        params: &mut Params,
    ) -> NextPage {
        if state.record_page(page, &self.stop_condition) {
            return NextPage::Done;
        }
        if self
            .page_size
            .is_some_and(|size| page.records_count < size as usize)
        {
            return state.finish();
        }

        let Some(next) = state.page.checked_add(1) else {
            warn!(page = state.page, "page number would overflow, ending pagination");
            return state.finish();
        };
        state.page = next;
        trace!(param = %self.page_param, page = next, "moving page");
        params.set(&self.page_param, next.to_string());
        NextPage::Continue
    }
}

// ============================================================================
// Single page
// ============================================================================

/// For endpoints that return everything in one response
#[derive(Debug, Clone, Default)]
pub struct NoPaginator;

impl Paginator for NoPaginator {
    fn start(&self, _state: &mut PaginationState, _params: &mut Params) -> Result<()> {
        Ok(())
    }

    fn process_page(
        &self,
        page: &PageMeta<'_>,
        state: &mut PaginationState,
        _params: &mut Params,
    ) -> NextPage {
        state.total_fetched = state.total_fetched.saturating_add(page.records_count as u64);
        state.finish()
    }
}
