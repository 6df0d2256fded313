//! Pagination module
//!
//! Supports: Cursor, Offset, Page Number, None
//!
//! # Overview
//!
//! Building blocks for writing a `PageFetcher`. Each strategy reads the
//! metadata of the page just fetched and rewrites the request `Params` for
//! the next one. `Paginated` wires a strategy to a single-page query so the
//! result can be handed straight to `PagedIter`.

mod paginated;
mod strategies;
mod types;

pub use paginated::Paginated;
pub use strategies::{CursorPaginator, NoPaginator, OffsetPaginator, PageNumberPaginator};
pub use types::{NextPage, Page, PageMeta, PaginationState, Paginator, StopCondition};
