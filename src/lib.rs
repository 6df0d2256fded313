//! # pagewalk
//!
//! A lazy, page-buffering iterator for walking the results of paginated
//! list queries without loading the whole result set into memory.
//!
//! ## Features
//!
//! - **Pull-based paging**: one page in memory, next page fetched on demand
//! - **Injected fetch**: any closure or type that returns one page per call
//! - **Sticky errors**: a failed fetch stops iteration; inspect it afterwards
//! - **Pagination strategies**: offset, page number and cursor helpers that
//!   rewrite request parameters between pages
//! - **Serde config**: describe an endpoint's pagination declaratively inside
//!   an application's own configuration
//!
//! ## Quick Start
//!
//! ```rust
//! use pagewalk::pagination::{OffsetPaginator, Page, Paginated};
//! use pagewalk::{PagedIter, Params};
//!
//! let rows: Vec<u32> = (0..10).collect();
//! let fetcher = Paginated::new(
//!     OffsetPaginator::new("offset", "limit", 4),
//!     |params: &Params| -> pagewalk::Result<Page<u32>> {
//!         let offset = params.get_parsed::<usize>("offset")?.unwrap_or(0);
//!         let limit = params.get_parsed::<usize>("limit")?.unwrap_or(4);
//!         Ok(Page::new(rows.iter().skip(offset).take(limit).copied().collect()))
//!     },
//! );
//!
//! let mut iter = PagedIter::new(Params::new(), fetcher);
//! let mut total = 0;
//! while iter.advance() {
//!     total += iter.current().copied().unwrap_or_default();
//! }
//! assert!(iter.last_error().is_none());
//! assert_eq!(total, 45);
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                 PagedIter<T, F>                      │
//! │  advance() → bool   current()   last_error()         │
//! │  remaining_in_page()            Iterator<Item = T>   │
//! └──────────────────────────┬───────────────────────────┘
//!                            │ fetch(&mut Params)
//! ┌──────────────────────────┴───────────────────────────┐
//! │        PageFetcher<T>  (closure or Paginated)        │
//! ├──────────────┬──────────────┬────────────────────────┤
//! │   Offset     │ Page Number  │ Cursor                 │
//! └──────────────┴──────────────┴────────────────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the crate
pub mod error;

/// Common types and type aliases
pub mod types;

/// Request parameters passed to page fetches
pub mod params;

/// The paged iterator
pub mod pager;

/// Pagination strategies
pub mod pagination;

/// Declarative pager settings
pub mod config;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

pub use config::{PagerConfig, PaginationConfig};
pub use pager::{BoxFetcher, PageFetcher, PagedIter};
pub use params::Params;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
