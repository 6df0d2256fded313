//! Declarative pager settings
//!
//! `PagerConfig` and `PaginationConfig` are plain serde types. They hold no
//! file format of their own: an application embeds them in whatever
//! configuration it already deserializes, calls `validate`, and then builds
//! the paginator and first-request parameters from them.

use crate::error::{Error, Result};
use crate::pagination::{
    CursorPaginator, NoPaginator, OffsetPaginator, PageNumberPaginator, Paginator, StopCondition,
};
use crate::params::Params;
use serde::{Deserialize, Serialize};

// ============================================================================
// Pager Config
// ============================================================================

/// Pagination strategy plus the parameters every request carries
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PagerConfig {
    #[serde(default)]
    pub pagination: PaginationConfig,

    /// Base parameters for the first request
    #[serde(default)]
    pub params: Params,
}

impl PagerConfig {
    /// Check for settings that can never paginate correctly
    pub fn validate(&self) -> Result<()> {
        self.pagination.validate()
    }

    pub fn paginator(&self) -> Box<dyn Paginator> {
        self.pagination.build()
    }

    /// Parameters for the first request
    pub fn initial_params(&self) -> Params {
        self.params.clone()
    }
}

// ============================================================================
// Pagination Config
// ============================================================================

/// Pagination configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PaginationConfig {
    /// No pagination
    #[default]
    None,
    /// Offset-based pagination
    Offset {
        /// Offset parameter name
        #[serde(default = "default_offset_param")]
        offset_param: String,
        /// Limit parameter name
        #[serde(default = "default_limit_param")]
        limit_param: String,
        /// Page size
        limit: u32,
        /// Stop condition
        #[serde(default)]
        stop: StopCondition,
    },
    /// Page number pagination
    PageNumber {
        /// Page parameter name
        #[serde(default = "default_page_param")]
        page_param: String,
        /// Start page (usually 0 or 1)
        #[serde(default = "default_start_page")]
        start_page: u32,
        /// Page size parameter name
        #[serde(default)]
        page_size_param: Option<String>,
        /// Page size
        #[serde(default)]
        page_size: Option<u32>,
        /// Stop condition
        #[serde(default)]
        stop: StopCondition,
    },
    /// Cursor-based pagination
    Cursor {
        /// Cursor parameter name
        cursor_param: String,
        /// Stop condition
        #[serde(default)]
        stop: StopCondition,
    },
}

fn default_offset_param() -> String {
    "offset".to_string()
}

fn default_limit_param() -> String {
    "limit".to_string()
}

fn default_page_param() -> String {
    "page".to_string()
}

fn default_start_page() -> u32 {
    1
}

impl PaginationConfig {
    /// Validate parameter names and sizes
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::None => Ok(()),
            Self::Offset {
                offset_param,
                limit_param,
                limit,
                ..
            } => {
                require_name("offset_param", offset_param)?;
                require_name("limit_param", limit_param)?;
                require_positive("limit", *limit)
            }
            Self::PageNumber {
                page_param,
                page_size_param,
                page_size,
                ..
            } => {
                require_name("page_param", page_param)?;
                match (page_size_param, page_size) {
                    (Some(param), Some(size)) => {
                        require_name("page_size_param", param)?;
                        require_positive("page_size", *size)
                    }
                    (None, None) => Ok(()),
                    _ => Err(Error::invalid_value(
                        "page_size",
                        "page_size and page_size_param must be set together",
                    )),
                }
            }
            Self::Cursor { cursor_param, .. } => require_name("cursor_param", cursor_param),
        }
    }

    /// Build the paginator for this config
    pub fn build(&self) -> Box<dyn Paginator> {
        match self {
            Self::None => Box::new(NoPaginator),
            Self::Offset {
                offset_param,
                limit_param,
                limit,
                stop,
            } => Box::new(
                OffsetPaginator::new(offset_param, limit_param, *limit)
                    .with_stop_condition(stop.clone()),
            ),
            Self::PageNumber {
                page_param,
                start_page,
                page_size_param,
                page_size,
                stop,
            } => {
                let mut paginator = PageNumberPaginator::new(page_param, *start_page)
                    .with_stop_condition(stop.clone());
                if let (Some(param), Some(size)) = (page_size_param, page_size) {
                    paginator = paginator.with_page_size(param, *size);
                }
                Box::new(paginator)
            }
            Self::Cursor { cursor_param, stop } => {
                Box::new(CursorPaginator::new(cursor_param).with_stop_condition(stop.clone()))
            }
        }
    }
}

fn require_name(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::invalid_value(field, "must not be empty"));
    }
    Ok(())
}

fn require_positive(field: &str, value: u32) -> Result<()> {
    if value == 0 {
        return Err(Error::invalid_value(field, "must be greater than zero"));
    }
    Ok(())
}
