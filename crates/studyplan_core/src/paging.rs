//! Page/limit arithmetic for list queries.
//!
//! # Responsibility
//! - Turn `page`/`limit` into `skip`/`take` plus page-count metadata.
//! - Parse the `page`/`limit` query parameters of list requests.
//!
//! # Invariants
//! - `limit` is always >= 1 once a `PageRequest` exists.
//! - `total_pages = ceil(total / limit)`.
//! - `page` is never clamped to the last page; past-the-end pages are empty.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::num::NonZeroU32;

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_LIMIT: u32 = 10;

/// Rejected pagination input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaginationError {
    InvalidArgument(String),
}

impl Display for PaginationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidArgument(message) => write!(f, "invalid pagination argument: {message}"),
        }
    }
}

impl Error for PaginationError {}

/// Offset window for one page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub skip: u64,
    pub take: u32,
    pub total_pages: u64,
}

impl Pagination {
    fn compute(total: u64, page: NonZeroU32, limit: NonZeroU32) -> Self {
        let limit_wide = u64::from(limit.get());
        Self {
            skip: u64::from(page.get() - 1) * limit_wide,
            take: limit.get(),
            total_pages: total.div_ceil(limit_wide),
        }
    }
}

/// Computes `skip`, `take` and `total_pages`.
///
/// # Errors
/// - `InvalidArgument` when `page` or `limit` is zero.
pub fn paginate(total: u64, page: u32, limit: u32) -> Result<Pagination, PaginationError> {
    let request = PageRequest::new(page, limit)?;
    Ok(request.window(total))
}

/// Validated page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: NonZeroU32,
    limit: NonZeroU32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: NonZeroU32::MIN,
            limit: NonZeroU32::new(DEFAULT_LIMIT).unwrap_or(NonZeroU32::MIN),
        }
    }
}

impl PageRequest {
    pub fn new(page: u32, limit: u32) -> Result<Self, PaginationError> {
        let limit = NonZeroU32::new(limit).ok_or_else(|| {
            PaginationError::InvalidArgument("limit must be a positive integer, got 0".to_string())
        })?;
        let page = NonZeroU32::new(page).ok_or_else(|| {
            PaginationError::InvalidArgument("page must be a positive integer, got 0".to_string())
        })?;
        Ok(Self { page, limit })
    }

    /// Parses raw `page`/`limit` query parameters.
    ///
    /// - `page`: absent, blank, non-numeric or `0` falls back to 1; negative
    ///   values are rejected.
    /// - `limit`: absent or blank falls back to 10; non-numeric or `0` is
    ///   rejected.
    pub fn from_query(page: Option<&str>, limit: Option<&str>) -> Result<Self, PaginationError> {
        let page = parse_page(page)?;
        let limit = parse_limit(limit)?;
        Self::new(page, limit)
    }

    pub fn page(&self) -> u32 {
        self.page.get()
    }

    pub fn limit(&self) -> u32 {
        self.limit.get()
    }

    /// Window of this page inside a collection of `total` rows.
    pub fn window(&self, total: u64) -> Pagination {
        Pagination::compute(total, self.page, self.limit)
    }
}

fn parse_page(raw: Option<&str>) -> Result<u32, PaginationError> {
    let Some(value) = raw.map(str::trim).filter(|value| !value.is_empty()) else {
        return Ok(DEFAULT_PAGE);
    };
    match value.parse::<i64>() {
        Ok(0) | Err(_) => Ok(DEFAULT_PAGE),
        Ok(number) if number < 0 => Err(PaginationError::InvalidArgument(format!(
            "page must be a positive integer, got `{value}`"
        ))),
        Ok(number) => u32::try_from(number).map_err(|_| {
            PaginationError::InvalidArgument(format!("page `{value}` is out of range"))
        }),
    }
}

fn parse_limit(raw: Option<&str>) -> Result<u32, PaginationError> {
    let Some(value) = raw.map(str::trim).filter(|value| !value.is_empty()) else {
        return Ok(DEFAULT_LIMIT);
    };
    match value.parse::<u32>() {
        Ok(0) | Err(_) => Err(PaginationError::InvalidArgument(format!(
            "limit must be a positive integer, got `{value}`"
        ))),
        Ok(number) => Ok(number),
    }
}

/// Page metadata carried next to list data as `extraInfo`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub total: u64,
    pub total_pages: u64,
    pub page: u32,
    pub limit: u32,
}

/// One page of items. Serializes as `{ "data": [...], "extraInfo": {...} }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageResult<T> {
    #[serde(rename = "data")]
    pub items: Vec<T>,
    #[serde(rename = "extraInfo")]
    pub info: PageInfo,
}

impl<T> PageResult<T> {
    pub fn new(items: Vec<T>, total: u64, request: PageRequest) -> Self {
        let window = request.window(total);
        Self {
            items,
            info: PageInfo {
                total,
                total_pages: window.total_pages,
                page: request.page(),
                limit: request.limit(),
            },
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PageResult<U> {
        PageResult {
            items: self.items.into_iter().map(f).collect(),
            info: self.info,
        }
    }
}
