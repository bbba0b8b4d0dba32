//! Page selection and derived pagination metadata for report queries.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use ts_rs::TS;

/// Largest page size a client may request.
pub const MAX_PAGE_SIZE: u32 = 100;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PaginationError {
    #[error("Page must be greater than 0")]
    Page,

    #[error("Limit must be between 1 and 100")]
    Limit,

    #[error("Sort must be either \"asc\" or \"desc\"")]
    Sort,
}

/// Direction over report creation time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn as_sql(self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

impl FromStr for SortOrder {
    type Err = PaginationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            _ => Err(PaginationError::Sort),
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortOrder::Asc => f.write_str("asc"),
            SortOrder::Desc => f.write_str("desc"),
        }
    }
}

/// A validated page window. `page` is 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub limit: u32,
    pub sort: SortOrder,
}

impl PageRequest {
    pub fn new(page: u64, limit: u32, sort: SortOrder) -> Result<Self, PaginationError> {
        if page < 1 {
            return Err(PaginationError::Page);
        }
        if !(1..=MAX_PAGE_SIZE).contains(&limit) {
            return Err(PaginationError::Limit);
        }
        Ok(Self { page, limit, sort })
    }

    /// Validate raw query-string values. Absent or empty values take their
    /// defaults (page 1, `default_limit`, descending).
    pub fn parse(
        page: Option<&str>,
        limit: Option<&str>,
        sort: Option<&str>,
        default_limit: u32,
    ) -> Result<Self, PaginationError> {
        let page = match non_empty(page) {
            None => 1,
            Some(raw) => raw
                .parse::<i64>()
                .ok()
                .filter(|p| *p >= 1)
                .ok_or(PaginationError::Page)? as u64,
        };

        let limit = match non_empty(limit) {
            None => default_limit,
            Some(raw) => raw
                .parse::<i64>()
                .ok()
                .filter(|l| (1..=i64::from(MAX_PAGE_SIZE)).contains(l))
                .ok_or(PaginationError::Limit)? as u32,
        };

        let sort = match non_empty(sort) {
            None => SortOrder::default(),
            Some(raw) => raw.parse()?,
        };

        Self::new(page, limit, sort)
    }

    /// Number of rows that precede this page.
    pub fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(u64::from(self.limit))
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Metadata returned alongside a page of results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Pagination {
    pub page: u64,
    pub limit: u32,
    pub total_count: u64,
    pub total_pages: u64,
    pub has_next_page: bool,
    pub has_prev_page: bool,
}

impl Pagination {
    /// Derive the metadata for `request` given the total number of matches.
    /// A page past the end is reported as-is, not clamped.
    pub fn new(request: &PageRequest, total_count: u64) -> Self {
        let total_pages = total_count.div_ceil(u64::from(request.limit));
        Self {
            page: request.page,
            limit: request.limit,
            total_count,
            total_pages,
            has_next_page: request.page < total_pages,
            has_prev_page: request.page > 1,
        }
    }
}
