use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_SIZE: u64 = 10;
pub const MAX_PAGE_SIZE: u64 = 1000;

/// Page request as sent by the client. Values are clamped before use, so
/// out-of-range numbers are accepted here.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationConfig {
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_page_size")]
    pub page_size: i64,
}

fn default_page() -> i64 {
    1
}

fn default_page_size() -> i64 {
    DEFAULT_PAGE_SIZE as i64
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            page: default_page(),
            page_size: default_page_size(),
        }
    }
}

impl PaginationConfig {
    pub fn new(page: i64, page_size: i64) -> Self {
        Self { page, page_size }
    }

    /// Clamp into a usable request: `page >= 1`, `1 <= page_size <= max_page_size`.
    pub fn clamp(&self, max_page_size: u64) -> PageRequest {
        let max = max_page_size.max(1);
        let page = u64::try_from(self.page).unwrap_or(0).max(1);
        let page_size = u64::try_from(self.page_size).unwrap_or(0).clamp(1, max);
        PageRequest { page, page_size }
    }
}

/// Clamped page request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub page_size: u64,
}

/// Pagination metadata for one page of a result set.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageMeta {
    pub offset: u64,
    pub limit: u64,
    pub total: u64,
    /// 1-based position of the first row on this page, 0 when nothing matched.
    pub inicio: u64,
    /// 1-based position of the last row on this page.
    pub fin: u64,
    pub total_pages: u64,
    pub has_next_page: bool,
    pub has_prev_page: bool,
    pub current_page: u64,
}

/// Derive offset/limit and envelope bounds from a total and a page request.
///
/// Pure arithmetic. A page past the end yields `inicio > fin` rather than an error.
/// `has_prev_page` is `page > 1` even for an empty result set, matching the
/// per-field rule rather than treating "no rows" as "no previous page"; a client
/// that asked for page 3 can still navigate back.
pub fn paginate(total: u64, page: u64, page_size: u64) -> PageMeta {
    let page = page.max(1);
    let page_size = page_size.max(1);

    let offset = page.saturating_sub(1).saturating_mul(page_size);
    let total_pages = total.div_ceil(page_size).max(1);
    let inicio = if total > 0 { offset.saturating_add(1) } else { 0 };
    let fin = offset.saturating_add(page_size).min(total);

    PageMeta {
        offset,
        limit: page_size,
        total,
        inicio,
        fin,
        total_pages,
        has_next_page: page < total_pages,
        has_prev_page: page > 1,
        current_page: page,
    }
}
