use serde::{Deserialize, Serialize};

use crate::filter::FilterNode;
use crate::page::{PageMeta, PaginationConfig};
use crate::sort::SortSpec;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ListRequest {
    #[serde(rename = "where", default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<FilterNode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<SortSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<PaginationConfig>,
    /// Free-text term matched against the service's search fields.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

impl ListRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(mut self, filter: FilterNode) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn sort(mut self, sort: SortSpec) -> Self {
        self.sort = Some(sort);
        self
    }

    pub fn page(mut self, page: i64, page_size: i64) -> Self {
        self.pagination = Some(PaginationConfig::new(page, page_size));
        self
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }
}

/// Paginated list envelope.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListResponse<T> {
    pub data: Vec<T>,
    pub total: u64,
    pub inicio: u64,
    pub fin: u64,
    pub total_pages: u64,
    pub has_next_page: bool,
    pub has_prev_page: bool,
    pub current_page: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub applied_sort: Option<SortSpec>,
}

impl<T> ListResponse<T> {
    pub fn new(data: Vec<T>, meta: PageMeta, applied_sort: Option<SortSpec>) -> Self {
        Self {
            data,
            total: meta.total,
            inicio: meta.inicio,
            fin: meta.fin,
            total_pages: meta.total_pages,
            has_next_page: meta.has_next_page,
            has_prev_page: meta.has_prev_page,
            current_page: meta.current_page,
            applied_sort,
        }
    }

    /// Map items while preserving pagination metadata; stops at the first error.
    pub fn try_map_items<U, Err>(
        self,
        f: impl FnMut(T) -> Result<U, Err>,
    ) -> Result<ListResponse<U>, Err> {
        let data = self.data.into_iter().map(f).collect::<Result<Vec<U>, Err>>()?;
        Ok(ListResponse {
            data,
            total: self.total,
            inicio: self.inicio,
            fin: self.fin,
            total_pages: self.total_pages,
            has_next_page: self.has_next_page,
            has_prev_page: self.has_prev_page,
            current_page: self.current_page,
            applied_sort: self.applied_sort,
        })
    }
}
