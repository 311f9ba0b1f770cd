//! Storage-independent model for declarative list and summary queries.
//!
//! Requests carry a recursive [`FilterNode`], an ordered [`SortSpec`] and a
//! [`PaginationConfig`]; responses are the paginated [`ListResponse`] envelope and the
//! grouped [`SummaryResponse`]. Compilation against a concrete store lives in
//! `query-db`; this crate only describes, validates and does the page arithmetic.

pub mod error;
pub mod filter;
pub mod list;
pub mod page;
pub mod sort;
pub mod summary;

pub use error::{QueryError, QueryResult};
pub use filter::{
    BooleanFilter, DateFilter, EnumFilter, FieldFilter, FilterKind, FilterNode, NumberFilter,
    RawFilter, StringFilter, Timestamp,
};
pub use list::{ListRequest, ListResponse};
pub use page::{paginate, PageMeta, PageRequest, PaginationConfig, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
pub use sort::{SortColumn, SortDirection, SortSpec, MAX_SORT_COLUMNS};
pub use summary::{
    BreakdownItem, BreakdownResponse, DateRange, SummaryItem, SummaryRequest, SummaryResponse,
    DEFAULT_DATE_FIELD, UNCLASSIFIED_LABEL, UNDEFINED_LABEL,
};
