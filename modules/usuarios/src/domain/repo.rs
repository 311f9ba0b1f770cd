use async_trait::async_trait;
use query_core::{
    BreakdownResponse, FilterNode, ListRequest, ListResponse, QueryResult, SummaryRequest,
    SummaryResponse,
};

use crate::contract::model::Usuario;

/// Port for the domain layer: the read queries the domain needs.
/// Object-safe and async-friendly via `async_trait`.
#[async_trait]
pub trait UsuariosRepository: Send + Sync {
    /// One page of usuarios; credentials are never part of the rows.
    async fn list(&self, req: &ListRequest) -> QueryResult<ListResponse<Usuario>>;
    /// Total plus per-group counts.
    async fn summarize(&self, req: &SummaryRequest) -> QueryResult<SummaryResponse>;
    /// Per-group counts with percentages.
    async fn breakdown(
        &self,
        group_by: &str,
        filter: Option<&FilterNode>,
        order_by_count: bool,
    ) -> QueryResult<BreakdownResponse>;
}
