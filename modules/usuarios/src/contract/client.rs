use async_trait::async_trait;
use query_core::{BreakdownResponse, FilterNode, ListRequest, ListResponse, SummaryRequest, SummaryResponse};

use crate::contract::model::Usuario;

/// Public API trait for the usuarios module that other modules can use
#[async_trait]
pub trait UsuariosApi: Send + Sync {
    /// One page of usuarios matching the request.
    async fn list_usuarios(&self, req: ListRequest) -> anyhow::Result<ListResponse<Usuario>>;

    /// Counts of usuarios grouped by one allowed column.
    async fn summarize_usuarios(&self, req: SummaryRequest) -> anyhow::Result<SummaryResponse>;

    /// Share of usuarios per value of one allowed column.
    async fn breakdown_usuarios(
        &self,
        group_by: String,
        filter: Option<FilterNode>,
        order_by_count: bool,
    ) -> anyhow::Result<BreakdownResponse>;
}
