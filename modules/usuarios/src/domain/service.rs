use std::sync::Arc;

use query_core::{
    BreakdownResponse, FilterNode, ListRequest, ListResponse, SummaryRequest, SummaryResponse,
};
use tracing::{debug, instrument, warn};

use crate::contract::model::Usuario;
use crate::domain::error::DomainError;
use crate::domain::repo::UsuariosRepository;

/// Read-side domain service for usuarios.
/// Depends only on the repository port, not on infra types.
#[derive(Clone)]
pub struct Service {
    repo: Arc<dyn UsuariosRepository>,
}

impl Service {
    /// Create a service with dependencies.
    pub fn new(repo: Arc<dyn UsuariosRepository>) -> Self {
        Self { repo }
    }

    #[instrument(name = "usuarios.service.list_usuarios", skip(self, req))]
    pub async fn list_usuarios(
        &self,
        req: &ListRequest,
    ) -> Result<ListResponse<Usuario>, DomainError> {
        debug!("Listing usuarios");
        let page = self.repo.list(req).await.map_err(log_failure)?;
        debug!(
            rows = page.data.len(),
            total = page.total,
            "Listed usuarios page"
        );
        Ok(page)
    }

    #[instrument(
        name = "usuarios.service.summarize_usuarios",
        skip(self, req),
        fields(group_by = %req.group_by)
    )]
    pub async fn summarize_usuarios(
        &self,
        req: &SummaryRequest,
    ) -> Result<SummaryResponse, DomainError> {
        debug!("Summarizing usuarios");
        let summary = self.repo.summarize(req).await.map_err(log_failure)?;
        debug!(groups = summary.groups.len(), total = summary.total, "Summarized usuarios");
        Ok(summary)
    }

    #[instrument(
        name = "usuarios.service.breakdown_usuarios",
        skip(self, group_by, filter),
        fields(group_by = %group_by)
    )]
    pub async fn breakdown_usuarios(
        &self,
        group_by: &str,
        filter: Option<&FilterNode>,
        order_by_count: bool,
    ) -> Result<BreakdownResponse, DomainError> {
        debug!("Breaking down usuarios");
        let breakdown = self
            .repo
            .breakdown(group_by, filter, order_by_count)
            .await
            .map_err(log_failure)?;
        Ok(breakdown)
    }
}

fn log_failure(err: query_core::QueryError) -> DomainError {
    if err.is_client_error() {
        debug!(code = err.code(), "Rejected usuarios query: {}", err);
    } else {
        warn!(code = err.code(), "Usuarios query failed: {}", err);
    }
    err.into()
}
