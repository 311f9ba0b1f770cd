use async_trait::async_trait;
use query_core::{
    BreakdownResponse, FilterNode, ListRequest, ListResponse, SummaryRequest, SummaryResponse,
};
use std::sync::Arc;

use crate::contract::{client::UsuariosApi, error::UsuariosError, model::Usuario};
use crate::domain::{error::DomainError, service::Service};

/// Local implementation of the UsuariosApi trait that delegates to the domain service
pub struct UsuariosLocalClient {
    service: Arc<Service>,
}

impl UsuariosLocalClient {
    pub fn new(service: Arc<Service>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl UsuariosApi for UsuariosLocalClient {
    async fn list_usuarios(&self, req: ListRequest) -> anyhow::Result<ListResponse<Usuario>> {
        self.service
            .list_usuarios(&req)
            .await
            .map_err(map_domain_error_to_anyhow)
    }

    async fn summarize_usuarios(&self, req: SummaryRequest) -> anyhow::Result<SummaryResponse> {
        self.service
            .summarize_usuarios(&req)
            .await
            .map_err(map_domain_error_to_anyhow)
    }

    async fn breakdown_usuarios(
        &self,
        group_by: String,
        filter: Option<FilterNode>,
        order_by_count: bool,
    ) -> anyhow::Result<BreakdownResponse> {
        self.service
            .breakdown_usuarios(&group_by, filter.as_ref(), order_by_count)
            .await
            .map_err(map_domain_error_to_anyhow)
    }
}

/// Map domain errors to contract errors wrapped in anyhow
fn map_domain_error_to_anyhow(domain_error: DomainError) -> anyhow::Error {
    let contract_error = match domain_error {
        DomainError::Validation { field, message } => {
            UsuariosError::validation(format!("{}: {}", field, message))
        }
        DomainError::UnknownColumn { column } => UsuariosError::unknown_column(column),
        DomainError::ForbiddenColumn { column } => UsuariosError::forbidden_column(column),
        DomainError::Database { .. } | DomainError::Internal { .. } => UsuariosError::internal(),
    };

    anyhow::Error::new(contract_error)
}
