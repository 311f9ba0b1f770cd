//! SeaORM-backed repository implementation for the domain port.
//!
//! Generic over `C: ConnectionTrait`, so it can be built with a
//! `DatabaseConnection` **or** a transactional connection.

use query_core::{
    BreakdownResponse, FilterNode, ListRequest, ListResponse, QueryResult, SortDirection,
    SortSpec, SummaryRequest, SummaryResponse,
};
use query_db::{ListService, QueryConfig, SummaryService};
use sea_orm::ConnectionTrait;

use crate::contract::columns::{
    EXCLUDED_FIELDS, GROUPABLE_COLUMNS, SEARCH_FIELDS, SORTABLE_COLUMNS,
};
use crate::contract::model::Usuario;
use crate::domain::repo::UsuariosRepository;
use crate::infra::storage::entity::Entity as UsuarioEntity;
use crate::infra::storage::field_map::usuario_fields;

/// SeaORM repository impl.
/// Holds a connection object; its lifetime/ownership is up to the caller.
pub struct SeaOrmUsuariosRepository<C>
where
    C: ConnectionTrait + Send + Sync,
{
    conn: C,
    list: ListService<UsuarioEntity>,
    summary: SummaryService<UsuarioEntity>,
}

impl<C> SeaOrmUsuariosRepository<C>
where
    C: ConnectionTrait + Send + Sync,
{
    /// Newest usuarios first unless the client sorts explicitly.
    pub fn new(conn: C, config: QueryConfig) -> Self {
        let list = ListService::new(usuario_fields(), config.clone())
            .with_allowed_sort_columns(SORTABLE_COLUMNS.iter().copied())
            .with_excluded_fields(EXCLUDED_FIELDS.iter().copied())
            .with_search_fields(SEARCH_FIELDS.iter().copied())
            .with_default_sort(SortSpec::single("fecha_creacion", SortDirection::Desc));
        let summary = SummaryService::new(usuario_fields(), config)
            .with_allowed_group_columns(GROUPABLE_COLUMNS.iter().copied());
        Self {
            conn,
            list,
            summary,
        }
    }
}

#[async_trait::async_trait]
impl<C> UsuariosRepository for SeaOrmUsuariosRepository<C>
where
    C: ConnectionTrait + Send + Sync + 'static,
{
    async fn list(&self, req: &ListRequest) -> QueryResult<ListResponse<Usuario>> {
        self.list.list_as::<Usuario, _>(&self.conn, req).await
    }

    async fn summarize(&self, req: &SummaryRequest) -> QueryResult<SummaryResponse> {
        self.summary.summarize(&self.conn, req).await
    }

    async fn breakdown(
        &self,
        group_by: &str,
        filter: Option<&FilterNode>,
        order_by_count: bool,
    ) -> QueryResult<BreakdownResponse> {
        self.summary
            .breakdown(&self.conn, group_by, filter, order_by_count)
            .await
    }
}
