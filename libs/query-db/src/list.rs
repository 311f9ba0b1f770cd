//! List orchestrator: filter → count → order → offset/limit → fetch → envelope.

use query_core::{
    paginate, ListRequest, ListResponse, PaginationConfig, QueryError, QueryResult, SortSpec,
};
use sea_orm::{
    ColumnTrait, ConnectionTrait, EntityName, EntityTrait, PaginatorTrait, QueryFilter,
    QuerySelect,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{instrument, warn};

use crate::config::QueryConfig;
use crate::field_map::FieldMap;
use crate::filter::{compile_filter, compile_search, conjunction};
use crate::sort::{compile_sort, CompiledSort, SortApplyExt};

/// Paginated listing for one entity type.
///
/// Holds only immutable per-entity settings; the connection is borrowed for a
/// single call, so one service can be shared across concurrent requests.
pub struct ListService<E: EntityTrait> {
    fields: FieldMap<E>,
    config: QueryConfig,
    allowed_sort_columns: Vec<String>,
    excluded_fields: Vec<String>,
    search_fields: Vec<String>,
    default_sort: SortSpec,
}

impl<E> ListService<E>
where
    E: EntityTrait,
    E::Column: ColumnTrait + Copy,
    E::Model: Serialize + Send + Sync + 'static,
{
    pub fn new(fields: FieldMap<E>, config: QueryConfig) -> Self {
        Self {
            fields,
            config,
            allowed_sort_columns: Vec::new(),
            excluded_fields: Vec::new(),
            search_fields: Vec::new(),
            default_sort: SortSpec::empty(),
        }
    }

    /// Restrict client sorts to these columns. An empty list means no restriction.
    pub fn with_allowed_sort_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_sort_columns = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Drop these attributes from every returned row. They also become hidden
    /// in the field map, so no filter, search or sort can reveal their values.
    pub fn with_excluded_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excluded_fields = fields.into_iter().map(Into::into).collect();
        for name in &self.excluded_fields {
            self.fields.hide(name);
        }
        self
    }

    /// Text fields matched by `ListRequest::search`.
    pub fn with_search_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.search_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Ordering used when the request carries no sort. Not echoed as `appliedSort`.
    pub fn with_default_sort(mut self, sort: SortSpec) -> Self {
        self.default_sort = sort;
        self
    }

    /// List one page of rows as JSON objects, excluded fields removed.
    ///
    /// Every compile step runs before the first storage call, so client-input
    /// errors never reach the database.
    #[instrument(
        name = "query.list",
        skip_all,
        fields(
            entity = %E::default().table_name(),
            page = tracing::field::Empty,
            page_size = tracing::field::Empty,
            total = tracing::field::Empty
        )
    )]
    pub async fn list<C>(&self, conn: &C, req: &ListRequest) -> QueryResult<ListResponse<Value>>
    where
        C: ConnectionTrait,
    {
        let filter = compile_filter(&self.fields, req.filter.as_ref())?;
        let search = compile_search(&self.fields, &self.search_fields, req.search.as_deref())?;
        let predicate = conjunction(filter.into_iter().chain(search).collect());

        let client_sort = req.sort.as_ref().filter(|s| !s.is_empty());
        let ordering = match client_sort {
            Some(spec) => {
                compile_sort(&self.fields, spec, Some(self.allowed_sort_columns.as_slice()))?
            }
            None if !self.default_sort.is_empty() => {
                compile_sort(&self.fields, &self.default_sort, None)?
            }
            None => CompiledSort::none(),
        };

        let page_req = req
            .pagination
            .unwrap_or_else(|| {
                PaginationConfig::new(1, clamp_to_i64(self.config.default_page_size))
            })
            .clamp(self.config.max_page_size);

        let span = tracing::Span::current();
        span.record("page", page_req.page);
        span.record("page_size", page_req.page_size);

        let mut select = E::find();
        if let Some(cond) = predicate {
            select = select.filter(cond);
        }

        let total = select.clone().count(conn).await.map_err(|e| {
            warn!(error = %e, "count failed");
            QueryError::storage(e)
        })?;
        span.record("total", total);

        let meta = paginate(total, page_req.page, page_req.page_size);
        // Past the last row there is nothing to fetch, however large the page number.
        let rows = if meta.offset >= total {
            Vec::new()
        } else {
            select
                .apply_sort(&ordering)
                .offset(meta.offset)
                .limit(meta.limit)
                .all(conn)
                .await
                .map_err(|e| {
                    warn!(error = %e, "fetch failed");
                    QueryError::storage(e)
                })?
        };

        let data = rows
            .into_iter()
            .map(|row| self.project(row))
            .collect::<QueryResult<Vec<_>>>()?;

        Ok(ListResponse::new(data, meta, client_sort.cloned()))
    }

    /// Like [`list`](Self::list), deserializing each projected row into `T`.
    pub async fn list_as<T, C>(&self, conn: &C, req: &ListRequest) -> QueryResult<ListResponse<T>>
    where
        T: DeserializeOwned,
        C: ConnectionTrait,
    {
        self.list(conn, req)
            .await?
            .try_map_items(serde_json::from_value::<T>)
            .map_err(|e| {
                warn!(error = %e, target_type = std::any::type_name::<T>(), "row does not fit target type");
                QueryError::Projection(e)
            })
    }

    fn project(&self, row: E::Model) -> QueryResult<Value> {
        let mut value = serde_json::to_value(row).map_err(|e| {
            warn!(error = %e, "row serialization failed");
            QueryError::Projection(e)
        })?;
        if let Value::Object(map) = &mut value {
            for name in &self.excluded_fields {
                map.remove(name);
            }
        }
        Ok(value)
    }
}

fn clamp_to_i64(v: u64) -> i64 {
    i64::try_from(v).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use query_core::{SortDirection, SortSpec};
    use sea_orm::{ConnectOptions, Database, DatabaseConnection, Schema};
    use tracing_test::traced_test;

    use crate::field_map::FieldKind;

    mod note {
        use sea_orm::entity::prelude::*;

        #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, serde::Serialize)]
        #[sea_orm(table_name = "notes")]
        pub struct Model {
            #[sea_orm(primary_key)]
            pub id: i64,
            pub title: String,
        }

        #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
        pub enum Relation {}

        impl ActiveModelBehavior for ActiveModel {}
    }

    async fn db(with_table: bool) -> DatabaseConnection {
        let mut opts = ConnectOptions::new("sqlite::memory:");
        opts.max_connections(1).min_connections(1).sqlx_logging(false);
        let db = Database::connect(opts).await.unwrap();
        if with_table {
            let backend = db.get_database_backend();
            let stmt = Schema::new(backend).create_table_from_entity(note::Entity);
            db.execute(backend.build(&stmt)).await.unwrap();
        }
        db
    }

    fn service() -> ListService<note::Entity> {
        let fields = FieldMap::<note::Entity>::new()
            .insert("id", note::Column::Id, FieldKind::I64)
            .insert("title", note::Column::Title, FieldKind::String);
        ListService::new(fields, QueryConfig::default())
    }

    #[traced_test]
    #[tokio::test]
    async fn test_list_logs_compile_steps() {
        let db = db(true).await;
        let req = ListRequest::new().sort(SortSpec::single("title", SortDirection::Asc));
        let page = service().list(&db, &req).await.unwrap();

        assert_eq!(page.total, 0);
        assert!(logs_contain("sort compiled"));
        assert!(logs_contain("query.list"));
    }

    #[traced_test]
    #[tokio::test]
    async fn test_storage_failure_is_logged() {
        let db = db(false).await;
        let err = service().list(&db, &ListRequest::new()).await.unwrap_err();

        assert!(matches!(err, QueryError::Storage(_)));
        assert!(logs_contain("count failed"));
    }
}
