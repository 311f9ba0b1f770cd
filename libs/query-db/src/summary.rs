//! Group-by counts over one allow-listed column.

use query_core::{
    BreakdownResponse, DateFilter, DateRange, FieldFilter, FilterNode, QueryError, QueryResult,
    SummaryRequest, SummaryResponse,
};
use sea_orm::sea_query::{Alias, Asterisk, Expr};
use sea_orm::{
    ColumnTrait, Condition, ConnectionTrait, EntityName, EntityTrait, FromQueryResult,
    PaginatorTrait, QueryFilter, QuerySelect, Select,
};
use tracing::{instrument, warn};

use crate::config::QueryConfig;
use crate::field_map::{Field, FieldMap};
use crate::filter::{compile_filter, conjunction, field_conditions};

#[derive(Debug, FromQueryResult)]
struct GroupCount {
    group: Option<String>,
    count: i64,
}

/// Grouped counts for one entity type.
pub struct SummaryService<E: EntityTrait> {
    fields: FieldMap<E>,
    config: QueryConfig,
    allowed_group_columns: Vec<String>,
}

impl<E> SummaryService<E>
where
    E: EntityTrait,
    E::Column: ColumnTrait + Copy,
    E::Model: Send + Sync + 'static,
{
    pub fn new(fields: FieldMap<E>, config: QueryConfig) -> Self {
        Self {
            fields,
            config,
            allowed_group_columns: Vec::new(),
        }
    }

    /// Restrict `groupBy` to these columns. An empty list means no restriction.
    pub fn with_allowed_group_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_group_columns = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Total matching rows plus per-value counts of `groupBy`, largest group first.
    /// NULL values are counted under the unclassified label.
    #[instrument(
        name = "query.summarize",
        skip_all,
        fields(entity = %E::default().table_name(), group_by = %req.group_by)
    )]
    pub async fn summarize<C>(&self, conn: &C, req: &SummaryRequest) -> QueryResult<SummaryResponse>
    where
        C: ConnectionTrait,
    {
        let group = self.group_field(&req.group_by)?;
        let filter = compile_filter(&self.fields, req.filter.as_ref())?;
        let range = match &req.date_range {
            Some(range) => self.date_range_condition(range)?,
            None => None,
        };
        let select = filtered::<E>(conjunction(filter.into_iter().chain(range).collect()));

        let total = select.clone().count(conn).await.map_err(|e| {
            warn!(error = %e, "count failed");
            QueryError::storage(e)
        })?;
        let counts = group_counts(select, group, conn).await?;

        Ok(SummaryResponse::from_counts(
            total,
            counts,
            &self.config.unclassified_label,
        ))
    }

    /// Per-value counts with each group's share of the total, where the total is
    /// the sum of the groups. NULL values are counted under the undefined label.
    #[instrument(
        name = "query.breakdown",
        skip_all,
        fields(entity = %E::default().table_name(), group_by = %group_by, order_by_count = order_by_count)
    )]
    pub async fn breakdown<C>(
        &self,
        conn: &C,
        group_by: &str,
        filter: Option<&FilterNode>,
        order_by_count: bool,
    ) -> QueryResult<BreakdownResponse>
    where
        C: ConnectionTrait,
    {
        let group = self.group_field(group_by)?;
        let select = filtered::<E>(compile_filter(&self.fields, filter)?);
        let counts = group_counts(select, group, conn).await?;

        Ok(BreakdownResponse::from_counts(
            counts,
            &self.config.undefined_label,
            order_by_count,
        ))
    }

    fn group_field(&self, name: &str) -> QueryResult<&Field<E>> {
        if !self.allowed_group_columns.is_empty()
            && !self.allowed_group_columns.iter().any(|c| c == name)
        {
            return Err(QueryError::forbidden_column(name));
        }
        self.fields.resolve(name)
    }

    /// Inclusive `[from, to]` bound on a date field; `None` when neither bound is set.
    fn date_range_condition(&self, range: &DateRange) -> QueryResult<Option<Condition>> {
        let name = match range.field.trim() {
            "" => self.config.default_date_field.as_str(),
            f => f,
        };
        let field = self.fields.resolve(name)?;
        if !field.kind.is_temporal() {
            return Err(QueryError::validation(
                name,
                "date range requires a date field",
            ));
        }
        let Some(between) = DateFilter::between(range.from, range.to) else {
            return Ok(None);
        };
        let exprs = field_conditions(field, name, &FieldFilter::Date(between))?;
        Ok(conjunction(
            exprs.into_iter().map(|e| Condition::all().add(e)).collect(),
        ))
    }
}

fn filtered<E: EntityTrait>(predicate: Option<Condition>) -> Select<E> {
    match predicate {
        Some(cond) => E::find().filter(cond),
        None => E::find(),
    }
}

/// `SELECT CAST(col AS TEXT) AS group, COUNT(*) AS count ... GROUP BY col`.
/// `COUNT(*)` keeps rows whose group value is NULL.
async fn group_counts<E, C>(
    select: Select<E>,
    group: &Field<E>,
    conn: &C,
) -> QueryResult<Vec<(Option<String>, u64)>>
where
    E: EntityTrait,
    E::Column: ColumnTrait + Copy,
    C: ConnectionTrait,
{
    let rows = select
        .select_only()
        .column_as(Expr::col(group.col).cast_as(Alias::new("TEXT")), "group")
        .column_as(Expr::col(Asterisk).count(), "count")
        .group_by(group.col)
        .into_model::<GroupCount>()
        .all(conn)
        .await
        .map_err(|e| {
            warn!(error = %e, "group count failed");
            QueryError::storage(e)
        })?;

    Ok(rows
        .into_iter()
        .map(|r| (r.group, u64::try_from(r.count).unwrap_or(0)))
        .collect())
}
