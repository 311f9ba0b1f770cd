use query_core::{QueryError, QueryResult, SortDirection, SortSpec};
use sea_orm::sea_query::Order;
use sea_orm::{ColumnTrait, EntityTrait, QueryOrder};
use tracing::debug;

use crate::field_map::FieldMap;

/// Validated ordering, primary key first.
pub struct CompiledSort<E: EntityTrait> {
    keys: Vec<(E::Column, Order)>,
}

impl<E: EntityTrait> CompiledSort<E> {
    pub fn none() -> Self {
        Self { keys: Vec::new() }
    }
}

/// Resolve every sort column against the field map and the optional allow-list.
///
/// Structural checks (length, duplicates) run first. A column missing from the
/// field map is an unknown column; a hidden one, or one outside a non-empty
/// `allowed` list, is forbidden.
pub fn compile_sort<E>(
    fmap: &FieldMap<E>,
    spec: &SortSpec,
    allowed: Option<&[String]>,
) -> QueryResult<CompiledSort<E>>
where
    E: EntityTrait,
    E::Column: ColumnTrait + Copy,
{
    spec.validate()?;
    let allowed = allowed.filter(|a| !a.is_empty());

    let mut keys = Vec::with_capacity(spec.len());
    for key in spec {
        let field = fmap.resolve(&key.column)?;
        if let Some(allowed) = allowed {
            if !allowed.iter().any(|c| c == &key.column) {
                return Err(QueryError::forbidden_column(key.column.as_str()));
            }
        }
        let order = match key.direction {
            SortDirection::Asc => Order::Asc,
            SortDirection::Desc => Order::Desc,
        };
        keys.push((field.col, order));
    }
    debug!(sort_keys = keys.len(), "sort compiled");
    Ok(CompiledSort { keys })
}

/// Apply a compiled ordering to any orderable query, preserving key priority.
pub trait SortApplyExt<E: EntityTrait>: Sized {
    fn apply_sort(self, sort: &CompiledSort<E>) -> Self;
}

impl<E, Q> SortApplyExt<E> for Q
where
    E: EntityTrait,
    E::Column: ColumnTrait + Copy,
    Q: QueryOrder,
{
    fn apply_sort(self, sort: &CompiledSort<E>) -> Self {
        sort.keys
            .iter()
            .fold(self, |q, (col, order)| q.order_by(*col, order.clone()))
    }
}
