//! Filter tree → `sea_orm::Condition` compiler.
//!
//! Leaves are bound to their typed variant through the entity's [`FieldMap`], then
//! lowered to atomic comparisons. Atomic comparisons of one leaf node are ANDed; an
//! `And` node ANDs its non-empty children, an `Or` node ORs them. A tree that sets
//! no operator anywhere compiles to `None`, i.e. no `WHERE` clause.

use std::str::FromStr;

use query_core::{
    BooleanFilter, DateFilter, EnumFilter, FieldFilter, FilterNode, NumberFilter, QueryError,
    QueryResult, RawFilter, StringFilter, Timestamp,
};
use rust_decimal::Decimal;
use sea_orm::sea_query::{Expr, Func, LikeExpr, SimpleExpr};
use sea_orm::{ColumnTrait, Condition, EntityTrait};
use serde_json::Number;
use tracing::debug;

use crate::field_map::{Field, FieldKind, FieldMap};

/// Compile an optional filter tree. `None` means "match all".
pub fn compile_filter<E>(
    fmap: &FieldMap<E>,
    node: Option<&FilterNode>,
) -> QueryResult<Option<Condition>>
where
    E: EntityTrait,
    E::Column: ColumnTrait + Copy,
{
    let Some(node) = node else {
        return Ok(None);
    };
    let conditions = node_conditions(fmap, node)?;
    debug!(conditions = conditions.len(), "filter compiled");
    Ok(conjunction(conditions))
}

/// Free-text search: `contains(term)` on each search field, ORed together.
/// A blank term or an empty field list yields `None`.
pub fn compile_search<E>(
    fmap: &FieldMap<E>,
    fields: &[String],
    term: Option<&str>,
) -> QueryResult<Option<Condition>>
where
    E: EntityTrait,
    E::Column: ColumnTrait + Copy,
{
    let term = match term.map(str::trim) {
        Some(t) if !t.is_empty() => t,
        _ => return Ok(None),
    };
    if fields.is_empty() {
        return Ok(None);
    }
    let mut any = Condition::any();
    for name in fields {
        let field = fmap.resolve(name)?;
        any = any.add(ilike(field, name, like_contains(term))?);
    }
    Ok(Some(any))
}

/// Atomic comparisons for one typed leaf filter on one field.
pub fn field_conditions<E>(
    field: &Field<E>,
    name: &str,
    filter: &FieldFilter,
) -> QueryResult<Vec<SimpleExpr>>
where
    E: EntityTrait,
    E::Column: ColumnTrait + Copy,
{
    match filter {
        FieldFilter::String(f) => string_conditions(field, name, f),
        FieldFilter::Number(f) => number_conditions(field, name, f),
        FieldFilter::Date(f) => date_conditions(field, name, f),
        FieldFilter::Enum(f) => enum_conditions(field, name, f),
        FieldFilter::Boolean(f) => Ok(boolean_conditions(field, f)),
    }
}

/// AND a list of conditions together; `None` for an empty list.
pub(crate) fn conjunction(conditions: Vec<Condition>) -> Option<Condition> {
    if conditions.is_empty() {
        return None;
    }
    Some(
        conditions
            .into_iter()
            .fold(Condition::all(), |acc, c| acc.add(c)),
    )
}

fn node_conditions<E>(fmap: &FieldMap<E>, node: &FilterNode) -> QueryResult<Vec<Condition>>
where
    E: EntityTrait,
    E::Column: ColumnTrait + Copy,
{
    match node {
        FilterNode::And(children) => {
            let mut parts = Vec::with_capacity(children.len());
            for child in children {
                if let Some(c) = conjunction(node_conditions(fmap, child)?) {
                    parts.push(c);
                }
            }
            Ok(conjunction(parts).into_iter().collect())
        }
        FilterNode::Or(children) => {
            let mut any = Condition::any();
            let mut used = false;
            for child in children {
                if let Some(c) = conjunction(node_conditions(fmap, child)?) {
                    any = any.add(c);
                    used = true;
                }
            }
            Ok(if used { vec![any] } else { Vec::new() })
        }
        FilterNode::Leaf(leaves) => {
            let mut out = Vec::new();
            for (name, raw) in leaves {
                out.extend(
                    leaf_conditions(fmap, name, raw)?
                        .into_iter()
                        .map(|e| Condition::all().add(e)),
                );
            }
            Ok(out)
        }
    }
}

fn leaf_conditions<E>(fmap: &FieldMap<E>, name: &str, raw: &RawFilter) -> QueryResult<Vec<SimpleExpr>>
where
    E: EntityTrait,
    E::Column: ColumnTrait + Copy,
{
    let field = fmap.resolve(name)?;
    if raw.is_empty() {
        return Ok(Vec::new());
    }
    let bound = FieldFilter::bind(field.kind.filter_kind(), name, raw)?;
    field_conditions(field, name, &bound)
}

/* ---------- per-variant builders ---------- */

fn string_conditions<E>(field: &Field<E>, name: &str, f: &StringFilter) -> QueryResult<Vec<SimpleExpr>>
where
    E: EntityTrait,
    E::Column: ColumnTrait + Copy,
{
    let mut out = Vec::new();
    if let Some(v) = &f.equals {
        out.push(Expr::col(field.col).eq(coerce_text(field.kind, name, v)?));
    }
    if let Some(s) = &f.contains {
        out.push(ilike(field, name, like_contains(s))?);
    }
    if let Some(s) = &f.starts_with {
        out.push(ilike(field, name, like_starts(s))?);
    }
    if let Some(s) = &f.ends_with {
        out.push(ilike(field, name, like_ends(s))?);
    }
    if let Some(items) = f.in_.as_deref().filter(|v| !v.is_empty()) {
        let vals = items
            .iter()
            .map(|s| coerce_text(field.kind, name, s))
            .collect::<QueryResult<Vec<_>>>()?;
        out.push(Expr::col(field.col).is_in(vals));
    }
    Ok(out)
}

fn number_conditions<E>(field: &Field<E>, name: &str, f: &NumberFilter) -> QueryResult<Vec<SimpleExpr>>
where
    E: EntityTrait,
    E::Column: ColumnTrait + Copy,
{
    let col = field.col;
    let num = |n: &Number| coerce_number(field.kind, name, n);
    let mut out = Vec::new();
    if let Some(n) = &f.equals {
        out.push(Expr::col(col).eq(num(n)?));
    }
    if let Some(n) = &f.gt {
        out.push(Expr::col(col).gt(num(n)?));
    }
    if let Some(n) = &f.gte {
        out.push(Expr::col(col).gte(num(n)?));
    }
    if let Some(n) = &f.lt {
        out.push(Expr::col(col).lt(num(n)?));
    }
    if let Some(n) = &f.lte {
        out.push(Expr::col(col).lte(num(n)?));
    }
    if let Some(items) = f.in_.as_deref().filter(|v| !v.is_empty()) {
        let vals = items.iter().map(num).collect::<QueryResult<Vec<_>>>()?;
        out.push(Expr::col(col).is_in(vals));
    }
    Ok(out)
}

fn date_conditions<E>(field: &Field<E>, name: &str, f: &DateFilter) -> QueryResult<Vec<SimpleExpr>>
where
    E: EntityTrait,
    E::Column: ColumnTrait + Copy,
{
    let col = field.col;
    let ts = |t: &Timestamp| coerce_timestamp(field.kind, name, t);
    let mut out = Vec::new();
    if let Some(t) = &f.equals {
        out.push(Expr::col(col).eq(ts(t)?));
    }
    if let Some(t) = &f.gt {
        out.push(Expr::col(col).gt(ts(t)?));
    }
    if let Some(t) = &f.gte {
        out.push(Expr::col(col).gte(ts(t)?));
    }
    if let Some(t) = &f.lt {
        out.push(Expr::col(col).lt(ts(t)?));
    }
    if let Some(t) = &f.lte {
        out.push(Expr::col(col).lte(ts(t)?));
    }
    if let Some(items) = f.in_.as_deref().filter(|v| !v.is_empty()) {
        let vals = items.iter().map(ts).collect::<QueryResult<Vec<_>>>()?;
        out.push(Expr::col(col).is_in(vals));
    }
    Ok(out)
}

fn enum_conditions<E>(field: &Field<E>, name: &str, f: &EnumFilter) -> QueryResult<Vec<SimpleExpr>>
where
    E: EntityTrait,
    E::Column: ColumnTrait + Copy,
{
    let mut out = Vec::new();
    if let Some(v) = &f.equals {
        out.push(Expr::col(field.col).eq(coerce_text(field.kind, name, v)?));
    }
    if let Some(items) = f.in_.as_deref().filter(|v| !v.is_empty()) {
        let vals = items
            .iter()
            .map(|s| coerce_text(field.kind, name, s))
            .collect::<QueryResult<Vec<_>>>()?;
        out.push(Expr::col(field.col).is_in(vals));
    }
    Ok(out)
}

fn boolean_conditions<E>(field: &Field<E>, f: &BooleanFilter) -> Vec<SimpleExpr>
where
    E: EntityTrait,
    E::Column: ColumnTrait + Copy,
{
    f.equals
        .map(|b| Expr::col(field.col).eq(sea_orm::Value::Bool(Some(b))))
        .into_iter()
        .collect()
}

/* ---------- coercion helpers ---------- */

fn mismatch(field: &str, kind: FieldKind, got: &str) -> QueryError {
    QueryError::validation(field, format!("{got} value is not valid for a {kind:?} field"))
}

fn coerce_text(kind: FieldKind, field: &str, s: &str) -> QueryResult<sea_orm::Value> {
    match kind {
        FieldKind::String | FieldKind::Enum => Ok(sea_orm::Value::String(Some(Box::new(s.to_owned())))),
        FieldKind::Uuid => uuid::Uuid::parse_str(s)
            .map(|u| sea_orm::Value::Uuid(Some(Box::new(u))))
            .map_err(|e| QueryError::validation(field, format!("invalid uuid '{s}': {e}"))),
        other => Err(mismatch(field, other, "string")),
    }
}

fn coerce_number(kind: FieldKind, field: &str, n: &Number) -> QueryResult<sea_orm::Value> {
    match kind {
        FieldKind::I64 => n
            .as_i64()
            .map(|i| sea_orm::Value::BigInt(Some(i)))
            .ok_or_else(|| QueryError::validation(field, format!("expected an integer, got {n}"))),
        FieldKind::F64 => n
            .as_f64()
            .map(|f| sea_orm::Value::Double(Some(f)))
            .ok_or_else(|| QueryError::validation(field, format!("expected a number, got {n}"))),
        FieldKind::Decimal => number_to_decimal(n)
            .map(|d| sea_orm::Value::Decimal(Some(Box::new(d))))
            .ok_or_else(|| QueryError::validation(field, format!("invalid decimal {n}"))),
        other => Err(mismatch(field, other, "number")),
    }
}

fn number_to_decimal(n: &Number) -> Option<Decimal> {
    let s = n.to_string();
    Decimal::from_str_exact(&s)
        .or_else(|_| Decimal::from_str(&s))
        .or_else(|_| Decimal::from_scientific(&s))
        .ok()
}

fn coerce_timestamp(kind: FieldKind, field: &str, t: &Timestamp) -> QueryResult<sea_orm::Value> {
    match kind {
        FieldKind::DateTimeUtc => Ok(sea_orm::Value::ChronoDateTimeUtc(Some(Box::new(
            t.as_datetime(),
        )))),
        FieldKind::Date => Ok(sea_orm::Value::ChronoDate(Some(Box::new(t.date())))),
        other => Err(mismatch(field, other, "timestamp")),
    }
}

/* ---------- LIKE helpers ---------- */

/// Needs no quoting in any backend's string literal syntax.
const LIKE_ESCAPE: char = '!';

fn like_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '%' | '_' | LIKE_ESCAPE => {
                out.push(LIKE_ESCAPE);
                out.push(ch);
            }
            c => out.push(c),
        }
    }
    out
}

fn like_contains(s: &str) -> String {
    format!("%{}%", like_escape(s))
}

fn like_starts(s: &str) -> String {
    format!("{}%", like_escape(s))
}

fn like_ends(s: &str) -> String {
    format!("%{}", like_escape(s))
}

/// Case-insensitive `LIKE`; only text columns qualify.
fn ilike<E>(field: &Field<E>, name: &str, pattern: String) -> QueryResult<SimpleExpr>
where
    E: EntityTrait,
    E::Column: ColumnTrait + Copy,
{
    if field.kind != FieldKind::String {
        return Err(QueryError::validation(
            name,
            "pattern operators require a text field",
        ));
    }
    Ok(Expr::expr(Func::lower(Expr::col(field.col)))
        .like(LikeExpr::new(pattern.to_lowercase()).escape(LIKE_ESCAPE)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_escape_is_literal() {
        assert_eq!(like_escape("50%_a!b\\"), "50!%!_a!!b\\");
        assert_eq!(like_contains("a"), "%a%");
        assert_eq!(like_starts("a_"), "a!_%");
        assert_eq!(like_ends("%"), "%!%");
    }

    #[test]
    fn test_coerce_number_rejects_fraction_for_integer_fields() {
        let n: Number = serde_json::from_str("1.5").unwrap();
        assert!(coerce_number(FieldKind::I64, "n", &n).is_err());
        assert!(coerce_number(FieldKind::F64, "n", &n).is_ok());
        let d = coerce_number(FieldKind::Decimal, "n", &n).unwrap();
        assert_eq!(
            d,
            sea_orm::Value::Decimal(Some(Box::new(Decimal::new(15, 1))))
        );
    }

    #[test]
    fn test_coerce_text_validates_uuid() {
        let err = coerce_text(FieldKind::Uuid, "uuid", "not-a-uuid").unwrap_err();
        assert!(matches!(err, QueryError::Validation { ref field, .. } if field == "uuid"));
        assert!(coerce_text(FieldKind::Uuid, "uuid", "67e55044-10b1-426f-9247-bb680e5fe0c8").is_ok());
    }

    #[test]
    fn test_coerce_timestamp_truncates_for_date_fields() {
        let t: Timestamp = "2024-05-06T23:59:00Z".parse().unwrap();
        let v = coerce_timestamp(FieldKind::Date, "d", &t).unwrap();
        assert_eq!(
            v,
            sea_orm::Value::ChronoDate(Some(Box::new(
                chrono::NaiveDate::from_ymd_opt(2024, 5, 6).unwrap()
            )))
        );
        assert!(coerce_timestamp(FieldKind::Bool, "d", &t).is_err());
    }
}
