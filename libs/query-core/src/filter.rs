//! Filter tree model.
//!
//! A [`FilterNode`] is either a leaf (field name → operator set), a conjunction or a
//! disjunction of child nodes. Leaves arrive from the wire as untyped operator sets
//! ([`RawFilter`]) and are bound to one of the five typed [`FieldFilter`] variants only
//! once the target field's kind is known.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::de::Error as _;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Number, Value};

use crate::error::{QueryError, QueryResult};

pub const AND_KEY: &str = "AND";
pub const OR_KEY: &str = "OR";

/* ---------- timestamps ---------- */

/// Point in time accepted by date filters.
///
/// Parses RFC 3339, a naive `YYYY-MM-DDTHH:MM:SS[.fff]` (taken as UTC) or a bare
/// `YYYY-MM-DD` (midnight UTC). Always serialized as RFC 3339.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(pub DateTime<Utc>);

impl Timestamp {
    pub fn as_datetime(&self) -> DateTime<Utc> {
        self.0
    }

    pub fn date(&self) -> NaiveDate {
        self.0.date_naive()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimestampParseError(String);

impl fmt::Display for TimestampParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid timestamp '{}'", self.0)
    }
}

impl std::error::Error for TimestampParseError {}

impl FromStr for Timestamp {
    type Err = TimestampParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Ok(Self(dt.with_timezone(&Utc)));
        }
        for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
            if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
                return Ok(Self(Utc.from_utc_datetime(&naive)));
            }
        }
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|naive| Self(Utc.from_utc_datetime(&naive)))
            .ok_or_else(|| TimestampParseError(s.to_string()))
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_rfc3339())
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(D::Error::custom)
    }
}

/* ---------- typed leaf filters ---------- */

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct StringFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equals: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contains: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub starts_with: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ends_with: Option<String>,
    #[serde(rename = "in", default, skip_serializing_if = "Option::is_none")]
    pub in_: Option<Vec<String>>,
}

impl StringFilter {
    pub fn equals(v: impl Into<String>) -> Self {
        Self {
            equals: Some(v.into()),
            ..Default::default()
        }
    }

    pub fn contains(v: impl Into<String>) -> Self {
        Self {
            contains: Some(v.into()),
            ..Default::default()
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NumberFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equals: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gt: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gte: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lt: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lte: Option<Number>,
    #[serde(rename = "in", default, skip_serializing_if = "Option::is_none")]
    pub in_: Option<Vec<Number>>,
}

impl NumberFilter {
    pub fn equals(v: impl Into<Number>) -> Self {
        Self {
            equals: Some(v.into()),
            ..Default::default()
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DateFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equals: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gt: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gte: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lt: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lte: Option<Timestamp>,
    #[serde(rename = "in", default, skip_serializing_if = "Option::is_none")]
    pub in_: Option<Vec<Timestamp>>,
}

impl DateFilter {
    /// Inclusive range; `None` when neither bound is given.
    pub fn between(from: Option<Timestamp>, to: Option<Timestamp>) -> Option<Self> {
        if from.is_none() && to.is_none() {
            return None;
        }
        Some(Self {
            gte: from,
            lte: to,
            ..Default::default()
        })
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EnumFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equals: Option<String>,
    #[serde(rename = "in", default, skip_serializing_if = "Option::is_none")]
    pub in_: Option<Vec<String>>,
}

impl EnumFilter {
    pub fn equals(v: impl Into<String>) -> Self {
        Self {
            equals: Some(v.into()),
            in_: None,
        }
    }

    pub fn one_of<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            equals: None,
            in_: Some(values.into_iter().map(Into::into).collect()),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BooleanFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equals: Option<bool>,
}

impl BooleanFilter {
    pub fn equals(v: bool) -> Self {
        Self { equals: Some(v) }
    }
}

/// Which leaf variant a field accepts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FilterKind {
    String,
    Number,
    Date,
    Enum,
    Boolean,
}

#[derive(Clone, Debug, PartialEq)]
pub enum FieldFilter {
    String(StringFilter),
    Number(NumberFilter),
    Date(DateFilter),
    Enum(EnumFilter),
    Boolean(BooleanFilter),
}

impl FieldFilter {
    /// Bind an untyped operator set to the variant `kind` requires.
    ///
    /// Operators foreign to the variant and values of the wrong type are reported as
    /// [`QueryError::Validation`] naming `field`.
    pub fn bind(kind: FilterKind, field: &str, raw: &RawFilter) -> QueryResult<Self> {
        let value = Value::Object(raw.0.clone());
        let bound = match kind {
            FilterKind::String => serde_json::from_value(value).map(Self::String),
            FilterKind::Number => serde_json::from_value(value).map(Self::Number),
            FilterKind::Date => serde_json::from_value(value).map(Self::Date),
            FilterKind::Enum => serde_json::from_value(value).map(Self::Enum),
            FilterKind::Boolean => serde_json::from_value(value).map(Self::Boolean),
        };
        bound.map_err(|e| QueryError::validation(field, e.to_string()))
    }
}

/* ---------- raw operator sets ---------- */

/// Operator object exactly as received, e.g. `{"contains": "ana", "in": [...]}`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawFilter(pub Map<String, Value>);

impl RawFilter {
    pub fn is_empty(&self) -> bool {
        self.0
            .values()
            .all(|v| v.is_null() || v.as_array().is_some_and(Vec::is_empty))
    }
}

macro_rules! impl_raw_from_typed {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for RawFilter {
                fn from(filter: $ty) -> Self {
                    match serde_json::to_value(filter) {
                        Ok(Value::Object(map)) => RawFilter(map),
                        _ => RawFilter::default(),
                    }
                }
            }
        )*
    };
}

impl_raw_from_typed!(StringFilter, NumberFilter, DateFilter, EnumFilter, BooleanFilter);

impl From<FieldFilter> for RawFilter {
    fn from(filter: FieldFilter) -> Self {
        match filter {
            FieldFilter::String(f) => f.into(),
            FieldFilter::Number(f) => f.into(),
            FieldFilter::Date(f) => f.into(),
            FieldFilter::Enum(f) => f.into(),
            FieldFilter::Boolean(f) => f.into(),
        }
    }
}

/* ---------- filter tree ---------- */

/// Recursive filter tree.
///
/// On the wire this is a single object: `AND` (when non-empty) wins over `OR`, which
/// wins over the per-field leaves; the losing keys are ignored.
#[derive(Clone, Debug, PartialEq)]
pub enum FilterNode {
    Leaf(BTreeMap<String, RawFilter>),
    And(Vec<FilterNode>),
    Or(Vec<FilterNode>),
}

impl Default for FilterNode {
    fn default() -> Self {
        Self::Leaf(BTreeMap::new())
    }
}

impl FilterNode {
    /// Leaf with a single field condition.
    pub fn field(name: impl Into<String>, filter: impl Into<RawFilter>) -> Self {
        let mut map = BTreeMap::new();
        map.insert(name.into(), filter.into());
        Self::Leaf(map)
    }

    /// Add a field condition. On a composite node the result is `AND(self, field)`.
    pub fn with(self, name: impl Into<String>, filter: impl Into<RawFilter>) -> Self {
        match self {
            Self::Leaf(mut map) => {
                map.insert(name.into(), filter.into());
                Self::Leaf(map)
            }
            other => Self::And(vec![other, Self::field(name, filter)]),
        }
    }

    pub fn and(children: Vec<FilterNode>) -> Self {
        Self::And(children)
    }

    pub fn or(children: Vec<FilterNode>) -> Self {
        Self::Or(children)
    }

    /// True when nothing anywhere in the tree sets an operator.
    pub fn is_match_all(&self) -> bool {
        match self {
            Self::Leaf(map) => map.values().all(RawFilter::is_empty),
            Self::And(children) | Self::Or(children) => {
                children.iter().all(FilterNode::is_match_all)
            }
        }
    }

    fn from_json_map(mut map: Map<String, Value>) -> Result<Self, serde_json::Error> {
        let and = map.remove(AND_KEY);
        let or = map.remove(OR_KEY);

        if let Some(children) = non_empty_children(and)? {
            return Ok(Self::And(children));
        }
        if let Some(children) = non_empty_children(or)? {
            return Ok(Self::Or(children));
        }

        let mut leaves = BTreeMap::new();
        for (name, value) in map {
            if value.is_null() {
                continue;
            }
            let raw: RawFilter = serde_json::from_value(value).map_err(|e| {
                serde_json::Error::custom(format!("filter for field '{name}': {e}"))
            })?;
            leaves.insert(name, raw);
        }
        Ok(Self::Leaf(leaves))
    }
}

fn non_empty_children(value: Option<Value>) -> Result<Option<Vec<FilterNode>>, serde_json::Error> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(v) => {
            let children: Vec<FilterNode> = serde_json::from_value(v)?;
            Ok((!children.is_empty()).then_some(children))
        }
    }
}

impl<'de> Deserialize<'de> for FilterNode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let map = Map::<String, Value>::deserialize(deserializer)?;
        Self::from_json_map(map).map_err(D::Error::custom)
    }
}

impl Serialize for FilterNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Leaf(leaves) => {
                let mut m = serializer.serialize_map(Some(leaves.len()))?;
                for (name, raw) in leaves {
                    m.serialize_entry(name, raw)?;
                }
                m.end()
            }
            Self::And(children) => {
                let mut m = serializer.serialize_map(Some(1))?;
                m.serialize_entry(AND_KEY, children)?;
                m.end()
            }
            Self::Or(children) => {
                let mut m = serializer.serialize_map(Some(1))?;
                m.serialize_entry(OR_KEY, children)?;
                m.end()
            }
        }
    }
}
