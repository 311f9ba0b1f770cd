use std::collections::HashSet;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{QueryError, QueryResult};

/// Upper bound on the number of columns in one sort spec.
pub const MAX_SORT_COLUMNS: usize = 10;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    #[serde(alias = "ASC")]
    Asc,
    #[serde(alias = "DESC")]
    Desc,
}

impl SortDirection {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortColumn {
    #[serde(deserialize_with = "trimmed")]
    pub column: String,
    #[serde(default)]
    pub direction: SortDirection,
}

impl SortColumn {
    pub fn new(column: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            column: column.into(),
            direction,
        }
    }

    pub fn asc(column: impl Into<String>) -> Self {
        Self::new(column, SortDirection::Asc)
    }

    pub fn desc(column: impl Into<String>) -> Self {
        Self::new(column, SortDirection::Desc)
    }
}

fn trimmed<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let s = String::deserialize(deserializer)?;
    Ok(s.trim().to_string())
}

/// Ordered list of sort keys; the first entry is the primary key.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SortSpec(pub Vec<SortColumn>);

impl SortSpec {
    pub fn new(columns: Vec<SortColumn>) -> Self {
        Self(columns)
    }

    pub fn empty() -> Self {
        Self(Vec::new())
    }

    /// One-column spec, typically used as a service default.
    pub fn single(column: impl Into<String>, direction: SortDirection) -> Self {
        Self(vec![SortColumn::new(column, direction)])
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SortColumn> {
        self.0.iter()
    }

    /// Structural checks that do not need the entity: blank names, length and
    /// duplicate columns.
    pub fn validate(&self) -> QueryResult<()> {
        if self.0.len() > MAX_SORT_COLUMNS {
            return Err(QueryError::validation(
                "sort",
                format!("at most {MAX_SORT_COLUMNS} sort columns are allowed"),
            ));
        }
        let mut seen = HashSet::with_capacity(self.0.len());
        for key in &self.0 {
            if key.column.trim().is_empty() {
                return Err(QueryError::validation("sort", "column name must not be empty"));
            }
            if !seen.insert(key.column.as_str()) {
                return Err(QueryError::validation(
                    "sort",
                    format!("column '{}' appears more than once", key.column),
                ));
            }
        }
        Ok(())
    }

    /// Column → direction pairs in priority order.
    pub fn directions(&self) -> Vec<(&str, SortDirection)> {
        self.0
            .iter()
            .map(|k| (k.column.as_str(), k.direction))
            .collect()
    }

    /// Human-readable `ORDER BY` clause, empty for an empty spec.
    pub fn describe(&self) -> String {
        if self.is_empty() {
            return String::new();
        }
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|k| format!("{} {}", k.column, k.direction.as_sql()))
            .collect();
        format!("ORDER BY {}", parts.join(", "))
    }
}

impl FromIterator<SortColumn> for SortSpec {
    fn from_iter<I: IntoIterator<Item = SortColumn>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a SortSpec {
    type Item = &'a SortColumn;
    type IntoIter = std::slice::Iter<'a, SortColumn>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
