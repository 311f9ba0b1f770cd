use serde::{Deserialize, Serialize};

use crate::filter::{FilterNode, Timestamp};

pub const DEFAULT_DATE_FIELD: &str = "fecha_creacion";
/// Label for rows whose group value is NULL in a summary.
pub const UNCLASSIFIED_LABEL: &str = "Sin clasificar";
/// Label for rows whose group value is NULL in a breakdown.
pub const UNDEFINED_LABEL: &str = "Sin definir";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DateRange {
    #[serde(default = "default_date_field")]
    pub field: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<Timestamp>,
}

fn default_date_field() -> String {
    DEFAULT_DATE_FIELD.to_string()
}

impl Default for DateRange {
    fn default() -> Self {
        Self {
            field: default_date_field(),
            from: None,
            to: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryRequest {
    pub group_by: String,
    #[serde(rename = "where", default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<FilterNode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_range: Option<DateRange>,
}

impl SummaryRequest {
    pub fn new(group_by: impl Into<String>) -> Self {
        Self {
            group_by: group_by.into(),
            filter: None,
            date_range: None,
        }
    }

    pub fn filter(mut self, filter: FilterNode) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn date_range(mut self, range: DateRange) -> Self {
        self.date_range = Some(range);
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryItem {
    pub group: String,
    pub count: u64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryResponse {
    pub total: u64,
    pub groups: Vec<SummaryItem>,
}

impl SummaryResponse {
    /// Label NULL groups and order by count descending, then label ascending.
    pub fn from_counts(
        total: u64,
        counts: impl IntoIterator<Item = (Option<String>, u64)>,
        null_label: &str,
    ) -> Self {
        let mut groups: Vec<SummaryItem> = counts
            .into_iter()
            .map(|(group, count)| SummaryItem {
                group: group.unwrap_or_else(|| null_label.to_string()),
                count,
            })
            .collect();
        groups.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.group.cmp(&b.group)));
        Self { total, groups }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BreakdownItem {
    pub group: String,
    pub count: u64,
    pub percentage: f64,
}

/// Group counts with each group's share of the total; `total` is the sum of the
/// group counts.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BreakdownResponse {
    pub total: u64,
    pub groups: Vec<BreakdownItem>,
}

impl BreakdownResponse {
    pub fn from_counts(
        counts: impl IntoIterator<Item = (Option<String>, u64)>,
        null_label: &str,
        order_by_count: bool,
    ) -> Self {
        let counts: Vec<(String, u64)> = counts
            .into_iter()
            .map(|(g, c)| (g.unwrap_or_else(|| null_label.to_string()), c))
            .collect();
        let total: u64 = counts.iter().map(|(_, c)| *c).sum();

        let mut groups: Vec<BreakdownItem> = counts
            .into_iter()
            .map(|(group, count)| BreakdownItem {
                percentage: percentage(count, total),
                group,
                count,
            })
            .collect();

        if order_by_count {
            groups.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.group.cmp(&b.group)));
        } else {
            groups.sort_by(|a, b| a.group.cmp(&b.group));
        }
        Self { total, groups }
    }
}

/// Share of `total`, rounded to two decimals.
fn percentage(count: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let raw = count as f64 / total as f64 * 100.0;
    (raw * 100.0).round() / 100.0
}
