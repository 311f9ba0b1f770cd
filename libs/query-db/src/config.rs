//! Query engine configuration.
//!
//! Lives under the `query` key of the application configuration:
//!
//! ```yaml
//! query:
//!   default_page_size: 25
//!   max_page_size: 500
//!   unclassified_label: "Sin clasificar"
//! ```
//!
//! Every field is optional; missing fields fall back to [`QueryConfig::default`].

use figment::Figment;
use query_core::{
    DEFAULT_DATE_FIELD, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, UNCLASSIFIED_LABEL, UNDEFINED_LABEL,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const CONFIG_SECTION: &str = "query";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields, default)]
pub struct QueryConfig {
    /// Page size used when the request carries no pagination.
    pub default_page_size: u64,
    /// Upper bound for any requested page size.
    pub max_page_size: u64,
    /// Group label for NULL values in a summary.
    pub unclassified_label: String,
    /// Group label for NULL values in a breakdown.
    pub undefined_label: String,
    /// Date field used by a date range that names none.
    pub default_date_field: String,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            default_page_size: DEFAULT_PAGE_SIZE,
            max_page_size: MAX_PAGE_SIZE,
            unclassified_label: UNCLASSIFIED_LABEL.to_string(),
            undefined_label: UNDEFINED_LABEL.to_string(),
            default_date_field: DEFAULT_DATE_FIELD.to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration: {0}")]
    Figment(#[from] figment::Error),

    #[error("invalid 'query' configuration: {0}")]
    Invalid(#[from] serde_json::Error),

    #[error("invalid 'query' configuration: {0}")]
    OutOfRange(String),
}

impl QueryConfig {
    /// Read the `query` section from a Figment; an absent section yields defaults.
    pub fn from_figment(figment: &Figment) -> Result<Self, ConfigError> {
        let all: serde_json::Value = figment.extract()?;
        let cfg = match all.get(CONFIG_SECTION) {
            Some(section) if !section.is_null() => serde_json::from_value(section.clone())?,
            _ => Self::default(),
        };
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_page_size == 0 {
            return Err(ConfigError::OutOfRange(
                "max_page_size must be at least 1".into(),
            ));
        }
        if self.default_page_size == 0 || self.default_page_size > self.max_page_size {
            return Err(ConfigError::OutOfRange(format!(
                "default_page_size must be within 1..={}",
                self.max_page_size
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::providers::{Format, Serialized, Yaml};

    #[test]
    fn test_defaults_when_section_missing() {
        let figment = Figment::new().merge(Serialized::defaults(serde_json::json!({
            "logging": { "level": "info" }
        })));
        let cfg = QueryConfig::from_figment(&figment).unwrap();
        assert_eq!(cfg, QueryConfig::default());
        assert_eq!(cfg.max_page_size, 1000);
        assert_eq!(cfg.unclassified_label, "Sin clasificar");
    }

    #[test]
    fn test_partial_section_keeps_defaults() {
        let figment = Figment::new().merge(Yaml::string(
            "query:\n  default_page_size: 25\n  undefined_label: \"n/a\"\n",
        ));
        let cfg = QueryConfig::from_figment(&figment).unwrap();
        assert_eq!(cfg.default_page_size, 25);
        assert_eq!(cfg.undefined_label, "n/a");
        assert_eq!(cfg.max_page_size, 1000);
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let figment = Figment::new().merge(Yaml::string("query:\n  page_sise: 25\n"));
        assert!(matches!(
            QueryConfig::from_figment(&figment),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_default_page_size_above_max_is_rejected() {
        let figment = Figment::new().merge(Yaml::string(
            "query:\n  default_page_size: 50\n  max_page_size: 20\n",
        ));
        assert!(matches!(
            QueryConfig::from_figment(&figment),
            Err(ConfigError::OutOfRange(_))
        ));
    }
}
