use anyhow::{Context, Result};
use query_db::QueryConfig;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Application configuration: storage, logging and the query engine section.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Database configuration (optional).
    pub database: Option<DatabaseConfig>,
    /// Logging configuration (optional, uses defaults if None).
    pub logging: Option<LoggingConfig>,
    /// List/summary engine settings.
    #[serde(default)]
    pub query: QueryConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    /// Connection URL, e.g. "sqlite://database/usuarios.db?mode=rwc".
    pub url: String,
    /// Maximum number of pooled connections (defaults to 10).
    pub max_conns: Option<u32>,
    /// Log every SQL statement at debug level.
    #[serde(default)]
    pub log_statements: bool,
}

/// Maps subsystem names (crate targets) to their console level.
/// Key "default" is the catch-all for logs that don't match explicit subsystems.
pub type LoggingConfig = HashMap<String, Section>;

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct Section {
    pub console_level: String, // "info", "debug", "error", "off"
    /// Emit JSON lines instead of the human-readable format.
    #[serde(default)]
    pub json: bool,
}

/// Create a default logging configuration.
pub fn default_logging_config() -> LoggingConfig {
    let mut logging = HashMap::new();
    logging.insert(
        "default".to_string(),
        Section {
            console_level: "info".to_string(),
            json: false,
        },
    );
    logging
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database: Some(DatabaseConfig {
                url: "sqlite://database/usuarios.db?mode=rwc".to_string(),
                max_conns: Some(10),
                log_statements: false,
            }),
            logging: Some(default_logging_config()),
            query: QueryConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration with layered loading: defaults → YAML file → environment variables.
    /// The `query` section is range-checked after the merge.
    pub fn load_layered<P: AsRef<Path>>(config_path: P) -> Result<Self> {
        use figment::{
            providers::{Env, Format, Serialized, Yaml},
            Figment,
        };

        // Optional sections stay None unless YAML/ENV provide them.
        let base = AppConfig {
            database: None,
            logging: None,
            query: QueryConfig::default(),
        };

        let figment = Figment::new()
            .merge(Serialized::defaults(base))
            .merge(Yaml::file(config_path.as_ref()))
            // Example: APP__QUERY__MAX_PAGE_SIZE=200 maps to query.max_page_size
            .merge(Env::prefixed("APP__").split("__"));

        let config: AppConfig = figment
            .extract()
            .with_context(|| "Failed to extract config from figment".to_string())?;

        config
            .query
            .validate()
            .context("Invalid 'query' section")?;

        Ok(config)
    }
}
