use anyhow::{bail, Context, Result};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tracing::info;

use crate::config::DatabaseConfig;

/// Connect to the configured database and return a shareable handle.
///
/// Only sqlite URLs are accepted; that is the only backend compiled in.
pub async fn connect(cfg: &DatabaseConfig) -> Result<DatabaseConnection> {
    let url = cfg.url.trim_start();
    if !url.starts_with("sqlite:") {
        bail!("unsupported database url '{}': only sqlite is enabled", cfg.url);
    }

    let mut opts = ConnectOptions::new(url.to_string());
    opts.sqlx_logging(cfg.log_statements);
    if let Some(n) = cfg.max_conns {
        opts.max_connections(n);
    }
    // Every pooled in-memory connection would otherwise see its own empty database.
    if url.contains(":memory:") {
        opts.max_connections(1).min_connections(1);
    }

    let db = Database::connect(opts)
        .await
        .with_context(|| format!("failed to connect to '{}'", cfg.url))?;
    info!(url = %cfg.url, "database connected");
    Ok(db)
}
