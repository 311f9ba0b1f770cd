//! Process plumbing shared by query-engine hosts: layered configuration,
//! logging bootstrap and the database handle.

pub mod config;
pub mod db;
pub mod logging;

pub use config::{AppConfig, DatabaseConfig, LoggingConfig, Section};
pub use db::connect;
pub use logging::init_logging_from_config;
