use crate::config::{LoggingConfig, Section};
use std::io::IsTerminal;
use tracing::Level;
use tracing_subscriber::filter::FilterFn;

// -------- level helpers --------
fn parse_tracing_level(s: &str) -> Option<tracing::Level> {
    match s.to_ascii_lowercase().as_str() {
        "trace" => Some(Level::TRACE),
        "debug" => Some(Level::DEBUG),
        "info" => Some(Level::INFO),
        "warn" => Some(Level::WARN),
        "error" => Some(Level::ERROR),
        "off" | "none" => None,
        _ => Some(Level::INFO),
    }
}

// -------- filtering functions --------

type CrateFilter = FilterFn<Box<dyn Fn(&tracing::Metadata<'_>) -> bool + Send + Sync + 'static>>;

/// Everything not owned by an explicitly configured crate, up to `max_level`.
fn create_default_filter_for_crates(
    crate_names: &[String],
    max_level: tracing::Level,
) -> CrateFilter {
    let crates = crate_names.to_vec();
    FilterFn::new(Box::new(move |meta: &tracing::Metadata<'_>| {
        let t = meta.target();
        if crates.iter().any(|c| matches_crate_prefix(t, c)) {
            return false;
        }
        meta.level() <= &max_level
    }))
}

/// Returns true if target == crate_name or target starts with "crate_name::"
fn matches_crate_prefix(target: &str, crate_name: &str) -> bool {
    target == crate_name
        || (target.starts_with(crate_name) && target[crate_name.len()..].starts_with("::"))
}

// -------- config extraction --------

struct ConfigData<'a> {
    default_section: Option<&'a Section>,
    crate_sections: Vec<(String, &'a Section)>,
    crate_names: Vec<String>,
}

fn extract_config_data(cfg: &LoggingConfig) -> ConfigData<'_> {
    let mut crate_sections = cfg
        .iter()
        .filter(|(k, _)| k.as_str() != "default")
        .map(|(k, v)| (k.clone(), v))
        .collect::<Vec<_>>();
    crate_sections.sort_by(|a, b| a.0.cmp(&b.0));

    let crate_names = crate_sections.iter().map(|(n, _)| n.clone()).collect();

    ConfigData {
        default_section: cfg.get("default"),
        crate_sections,
        crate_names,
    }
}

fn build_console_targets(config: &ConfigData) -> tracing_subscriber::filter::Targets {
    use tracing::level_filters::LevelFilter;
    use tracing_subscriber::filter::Targets;

    let mut targets = Targets::new().with_default(LevelFilter::OFF);
    for (crate_name, section) in &config.crate_sections {
        if let Some(level) =
            parse_tracing_level(&section.console_level).map(LevelFilter::from_level)
        {
            targets = targets.with_target(crate_name.clone(), level);
        }
    }
    targets
}

// -------- public init --------

/// Initialize logging from a configuration.
///
/// Explicit subsystem sections get their own level; the "default" section
/// covers every other target. Safe to call more than once: only the first
/// subscriber is installed.
pub fn init_logging_from_config(cfg: &LoggingConfig) {
    // Bridge `log` → `tracing` *before* installing the subscriber
    let _ = tracing_log::LogTracer::init();

    if cfg.is_empty() {
        init_default_logging();
        return;
    }

    let config_data = extract_config_data(cfg);
    let console_targets = build_console_targets(&config_data);
    build_logging_layers(config_data, console_targets);
}

fn init_default_logging() {
    use tracing_subscriber::fmt;
    let _ = fmt()
        .with_target(true)
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .try_init();
}

fn build_logging_layers(config: ConfigData, console_targets: tracing_subscriber::filter::Targets) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, prelude::*, Layer, Registry};

    let ansi = std::io::stdout().is_terminal();
    let json = config
        .default_section
        .map(|s| s.json)
        .unwrap_or(false)
        || config.crate_sections.iter().any(|(_, s)| s.json);

    let layer = |filter: CrateFilterOrTargets| -> Box<dyn Layer<Registry> + Send + Sync> {
        let base = fmt::layer()
            .with_target(true)
            .with_level(true)
            .with_timer(fmt::time::UtcTime::rfc_3339());
        match (json, filter) {
            (true, CrateFilterOrTargets::Targets(t)) => {
                base.json().with_ansi(false).with_filter(t).boxed()
            }
            (true, CrateFilterOrTargets::Default(f)) => {
                base.json().with_ansi(false).with_filter(f).boxed()
            }
            (false, CrateFilterOrTargets::Targets(t)) => base.with_ansi(ansi).with_filter(t).boxed(),
            (false, CrateFilterOrTargets::Default(f)) => base.with_ansi(ansi).with_filter(f).boxed(),
        }
    };

    let mut layers = vec![layer(CrateFilterOrTargets::Targets(console_targets))];
    if let Some(level) = config
        .default_section
        .and_then(|s| parse_tracing_level(&s.console_level))
    {
        layers.push(layer(CrateFilterOrTargets::Default(
            create_default_filter_for_crates(&config.crate_names, level),
        )));
    }

    let _ = Registry::default().with(layers).try_init();
}

enum CrateFilterOrTargets {
    Targets(tracing_subscriber::filter::Targets),
    Default(CrateFilter),
}

// =================== tests ===================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_logging_config;

    fn section(level: &str) -> Section {
        Section {
            console_level: level.into(),
            json: false,
        }
    }

    #[test]
    fn test_logging_level_parsing() {
        assert_eq!(parse_tracing_level("trace"), Some(Level::TRACE));
        assert_eq!(parse_tracing_level("DEBUG"), Some(Level::DEBUG));
        assert_eq!(parse_tracing_level("Info"), Some(Level::INFO));
        assert_eq!(parse_tracing_level("warn"), Some(Level::WARN));
        assert_eq!(parse_tracing_level("ERROR"), Some(Level::ERROR));
        assert_eq!(parse_tracing_level("off"), None);
        assert_eq!(parse_tracing_level("none"), None);
        assert_eq!(parse_tracing_level("invalid"), Some(Level::INFO)); // defaults to INFO
    }

    #[test]
    fn test_crate_prefix_matching() {
        assert!(matches_crate_prefix("query_db", "query_db"));
        assert!(matches_crate_prefix("query_db::list", "query_db"));
        assert!(!matches_crate_prefix("query_db_extra", "query_db"));
        assert!(!matches_crate_prefix("usuarios::domain", "query_db"));
    }

    #[test]
    fn test_extract_config_data() {
        let mut cfg = default_logging_config();
        cfg.insert("query_db".into(), section("debug"));
        cfg.insert("usuarios".into(), section("off"));

        let data = extract_config_data(&cfg);
        assert!(data.default_section.is_some());
        assert_eq!(
            data.crate_names,
            vec!["query_db".to_string(), "usuarios".to_string()]
        );
    }

    #[test]
    fn test_init_is_idempotent() {
        let mut cfg = default_logging_config();
        cfg.insert("query_db".into(), section("debug"));
        init_logging_from_config(&cfg);
        init_logging_from_config(&cfg);
        init_logging_from_config(&LoggingConfig::new());
        tracing::info!("logging initialized");
    }
}
