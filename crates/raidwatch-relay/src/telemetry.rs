//! Tracing subscriber setup.

use tracing_subscriber::{fmt, EnvFilter};

use crate::config::LoggingSection;

const DEFAULT_FILTER: &str = "info";

/// Filter precedence: `RUST_LOG`, then `logging.filter`, then `info`.
pub fn env_filter(logging: Option<&LoggingSection>) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }
    let directives = logging
        .and_then(|l| l.filter.as_deref())
        .unwrap_or(DEFAULT_FILTER);
    EnvFilter::try_new(directives).unwrap_or_else(|e| {
        eprintln!("invalid logging.filter {directives:?}: {e}; using {DEFAULT_FILTER}");
        EnvFilter::new(DEFAULT_FILTER)
    })
}

pub fn init(logging: Option<&LoggingSection>) {
    let _ = fmt().with_env_filter(env_filter(logging)).try_init();
}
