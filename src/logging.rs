use std::path::Path;
use tracing_appender::{
    non_blocking::WorkerGuard,
    rolling::{RollingFileAppender, Rotation},
};
use tracing_subscriber::{filter::EnvFilter, layer::SubscriberExt, util::SubscriberInitExt, Layer};

// Log targets
pub const MENU_TOKENS: &str = "menu_tokens";
pub const MENU_REGION: &str = "menu_region";
pub const MENU_MATCH: &str = "menu_match";
pub const MENU_ASSIGN: &str = "menu_assign";

const ENGINE_TARGETS: &[&str] = &[MENU_TOKENS, MENU_REGION, MENU_MATCH, MENU_ASSIGN];

fn default_filter(verbose: bool) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }
    let engine_level = if verbose { "debug" } else { "info" };
    let directives = std::iter::once("warn".to_string())
        .chain(
            ENGINE_TARGETS
                .iter()
                .map(|t| format!("{}={}", t, engine_level)),
        )
        .collect::<Vec<_>>()
        .join(",");
    EnvFilter::new(directives)
}

/// Installs a stderr subscriber. `RUST_LOG` overrides the default levels.
/// Does nothing if a global subscriber is already set.
pub fn init_logging(verbose: bool) {
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr)
                .with_filter(default_filter(verbose)),
        )
        .try_init();
}

/// Like [`init_logging`], and additionally writes every engine event at
/// trace level to `menu-anchor.log` inside `log_dir`. Keep the returned guard
/// alive for as long as events should be flushed.
pub fn init_logging_with_dir(verbose: bool, log_dir: &Path) -> std::io::Result<WorkerGuard> {
    std::fs::create_dir_all(log_dir)?;

    let file_appender = RollingFileAppender::new(Rotation::NEVER, log_dir, "menu-anchor.log");
    let (non_blocking_appender, guard) = tracing_appender::non_blocking(file_appender);

    let file_directives = ENGINE_TARGETS
        .iter()
        .map(|t| format!("{}=trace", t))
        .collect::<Vec<_>>()
        .join(",");

    let file_layer = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_writer(non_blocking_appender)
        .with_filter(EnvFilter::new(file_directives));

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_writer(std::io::stderr)
        .with_filter(default_filter(verbose));

    let _ = tracing_subscriber::registry()
        .with(file_layer)
        .with(stderr_layer)
        .try_init();

    Ok(guard)
}
