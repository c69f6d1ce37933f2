use crate::config::AppConfig;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::RollingFileAppender;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn file_appender(config: &AppConfig) -> Option<RollingFileAppender> {
    if config.log_dir.is_empty() {
        return None;
    }
    let appender = match config.rotation.as_str() {
        "hourly" => tracing_appender::rolling::hourly(&config.log_dir, &config.log_file),
        "daily" => tracing_appender::rolling::daily(&config.log_dir, &config.log_file),
        _ => tracing_appender::rolling::never(&config.log_dir, &config.log_file),
    };
    Some(appender)
}

/// Install the global subscriber.
///
/// An empty `log_dir` means stdout only. Otherwise the returned guard must
/// outlive all logging or buffered file output is lost.
pub fn init_logging(config: &AppConfig) -> Option<WorkerGuard> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    let registry = tracing_subscriber::registry().with(filter);

    let Some(appender) = file_appender(config) else {
        let stdout_layer = fmt::layer().with_target(false).with_ansi(true);
        registry.with(stdout_layer).init();
        return None;
    };
    let (non_blocking, guard): (NonBlocking, WorkerGuard) = tracing_appender::non_blocking(appender);

    if config.use_json {
        // Target kept for structured queries
        let file_layer = fmt::layer()
            .json()
            .with_target(true)
            .with_writer(non_blocking)
            .with_ansi(false);
        registry.with(file_layer).init();
    } else {
        let file_layer = fmt::layer()
            .with_target(false)
            .with_writer(non_blocking)
            .with_ansi(false);
        let stdout_layer = fmt::layer().with_target(false).with_ansi(true);
        registry.with(file_layer).with(stdout_layer).init();
    }

    Some(guard)
}
