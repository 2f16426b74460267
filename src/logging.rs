use std::fs;

use medadmin_config::LogConfig;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Installs the global subscriber.
///
/// Console output goes to stderr so command output on stdout stays clean.
/// Unless disabled, errors are also written to `medadmin.log` and structured
/// events to `medadmin.json`, both rotated daily under the log directory.
pub fn init_tracing(config: &LogConfig) -> anyhow::Result<()> {
    let console_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "{}={},medadmin_auth={},reqwest=warn,hyper=warn",
            env!("CARGO_CRATE_NAME"),
            config.level,
            config.level
        ))
    });

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .compact()
        .with_filter(console_filter);

    if !config.file_output {
        tracing_subscriber::registry().with(console_layer).try_init()?;
        return Ok(());
    }

    fs::create_dir_all(&config.log_dir).map_err(|e| {
        anyhow::anyhow!(
            "Failed to create logs directory {}: {}",
            config.log_dir.display(),
            e
        )
    })?;

    // File layer for errors
    let file_appender = RollingFileAppender::new(Rotation::DAILY, &config.log_dir, "medadmin.log");

    let file_layer = fmt::layer()
        .with_writer(file_appender)
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(false)
        .with_filter(EnvFilter::new("error"));

    // JSON file layer for structured logs
    let json_appender =
        RollingFileAppender::new(Rotation::DAILY, &config.log_dir, "medadmin.json");

    let json_layer = fmt::layer()
        .json()
        .with_writer(json_appender)
        .with_current_span(true)
        .with_span_list(true)
        .with_filter(EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .with(json_layer)
        .try_init()?;

    Ok(())
}
