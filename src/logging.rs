//! Log setup for the binaries.

use std::{fs::OpenOptions, io, path::Path, sync::Arc};

use tracing_subscriber::{
    EnvFilter, Layer, filter::LevelFilter, layer::SubscriberExt, util::SubscriberInitExt,
};

/// Send logs to stderr and append debug logs to the file at `log_path`.
///
/// The stderr output is filtered by `RUST_LOG` and shows warnings and above
/// when it is not set, so that it does not clutter command output.
///
/// # Errors
/// Returns an error if the log file cannot be opened.
pub fn setup_logging(log_path: &Path) -> Result<(), io::Error> {
    let stderr_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy();
    let stderr_log = tracing_subscriber::fmt::layer()
        .pretty()
        .with_writer(io::stderr)
        .with_filter(stderr_filter);

    let log_file = OpenOptions::new().create(true).append(true).open(log_path)?;
    let debug_log = tracing_subscriber::fmt::layer()
        .pretty()
        .with_ansi(false)
        .with_writer(Arc::new(log_file))
        .with_filter(LevelFilter::DEBUG);

    // Ignore a subscriber installed earlier in the same process.
    let _ = tracing_subscriber::registry()
        .with(stderr_log)
        .with(debug_log)
        .try_init();

    Ok(())
}
