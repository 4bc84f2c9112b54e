//! File logging for the `tsel` binary
//!
//! stdout is taken by the TUI or by headless NDJSON output, so every log
//! line goes to a daily file under the platform data directory instead.

use std::path::PathBuf;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::error::Result;

/// Environment variable holding an `EnvFilter` directive
pub const LOG_ENV: &str = "TSEL_LOG";

const LOG_FILE_PREFIX: &str = "tsel.log";
const DEFAULT_DIRECTIVE: &str =
    "tsel=info,target_select=info,tsel_app=info,tsel_client=info,tsel_tui=info,warn";

/// Install the global subscriber.
///
/// `TSEL_LOG=tsel_app=debug tsel` shows every reconciled discovery event
/// and store echo.
pub fn init() -> Result<()> {
    let log_dir = log_directory();
    std::fs::create_dir_all(&log_dir)?;

    let appender = RollingFileAppender::new(Rotation::DAILY, &log_dir, LOG_FILE_PREFIX);

    tracing_subscriber::registry()
        .with(filter_from(std::env::var(LOG_ENV).ok().as_deref()))
        .with(
            fmt::layer()
                .with_writer(appender)
                .with_ansi(false)
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .with_timer(fmt::time::ChronoLocal::new(
                    "%Y-%m-%d %H:%M:%S%.3f".to_string(),
                )),
        )
        .init();

    tracing::info!(
        "tsel {} logging to {}",
        env!("CARGO_PKG_VERSION"),
        log_dir.display()
    );
    Ok(())
}

/// Directive from the environment, or the default when unset or unparsable.
fn filter_from(directive: Option<&str>) -> EnvFilter {
    directive
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_DIRECTIVE))
}

/// `<data_local_dir>/target-select/logs`, or `./target-select/logs` on
/// platforms without one.
pub fn log_directory() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("target-select")
        .join("logs")
}
