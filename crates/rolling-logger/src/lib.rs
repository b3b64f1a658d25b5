//! Rolling Logger
//!
//! Installs a global `tracing` subscriber that writes plain-text lines to a
//! size-bounded file in the app's log directory and keeps the most recent
//! lines in memory so they can be shown in the UI. Records emitted through the
//! `log` facade are forwarded into `tracing`.

mod buffer;
mod rolling;

use std::path::Path;
use std::sync::{Mutex, OnceLock};

use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

pub use buffer::{BufferLayer, LineBuffer};
pub use rolling::RollingFile;

/// Rotate the log file once it reaches 5 MiB
pub const DEFAULT_MAX_BYTES: u64 = 5 * 1024 * 1024;
/// Lines kept for [`recent_lines`]
pub const DEFAULT_BUFFER_LINES: usize = 500;

static RECENT: OnceLock<LineBuffer> = OnceLock::new();

struct LocalTime;

impl FormatTime for LocalTime {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        write!(w, "{}", chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"))
    }
}

/// Initialise logging to `<dir>/<app_name>.log` with the default limits.
///
/// The level comes from `RUST_LOG` and defaults to `info`.
pub fn init_logger(dir: impl AsRef<Path>, app_name: &str) -> Result<(), String> {
    init_with_limits(dir.as_ref(), app_name, DEFAULT_MAX_BYTES, DEFAULT_BUFFER_LINES)
}

pub fn init_with_limits(dir: &Path, app_name: &str, max_bytes: u64, buffer_lines: usize) -> Result<(), String> {
    let file = RollingFile::open(dir, app_name, max_bytes)
        .map_err(|e| format!("Failed to open log file in {}: {}", dir.display(), e))?;
    let log_path = file.path().to_path_buf();

    let buffer = RECENT.get_or_init(|| LineBuffer::new(buffer_lines)).clone();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let file_layer = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .with_timer(LocalTime)
        .with_writer(Mutex::new(file));
    let console_layer = cfg!(debug_assertions).then(|| {
        tracing_subscriber::fmt::layer()
            .with_timer(LocalTime)
            .with_writer(std::io::stderr)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(console_layer)
        .with(BufferLayer::new(buffer))
        .try_init()
        .map_err(|e| format!("Logger already initialised: {}", e))?;

    tracing::info!(path = %log_path.display(), "Logging started");
    Ok(())
}

/// Most recent log lines, oldest first. Empty before [`init_logger`].
pub fn recent_lines() -> Vec<String> {
    RECENT.get().map(LineBuffer::snapshot).unwrap_or_default()
}

pub fn info(msg: &str) -> Result<(), String> {
    tracing::info!("{}", msg);
    Ok(())
}

pub fn warn(msg: &str) -> Result<(), String> {
    tracing::warn!("{}", msg);
    Ok(())
}

pub fn error(msg: &str) -> Result<(), String> {
    tracing::error!("{}", msg);
    Ok(())
}
