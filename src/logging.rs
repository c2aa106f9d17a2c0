use std::fs::OpenOptions;
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Initialise logging. The level is `info` unless `debug` is set, in which
/// case it is `debug` and `RUST_LOG` may override it.
///
/// When `log_file` is given, output is also appended to that file through a
/// non-blocking writer. Keep the returned guard alive to flush the file on
/// exit. Calling this more than once is harmless; later calls are ignored.
pub fn init(debug: bool, log_file: Option<PathBuf>) -> Option<WorkerGuard> {
    // Without debug logging `RUST_LOG` is ignored so a stray variable in the
    // environment cannot turn on verbose output.
    let filter = if debug {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::new("info")
    };

    let (file_layer, guard) = match log_file.and_then(|path| {
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| eprintln!("failed to open log file {}: {e}", path.display()))
            .ok()
    }) {
        Some(file) => {
            let (writer, guard) = tracing_appender::non_blocking(file);
            let layer = fmt::layer().with_writer(writer).with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .with(file_layer)
        .try_init();
    guard
}
