use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;

/// Initialize tracing with file rotation
///
/// Logs are written to `<config dir>/<app_name>/logs/`:
/// - macOS: ~/Library/Application Support/
/// - Windows: %APPDATA%/
/// - Linux: ~/.config/
///
/// Files rotate daily (`<app_name>.YYYY-MM-DD.log`). Debug builds also log to
/// the console. The filter honours `RUST_LOG` and defaults to `info`.
///
/// Keep the returned guard alive for the lifetime of the program; dropping it
/// flushes and stops the background writer.
pub fn init_tracing(app_name: &str) -> WorkerGuard {
    let log_dir = default_log_dir(app_name);
    init_tracing_in(&log_dir, app_name)
}

/// Log directory used by [`init_tracing`]
pub fn default_log_dir(app_name: &str) -> PathBuf {
    dirs::config_dir()
        .map(|dir| dir.join(app_name).join("logs"))
        .unwrap_or_else(|| PathBuf::from("logs"))
}

/// Same as [`init_tracing`], writing into `log_dir`.
///
/// Calling this twice keeps the first subscriber.
pub fn init_tracing_in(log_dir: &Path, app_name: &str) -> WorkerGuard {
    use tracing_appender::rolling;
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    if let Err(e) = std::fs::create_dir_all(log_dir) {
        eprintln!("Warning: Failed to create log directory: {}", e);
    }

    let file_appender = rolling::daily(log_dir, format!("{}.log", app_name));
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let file_layer = fmt::layer()
        .with_writer(file_writer)
        .with_ansi(false)
        .with_target(true)
        .with_line_number(true);

    #[cfg(debug_assertions)]
    let result = {
        let console_layer = fmt::layer()
            .with_writer(std::io::stdout)
            .with_ansi(true)
            .with_target(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .with(console_layer)
            .try_init()
    };

    #[cfg(not(debug_assertions))]
    let result = tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .try_init();

    match result {
        Ok(()) => tracing::info!("Log directory: {}", log_dir.display()),
        Err(e) => eprintln!("Warning: tracing already initialised: {}", e),
    }

    guard
}
