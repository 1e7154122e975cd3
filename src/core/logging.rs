//! Logging initialisation built on flexi_logger
//!
//! The rest of the codebase logs through the `log` macro facade; this module
//! owns the single flexi_logger backend and its runtime handle.

use flexi_logger::{DeferredNow, FileSpec, Logger, LoggerHandle, Record};

// Global handle so the logger outlives startup and can be adjusted at runtime.
static LOGGER_HANDLE: std::sync::OnceLock<std::sync::Mutex<LoggerHandle>> =
    std::sync::OnceLock::new();

fn simple_format(
    w: &mut dyn std::io::Write,
    _now: &mut DeferredNow,
    record: &Record,
) -> Result<(), std::io::Error> {
    write!(
        w,
        "{} [{}] {}",
        chrono::Local::now().format("%H:%M:%S%.3f"),
        record.level(),
        record.args()
    )
}

fn extended_format(
    w: &mut dyn std::io::Write,
    _now: &mut DeferredNow,
    record: &Record,
) -> Result<(), std::io::Error> {
    write!(
        w,
        "{} [{}][{}] {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
        record.target(),
        record.level(),
        record.args()
    )
}

/// Initialise the global logger
///
/// `log_level` accepts any flexi_logger level spec ("info", "debug",
/// "notiq=trace", ...). When `log_file` is given output goes to that file,
/// otherwise to stderr. May only be called once per process; subsequent
/// level changes go through [`set_log_level`].
pub fn init_logging(
    log_level: Option<&str>,
    log_format: Option<&str>,
    log_file: Option<&std::path::Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut logger = Logger::try_with_str(log_level.unwrap_or("info"))?;

    logger = match log_format {
        Some("ext") => logger.format(extended_format),
        _ => logger.format(simple_format),
    };

    if let Some(path) = log_file {
        logger = logger.log_to_file(FileSpec::try_from(path)?);
    }

    let handle = logger.start()?;
    let _ = LOGGER_HANDLE.set(std::sync::Mutex::new(handle));

    Ok(())
}

/// Adjust the log level of the already-running logger
pub fn set_log_level(level: &str) -> Result<(), Box<dyn std::error::Error>> {
    let handle_mutex = LOGGER_HANDLE
        .get()
        .ok_or("Logger not initialised. Call init_logging first.")?;
    let mut handle = handle_mutex
        .lock()
        .map_err(|_| "Could not acquire logger handle lock")?;
    handle.parse_and_push_temp_spec(level)?;
    Ok(())
}
