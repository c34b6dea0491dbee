//! Logging backend for cellglyph.
//!
//! Routes every `log::` record to a debug log file in the temp directory
//! (`cellglyph_debug.log`), so rendering diagnostics never mix with the
//! command's own output. When `RUST_LOG` is set, records are mirrored to
//! stderr as well.
//!
//! The level is resolved in this order:
//! 1. `--log-level` on the command line
//! 2. `DEBUG_LEVEL` environment variable (0-4)
//! 3. `log_level` in the config file, applied once the config is loaded

use parking_lot::Mutex;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use log::{LevelFilter, Log, Metadata, Record};

use crate::config::LogLevel;

/// Debug level configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DebugLevel {
    Off = 0,
    Error = 1,
    Info = 2,
    Debug = 3,
    Trace = 4,
}

impl DebugLevel {
    fn from_env() -> Option<Self> {
        let val = std::env::var("DEBUG_LEVEL").ok()?;
        Self::parse(&val)
    }

    /// Parse a numeric `DEBUG_LEVEL` value.
    pub fn parse(val: &str) -> Option<Self> {
        match val.trim().parse::<u8>() {
            Ok(0) => Some(DebugLevel::Off),
            Ok(1) => Some(DebugLevel::Error),
            Ok(2) => Some(DebugLevel::Info),
            Ok(3) => Some(DebugLevel::Debug),
            Ok(4) => Some(DebugLevel::Trace),
            _ => None,
        }
    }

    pub fn to_level_filter(self) -> LevelFilter {
        match self {
            DebugLevel::Off => LevelFilter::Off,
            DebugLevel::Error => LevelFilter::Error,
            DebugLevel::Info => LevelFilter::Info,
            DebugLevel::Debug => LevelFilter::Debug,
            DebugLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Path of the debug log file.
pub fn log_path() -> PathBuf {
    std::env::temp_dir().join("cellglyph_debug.log")
}

struct DebugLogger {
    file: Mutex<Option<File>>,
    mirror_stderr: bool,
}

impl DebugLogger {
    fn open() -> Option<File> {
        let mut file = OpenOptions::new()
            .write(true)
            .truncate(true)
            .create(true)
            .open(log_path())
            // Logging must never stop a render.
            .ok()?;
        let _ = writeln!(
            file,
            "{}\ncellglyph debug session started at {}\n{}",
            "=".repeat(80),
            get_timestamp(),
            "=".repeat(80)
        );
        Some(file)
    }

    fn ensure_open(&self) {
        let mut file = self.file.lock();
        if file.is_none() {
            *file = Self::open();
        }
    }
}

impl Log for DebugLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format!(
            "[{}] [{:<5}] [{}] {}\n",
            get_timestamp(),
            record.level(),
            record.target(),
            record.args()
        );
        if let Some(file) = self.file.lock().as_mut() {
            let _ = file.write_all(line.as_bytes());
        }
        if self.mirror_stderr {
            eprint!("{line}");
        }
    }

    fn flush(&self) {
        if let Some(file) = self.file.lock().as_mut() {
            let _ = file.flush();
        }
    }
}

static LOGGER: OnceLock<DebugLogger> = OnceLock::new();

/// Set when the level came from the CLI or environment.
static LEVEL_OVERRIDDEN: AtomicBool = AtomicBool::new(false);

fn get_timestamp() -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    format!("{}.{:06}", now.as_secs(), now.subsec_micros())
}

/// Resolve the startup level from the CLI flag and `DEBUG_LEVEL`.
pub fn startup_level(cli_level: Option<LogLevel>) -> Option<LevelFilter> {
    cli_level
        .map(LogLevel::to_level_filter)
        .or_else(|| DebugLevel::from_env().map(DebugLevel::to_level_filter))
}

/// Install the logger. Call once, before anything logs.
pub fn init_log_bridge(cli_level: Option<LogLevel>) {
    let level = startup_level(cli_level);
    LEVEL_OVERRIDDEN.store(level.is_some(), Ordering::Relaxed);
    let level = level.unwrap_or(LevelFilter::Off);

    let logger = LOGGER.get_or_init(|| DebugLogger {
        file: Mutex::new(None),
        mirror_stderr: std::env::var_os("RUST_LOG").is_some(),
    });
    if level != LevelFilter::Off {
        logger.ensure_open();
    }
    if log::set_logger(logger).is_ok() {
        log::set_max_level(level);
    }
}

/// Apply the config file's level unless the CLI or environment chose one.
pub fn apply_config_level(level: LogLevel) {
    if LEVEL_OVERRIDDEN.load(Ordering::Relaxed) {
        return;
    }
    let filter = level.to_level_filter();
    if filter != LevelFilter::Off
        && let Some(logger) = LOGGER.get()
    {
        logger.ensure_open();
    }
    log::set_max_level(filter);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_numeric_levels() {
        assert_eq!(DebugLevel::parse("0"), Some(DebugLevel::Off));
        assert_eq!(DebugLevel::parse(" 3 "), Some(DebugLevel::Debug));
        assert_eq!(DebugLevel::parse("4"), Some(DebugLevel::Trace));
        assert_eq!(DebugLevel::parse("9"), None);
        assert_eq!(DebugLevel::parse("loud"), None);
    }

    #[test]
    fn cli_level_wins() {
        assert_eq!(
            startup_level(Some(LogLevel::Warn)),
            Some(LevelFilter::Warn)
        );
    }

    #[test]
    fn levels_map_to_filters() {
        assert_eq!(DebugLevel::Error.to_level_filter(), LevelFilter::Error);
        assert_eq!(DebugLevel::Info.to_level_filter(), LevelFilter::Info);
        assert!(DebugLevel::Off < DebugLevel::Trace);
    }
}
