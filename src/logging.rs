/// Structured logging for the rainfall map pipeline
///
/// Provides context-rich logging tagged with the pipeline stage and, where
/// relevant, the district name being processed. Supports console output and
/// an optional append-only log file for batch runs.

use chrono::Utc;
use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::str::FromStr;
use std::sync::Mutex;

use crate::reconcile::Diagnostics;

// ---------------------------------------------------------------------------
// Log Levels
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Debug => write!(f, "DEBUG"),
            LogLevel::Info => write!(f, "INFO"),
            LogLevel::Warning => write!(f, "WARN"),
            LogLevel::Error => write!(f, "ERROR"),
        }
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warning),
            "error" => Ok(LogLevel::Error),
            other => Err(format!("unknown log level '{}'", other)),
        }
    }
}

// ---------------------------------------------------------------------------
// Pipeline Stages
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Rainfall,
    Boundary,
    Reconcile,
    Classify,
    Export,
    System,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Rainfall => write!(f, "RAIN"),
            Stage::Boundary => write!(f, "GEO"),
            Stage::Reconcile => write!(f, "MATCH"),
            Stage::Classify => write!(f, "CLASS"),
            Stage::Export => write!(f, "OUT"),
            Stage::System => write!(f, "SYS"),
        }
    }
}

// ---------------------------------------------------------------------------
// Logger Configuration
// ---------------------------------------------------------------------------

/// Global logger instance
static LOGGER: Mutex<Option<Logger>> = Mutex::new(None);

pub struct Logger {
    /// Minimum log level to display
    min_level: LogLevel,
    /// Optional file path for logging
    log_file: Option<String>,
    /// Whether to include timestamps in console output
    console_timestamps: bool,
}

impl Logger {
    /// Initialize the global logger
    pub fn init(min_level: LogLevel, log_file: Option<String>, console_timestamps: bool) {
        let logger = Logger {
            min_level,
            log_file,
            console_timestamps,
        };

        if let Ok(mut slot) = LOGGER.lock() {
            *slot = Some(logger);
        }
    }

    /// Formats a single log line. Separated from `log` so the layout can be
    /// tested without touching stdout or the filesystem.
    fn format_entry(level: LogLevel, stage: Stage, district: Option<&str>, message: &str) -> String {
        let timestamp = Utc::now().format("%Y-%m-%d %H:%M:%S UTC");
        let district_part = district.map(|d| format!(" [{}]", d)).unwrap_or_default();
        format!("{} {} {}{}: {}", timestamp, level, stage, district_part, message)
    }

    fn log(&self, level: LogLevel, stage: Stage, district: Option<&str>, message: &str) {
        if level < self.min_level {
            return;
        }

        let log_entry = Self::format_entry(level, stage, district, message);
        let district_part = district.map(|d| format!(" [{}]", d)).unwrap_or_default();

        // Console output
        if self.console_timestamps {
            match level {
                LogLevel::Error => eprintln!("{}", log_entry),
                LogLevel::Warning => eprintln!("   {}", log_entry),
                LogLevel::Info => println!("   {}", message),
                LogLevel::Debug => println!("   [DEBUG] {}", message),
            }
        } else {
            match level {
                LogLevel::Error => eprintln!("   ✗ {}{}: {}", stage, district_part, message),
                LogLevel::Warning => eprintln!("   ⚠ {}{}: {}", stage, district_part, message),
                LogLevel::Info => println!("   {}", message),
                LogLevel::Debug => println!("   [DEBUG] {}{}: {}", stage, district_part, message),
            }
        }

        // File output
        if let Some(ref path) = self.log_file {
            if let Err(e) = Self::append_to_file(path, &log_entry) {
                eprintln!("Failed to write to log file {}: {}", path, e);
            }
        }
    }

    fn append_to_file(path: &str, entry: &str) -> std::io::Result<()> {
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        writeln!(file, "{}", entry)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Public Logging Functions
// ---------------------------------------------------------------------------

/// Initialize the global logger
pub fn init_logger(min_level: LogLevel, log_file: Option<&str>, console_timestamps: bool) {
    Logger::init(min_level, log_file.map(String::from), console_timestamps);
}

fn emit(level: LogLevel, stage: Stage, district: Option<&str>, message: &str) {
    if let Ok(guard) = LOGGER.lock() {
        if let Some(logger) = guard.as_ref() {
            logger.log(level, stage, district, message);
        }
    }
}

/// Log a general informational message
pub fn info(stage: Stage, district: Option<&str>, message: &str) {
    emit(LogLevel::Info, stage, district, message);
}

/// Log a warning message
pub fn warn(stage: Stage, district: Option<&str>, message: &str) {
    emit(LogLevel::Warning, stage, district, message);
}

/// Log an error message
pub fn error(stage: Stage, district: Option<&str>, message: &str) {
    emit(LogLevel::Error, stage, district, message);
}

/// Log a debug message
pub fn debug(stage: Stage, district: Option<&str>, message: &str) {
    emit(LogLevel::Debug, stage, district, message);
}

// ---------------------------------------------------------------------------
// Reconciliation Summary Logging
// ---------------------------------------------------------------------------

/// Severity of a finished reconciliation, judged by how much of the map
/// ended up without data.
pub fn summary_level(matched: usize, total: usize, diagnostics: &Diagnostics) -> LogLevel {
    if matched == 0 {
        LogLevel::Error
    } else if matched < total || !diagnostics.is_clean() {
        LogLevel::Warning
    } else {
        LogLevel::Info
    }
}

/// Log a one-line summary of a reconciliation run
pub fn log_reconcile_summary(matched: usize, total: usize, diagnostics: &Diagnostics) {
    let message = format!(
        "Reconciliation complete: {}/{} districts with data, {} unresolved, {} ambiguous, {} out of range, {} collisions",
        matched,
        total,
        diagnostics.unresolved.len(),
        diagnostics.ambiguous.len(),
        diagnostics.out_of_range.len(),
        diagnostics.collisions.len(),
    );

    emit(summary_level(matched, total, diagnostics), Stage::Reconcile, None, &message);
}
