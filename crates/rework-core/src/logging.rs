//! Logging module for rework
//!
//! Writes a detailed trace of configuration loading, path and rule
//! resolution and engine runs to a log file, for debugging why a file or a
//! rule was (or was not) scheduled. Every call is a no-op until
//! `init_logger` has been called.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Global logger instance
static LOGGER: Mutex<Option<ReworkLogger>> = Mutex::new(None);

/// Logger for resolution and run operations
pub struct ReworkLogger {
    file: File,
    path: PathBuf,
}

impl ReworkLogger {
    /// Create a new logger writing to the specified path
    pub fn new(log_path: &Path) -> std::io::Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(log_path)?;

        Ok(Self {
            file,
            path: log_path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write a log message
    pub fn log(&mut self, message: &str) {
        let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
        let _ = writeln!(self.file, "[{}] {}", timestamp, message);
        let _ = self.file.flush();
    }

    /// Log a section header
    pub fn section(&mut self, title: &str) {
        let separator = "=".repeat(60);
        self.log(&separator);
        self.log(title);
        self.log(&separator);
    }

    /// Log a subsection
    pub fn subsection(&mut self, title: &str) {
        let separator = "-".repeat(40);
        self.log(&separator);
        self.log(title);
        self.log(&separator);
    }
}

/// Initialize the global logger. Without a path, a timestamped file in the
/// system temp directory is used.
pub fn init_logger(log_path: Option<&Path>) -> std::io::Result<PathBuf> {
    let path = log_path.map(|p| p.to_path_buf()).unwrap_or_else(|| {
        let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
        std::env::temp_dir().join(format!("rework-{}.log", timestamp))
    });

    let logger = ReworkLogger::new(&path)?;

    if let Ok(mut guard) = LOGGER.lock() {
        *guard = Some(logger);
    }

    Ok(path)
}

fn with_logger(f: impl FnOnce(&mut ReworkLogger)) {
    if let Ok(mut guard) = LOGGER.lock() {
        if let Some(ref mut logger) = *guard {
            f(logger);
        }
    }
}

/// Log a message to the global logger
pub fn log(message: &str) {
    with_logger(|logger| logger.log(message));
}

/// Log a section header
pub fn section(title: &str) {
    with_logger(|logger| logger.section(title));
}

/// Log a subsection
pub fn subsection(title: &str) {
    with_logger(|logger| logger.subsection(title));
}

pub fn log_config_load(path: &Path) {
    section("CONFIGURATION LOADING");
    log(&format!("Loading config from: {}", path.display()));
}

pub fn log_include_empty(pattern: &str) {
    log(&format!("WARNING: include pattern matched no files: {}", pattern));
}

pub fn log_path_skipped(path: &Path, reason: &str) {
    log(&format!("SKIPPED: {} ({})", path.display(), reason));
}

pub fn log_rule_skipped(rule: &str, reason: &str) {
    log(&format!("RULE SKIPPED: {} ({})", rule, reason));
}

pub fn log_override_unused(rule: &str) {
    log(&format!(
        "Override for {} has no effect: rule is not selected",
        rule
    ));
}

pub fn log_applicability_error(path: &Path, rule: &str, error: &str) {
    log(&format!(
        "APPLICABILITY FAILED: {} / {} - {}",
        path.display(),
        rule,
        error
    ));
}

/// Log summary of a resolution
pub fn log_resolution_summary(files: usize, rules: usize, items: usize, diagnostics: usize) {
    section("RESOLUTION SUMMARY");
    log(&format!("Files resolved: {}", files));
    log(&format!("Rules resolved: {}", rules));
    log(&format!("Work items: {}", items));
    log(&format!("Diagnostics: {}", diagnostics));
}

pub fn log_run_start(items: usize, mode: &str) {
    section("RUN START");
    log(&format!("Processing {} work items ({})", items, mode));
}

pub fn log_engine_outcome(path: &Path, rule: &str, outcome: &str) {
    log(&format!("{}: {} / {}", outcome, path.display(), rule));
}

pub fn log_run_complete(changed: usize, unchanged: usize, failed: usize) {
    section("RUN COMPLETE");
    log(&format!("Changed: {}", changed));
    log(&format!("Unchanged: {}", unchanged));
    log(&format!("Failed: {}", failed));
}
