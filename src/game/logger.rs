//! Game logger with optional in-memory capture
//!
//! Transcript lines, rejected actions, dropped network messages and
//! controller decisions all flow through here. Tests switch the logger to
//! `OutputMode::Memory` and inspect the captured entries.

use crate::game::VerbosityLevel;
use serde::{Deserialize, Serialize};
use std::cell::{Ref, RefCell};
use std::ops::Deref;

/// Category for actions the rules engine refused
pub const CATEGORY_REJECTED: &str = "rejected";
/// Category for transport and session diagnostics
pub const CATEGORY_NETWORK: &str = "network";
/// Category for controller decisions
pub const CATEGORY_CHOICE: &str = "controller_choice";
/// Category for lines mirrored from the game transcript
pub const CATEGORY_TRANSCRIPT: &str = "transcript";

/// Output destination for log messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum OutputMode {
    /// Output only to stdout (default)
    #[default]
    Stdout,
    /// Capture only to in-memory buffer (no stdout)
    Memory,
    /// Both stdout and in-memory buffer
    Both,
}

/// A captured log entry
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub level: VerbosityLevel,
    pub message: String,
    /// Optional category (e.g., "rejected", "network")
    pub category: Option<String>,
}

/// Guard type that provides read-only access to log entries
pub struct LogGuard<'a> {
    guard: Ref<'a, Vec<LogEntry>>,
}

impl<'a> LogGuard<'a> {
    pub fn iter(&self) -> std::slice::Iter<'_, LogEntry> {
        self.guard.iter()
    }

    pub fn len(&self) -> usize {
        self.guard.len()
    }

    pub fn is_empty(&self) -> bool {
        self.guard.is_empty()
    }

    /// Entries tagged with `category`
    pub fn in_category(&self, category: &str) -> Vec<&LogEntry> {
        self.guard
            .iter()
            .filter(|e| e.category.as_deref() == Some(category))
            .collect()
    }
}

impl<'a> Deref for LogGuard<'a> {
    type Target = [LogEntry];

    fn deref(&self) -> &Self::Target {
        &self.guard
    }
}

/// Centralized logger for game events
///
/// Logging takes `&self`; the capture buffer uses interior mutability so
/// read-only paths (validation, rejection) can still report.
pub struct GameLogger {
    verbosity: VerbosityLevel,
    output_mode: OutputMode,
    log_buffer: RefCell<Vec<LogEntry>>,
}

impl GameLogger {
    /// Create a new logger with default verbosity (Normal)
    pub fn new() -> Self {
        Self::with_verbosity(VerbosityLevel::default())
    }

    pub fn with_verbosity(verbosity: VerbosityLevel) -> Self {
        GameLogger {
            verbosity,
            output_mode: OutputMode::default(),
            log_buffer: RefCell::new(Vec::new()),
        }
    }

    pub fn set_output_mode(&mut self, mode: OutputMode) {
        self.output_mode = mode;
    }

    pub fn output_mode(&self) -> OutputMode {
        self.output_mode
    }

    /// Capture to memory only (suppresses stdout)
    pub fn enable_capture(&mut self) {
        self.output_mode = OutputMode::Memory;
    }

    pub fn disable_capture(&mut self) {
        self.output_mode = OutputMode::Stdout;
    }

    pub fn is_capturing(&self) -> bool {
        matches!(self.output_mode, OutputMode::Memory | OutputMode::Both)
    }

    pub fn verbosity(&self) -> VerbosityLevel {
        self.verbosity
    }

    pub fn set_verbosity(&mut self, verbosity: VerbosityLevel) {
        self.verbosity = verbosity;
    }

    /// Access captured log entries
    pub fn logs(&self) -> LogGuard<'_> {
        LogGuard {
            guard: self.log_buffer.borrow(),
        }
    }

    pub fn clear_logs(&mut self) {
        self.log_buffer.borrow_mut().clear();
    }

    /// Print buffered logs the verbosity allows, then clear the buffer
    pub fn flush_buffer(&mut self) {
        for entry in self.log_buffer.borrow().iter() {
            if entry.level <= self.verbosity {
                Self::log_to_stdout(entry.level, &entry.message);
            }
        }
        self.clear_logs();
    }

    #[inline]
    fn log_to_stdout(level: VerbosityLevel, message: &str) {
        if level == VerbosityLevel::Minimal {
            println!("{}", message);
        } else {
            println!("  {}", message);
        }
    }

    fn emit(&self, level: VerbosityLevel, category: Option<&str>, message: &str) {
        if level == VerbosityLevel::Silent {
            return;
        }
        let should_capture = self.is_capturing();
        let should_output = matches!(self.output_mode, OutputMode::Stdout | OutputMode::Both);

        if level > self.verbosity && !should_capture {
            return;
        }

        if should_capture {
            self.log_buffer.borrow_mut().push(LogEntry {
                level,
                message: message.to_string(),
                category: category.map(str::to_string),
            });
        }

        if should_output && level <= self.verbosity {
            Self::log_to_stdout(level, message);
        }
    }

    #[inline]
    pub fn minimal(&self, message: &str) {
        self.emit(VerbosityLevel::Minimal, None, message);
    }

    #[inline]
    pub fn normal(&self, message: &str) {
        self.emit(VerbosityLevel::Normal, None, message);
    }

    #[inline]
    pub fn verbose(&self, message: &str) {
        self.emit(VerbosityLevel::Verbose, None, message);
    }

    /// Echo of a transcript line
    #[inline]
    pub fn transcript(&self, message: &str) {
        if cfg!(feature = "verbose-logging") {
            self.emit(VerbosityLevel::Normal, Some(CATEGORY_TRANSCRIPT), message);
        }
    }

    /// An action refused by the rules engine
    pub fn rejected(&self, message: &str) {
        self.emit(VerbosityLevel::Normal, Some(CATEGORY_REJECTED), message);
    }

    /// Transport/session diagnostics
    pub fn network(&self, message: &str) {
        self.emit(VerbosityLevel::Verbose, Some(CATEGORY_NETWORK), message);
    }

    /// Network problems the user should see (dropped messages, disconnects)
    pub fn network_warning(&self, message: &str) {
        self.emit(VerbosityLevel::Normal, Some(CATEGORY_NETWORK), message);
    }

    /// A controller decision
    pub fn controller_choice(&self, controller_name: &str, message: &str) {
        let formatted = format!("{} chose {}", controller_name, message);
        self.emit(VerbosityLevel::Verbose, Some(CATEGORY_CHOICE), &formatted);
    }
}

impl Default for GameLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for GameLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameLogger")
            .field("verbosity", &self.verbosity)
            .field("output_mode", &self.output_mode)
            .field("log_count", &self.log_buffer.borrow().len())
            .finish()
    }
}

/// Clones carry settings but not captured entries
impl Clone for GameLogger {
    fn clone(&self) -> Self {
        GameLogger {
            verbosity: self.verbosity,
            output_mode: self.output_mode,
            log_buffer: RefCell::new(Vec::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logger_creation() {
        let logger = GameLogger::new();
        assert_eq!(logger.verbosity(), VerbosityLevel::Normal);
        let logger = GameLogger::with_verbosity(VerbosityLevel::Silent);
        assert_eq!(logger.verbosity(), VerbosityLevel::Silent);
    }

    #[test]
    fn test_log_capture() {
        let mut logger = GameLogger::new();
        logger.enable_capture();

        logger.normal("test message");
        logger.minimal("minimal message");

        let logs = logger.logs();
        assert_eq!(logs.len(), 2);
        assert_eq!(logs[0].message, "test message");
        assert_eq!(logs[1].message, "minimal message");
    }

    #[test]
    fn test_categories() {
        let mut logger = GameLogger::with_verbosity(VerbosityLevel::Verbose);
        logger.enable_capture();

        logger.rejected("No buys remaining.");
        logger.network_warning("dropped ACTION from peer-2");
        logger.controller_choice("HeuristicController", "buy Silver");

        let logs = logger.logs();
        assert_eq!(logs.in_category(CATEGORY_REJECTED).len(), 1);
        assert_eq!(logs.in_category(CATEGORY_NETWORK).len(), 1);
        let choices = logs.in_category(CATEGORY_CHOICE);
        assert_eq!(choices[0].message, "HeuristicController chose buy Silver");
    }

    #[test]
    fn test_capture_ignores_verbosity_but_not_silent() {
        let mut logger = GameLogger::with_verbosity(VerbosityLevel::Minimal);
        logger.enable_capture();
        logger.verbose("detail");
        assert_eq!(logger.logs().len(), 1);
        assert_eq!(logger.logs()[0].level, VerbosityLevel::Verbose);
    }

    #[test]
    fn test_flush_buffer_clears() {
        let mut logger = GameLogger::new();
        logger.enable_capture();
        logger.normal("message 1");
        logger.normal("message 2");
        assert_eq!(logger.logs().len(), 2);
        logger.flush_buffer();
        assert!(logger.logs().is_empty());
    }

    #[test]
    fn test_clone_drops_entries() {
        let mut logger = GameLogger::new();
        logger.enable_capture();
        logger.normal("kept in original only");
        let copy = logger.clone();
        assert!(copy.is_capturing());
        assert!(copy.logs().is_empty());
    }
}
