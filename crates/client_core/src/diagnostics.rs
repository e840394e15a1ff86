//! Leveled diagnostics sink injected into the conversion controller.

use tracing::{debug, error, info, warn};

pub const DEFAULT_LOG_TAG: &str = "ReactApp";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

pub trait DiagnosticsSink: Send + Sync {
    fn log(&self, level: LogLevel, message: &str);

    fn debug(&self, message: &str) {
        self.log(LogLevel::Debug, message);
    }

    fn info(&self, message: &str) {
        self.log(LogLevel::Info, message);
    }

    fn warn(&self, message: &str) {
        self.log(LogLevel::Warn, message);
    }

    fn error(&self, message: &str) {
        self.log(LogLevel::Error, message);
    }
}

/// Forwards diagnostics to `tracing`, prefixing every message with `[<tag>]: `.
#[derive(Debug, Clone)]
pub struct TracingDiagnostics {
    tag: String,
}

impl TracingDiagnostics {
    pub fn new(tag: impl Into<String>) -> Self {
        Self { tag: tag.into() }
    }
}

impl Default for TracingDiagnostics {
    fn default() -> Self {
        Self::new(DEFAULT_LOG_TAG)
    }
}

impl DiagnosticsSink for TracingDiagnostics {
    fn log(&self, level: LogLevel, message: &str) {
        let tag = &self.tag;
        match level {
            LogLevel::Debug => debug!("[{tag}]: {message}"),
            LogLevel::Info => info!("[{tag}]: {message}"),
            LogLevel::Warn => warn!("[{tag}]: {message}"),
            LogLevel::Error => error!("[{tag}]: {message}"),
        }
    }
}
