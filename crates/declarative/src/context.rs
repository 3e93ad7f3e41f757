//! Reconciliation context and the logger seam
//!
//! Properties never read process-wide state. The caller passes a
//! [`ReconcileContext`] carrying the global no-op flag and the logger.

use serde::{Serialize, Serializer};
use std::sync::{Mutex, PoisonError};

/// A structured log record emitted on behalf of a property
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogRecord {
    #[serde(serialize_with = "serialize_level")]
    pub level: log::Level,
    pub message: String,
    /// Path of the property that emitted the record (e.g. "user[bob]/uid")
    pub source: String,
}

fn serialize_level<S: Serializer>(level: &log::Level, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(level.as_str())
}

/// Sink for property log records
///
/// Logging is fire-and-forget: implementations must not fail.
pub trait Logger: Send + Sync {
    fn log(&self, record: &LogRecord);
}

/// Logger that forwards to the `log` facade
pub struct LogFacade;

impl Logger for LogFacade {
    fn log(&self, record: &LogRecord) {
        log::log!(target: "declarative", record.level, "{}: {}", record.source, record.message);
    }
}

/// Logger that keeps records in memory
#[derive(Default)]
pub struct MemoryLogger {
    records: Mutex<Vec<LogRecord>>,
}

impl MemoryLogger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything logged so far
    pub fn records(&self) -> Vec<LogRecord> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Logger for MemoryLogger {
    fn log(&self, record: &LogRecord) {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(record.clone());
    }
}

/// Explicit inputs for property operations
pub struct ReconcileContext<'a> {
    /// Process-wide no-op: report changes but never enforce them
    pub noop: bool,
    /// Where property log records go
    pub logger: &'a dyn Logger,
}

impl<'a> ReconcileContext<'a> {
    pub fn new(logger: &'a dyn Logger) -> Self {
        Self {
            noop: false,
            logger,
        }
    }

    pub fn with_noop(mut self, noop: bool) -> Self {
        self.noop = noop;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_logger_collects() {
        let logger = MemoryLogger::new();
        logger.log(&LogRecord {
            level: log::Level::Info,
            message: "hello".into(),
            source: "user[bob]/uid".into(),
        });
        let records = logger.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].message, "hello");
    }

    #[test]
    fn test_record_serializes_level_as_text() {
        let record = LogRecord {
            level: log::Level::Warn,
            message: "m".into(),
            source: "s".into(),
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["level"], "WARN");
        assert_eq!(json["source"], "s");
    }

    #[test]
    fn test_context_noop_defaults_off() {
        let logger = MemoryLogger::new();
        let ctx = ReconcileContext::new(&logger);
        assert!(!ctx.noop);
        assert!(ctx.with_noop(true).noop);
    }
}
