//! Deploy Log Port
//!
//! Leveled, run-scoped log of everything a run does. The core writes to
//! it; it neither opens nor formats the sink.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    /// Command lines and raw output
    Debug,
    Info,
    Success,
    Warning,
    Error,
}

impl LogLevel {
    pub fn tag(self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Success => "SUCCESS",
            LogLevel::Warning => "WARNING",
            LogLevel::Error => "ERROR",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Trait for receiving log records
///
/// Implementations:
/// - FileLog: durable, timestamped run log
/// - ConsoleLog: colored terminal output
/// - TeeLog: fan-out to several sinks
/// - NoopLog: silent operation
pub trait DeployLog: Send + Sync {
    fn record(&self, level: LogLevel, message: &str);

    fn debug(&self, message: &str) {
        self.record(LogLevel::Debug, message);
    }

    fn info(&self, message: &str) {
        self.record(LogLevel::Info, message);
    }

    fn success(&self, message: &str) {
        self.record(LogLevel::Success, message);
    }

    fn warning(&self, message: &str) {
        self.record(LogLevel::Warning, message);
    }

    fn error(&self, message: &str) {
        self.record(LogLevel::Error, message);
    }
}

/// No-op log for silent operation
pub struct NoopLog;

impl DeployLog for NoopLog {
    fn record(&self, _level: LogLevel, _message: &str) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    struct RecordingLog {
        records: Arc<Mutex<Vec<(LogLevel, String)>>>,
    }

    impl DeployLog for RecordingLog {
        fn record(&self, level: LogLevel, message: &str) {
            self.records.lock().unwrap().push((level, message.to_string()));
        }
    }

    #[test]
    fn convenience_methods_set_level() {
        let records = Arc::new(Mutex::new(Vec::new()));
        let log = RecordingLog {
            records: records.clone(),
        };

        log.success("deployed");
        log.warning("proxy unreachable");

        let recorded = records.lock().unwrap();
        assert_eq!(recorded[0], (LogLevel::Success, "deployed".to_string()));
        assert_eq!(recorded[1].0, LogLevel::Warning);
    }

    #[test]
    fn levels_are_ordered_by_severity() {
        assert!(LogLevel::Debug < LogLevel::Info);
        assert!(LogLevel::Warning < LogLevel::Error);
    }
}
