//! Fan-out log

use std::sync::Arc;

use crate::domain::ports::{DeployLog, LogLevel};

/// Forwards every record to each sink, in order
#[derive(Default)]
pub struct TeeLog {
    sinks: Vec<Arc<dyn DeployLog>>,
}

impl TeeLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, sink: Arc<dyn DeployLog>) -> Self {
        self.sinks.push(sink);
        self
    }
}

impl DeployLog for TeeLog {
    fn record(&self, level: LogLevel, message: &str) {
        for sink in &self.sinks {
            sink.record(level, message);
        }
    }
}
