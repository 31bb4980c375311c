//! File Log
//!
//! Appends `[YYYY-MM-DD HH:MM:SS] [LEVEL] message` lines, flushed per
//! record so the file is complete even if the run is killed.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::Local;

use crate::domain::ports::{DeployLog, LogLevel};
use crate::domain::value_objects::ProjectName;

pub struct FileLog {
    path: PathBuf,
    /// Mutex to ensure thread-safe writes
    writer: Mutex<Box<dyn Write + Send>>,
}

impl FileLog {
    /// Create `<dir>/hoist-<project>-<YYYYmmdd-HHMMSS>.log`
    pub fn create(dir: &Path, project: &ProjectName) -> io::Result<Self> {
        fs::create_dir_all(dir)?;
        let name = format!(
            "hoist-{}-{}.log",
            project,
            Local::now().format("%Y%m%d-%H%M%S")
        );
        let path = dir.join(name);
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(Self {
            path,
            writer: Mutex::new(Box::new(file)),
        })
    }

    /// Log to a custom writer (for testing)
    #[cfg(test)]
    pub fn with_writer<W: Write + Send + 'static>(writer: W) -> Self {
        Self {
            path: PathBuf::new(),
            writer: Mutex::new(Box::new(writer)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DeployLog for FileLog {
    fn record(&self, level: LogLevel, message: &str) {
        let stamp = Local::now().format("%Y-%m-%d %H:%M:%S");
        if let Ok(mut writer) = self.writer.lock() {
            let mut lines = message.lines().peekable();
            if lines.peek().is_none() {
                let _ = writeln!(writer, "[{}] [{}]", stamp, level.tag());
            }
            for line in lines {
                let _ = writeln!(writer, "[{}] [{}] {}", stamp, level.tag(), line);
            }
            let _ = writer.flush();
        }
    }
}
