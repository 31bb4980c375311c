//! Deploy log sinks
//!
//! Concrete implementations of `DeployLog`:
//! - FileLog: timestamped run log, one file per run
//! - ConsoleLog: colored terminal output on stderr
//! - TeeLog: fan-out to several sinks

mod console;
mod file;
mod tee;

pub use console::ConsoleLog;
pub use file::FileLog;
pub use tee::TeeLog;
