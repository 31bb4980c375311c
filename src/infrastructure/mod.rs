//! Infrastructure Layer
//!
//! Concrete implementations of domain ports.
//! This layer handles all I/O operations.
//!
//! ## Structure
//!
//! - `ssh` - Remote shell over ssh/sshpass, rsync transfers
//! - `git` - Source repository backed by the git CLI
//! - `log/` - Deploy log sinks (file, console, tee)

pub mod git;
pub mod log;
pub mod ssh;

// Re-export for convenience
pub use git::GitCli;
pub use log::{ConsoleLog, FileLog, TeeLog};
pub use ssh::{SshConnector, SshSession};
