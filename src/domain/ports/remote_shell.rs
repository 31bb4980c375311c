//! Remote shell port
//!
//! Abstraction over the authenticated channel to the target host. The
//! infrastructure layer provides an ssh-backed session; tests provide
//! in-memory hosts.

use std::path::Path;

use thiserror::Error;

use crate::domain::entities::DeploymentConfig;
use crate::error::HoistError;

/// Captured result of one command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// stdout followed by stderr, for scripts whose streams interleave
    pub fn combined(&self) -> String {
        match (self.stdout.trim_end(), self.stderr.trim_end()) {
            ("", err) => err.to_string(),
            (out, "") => out.to_string(),
            (out, err) => format!("{}\n{}", out, err),
        }
    }
}

/// The channel itself failed (as opposed to a command exiting non-zero)
#[derive(Debug, Error)]
pub enum ShellError {
    #[error("failed to launch {program}: {message}")]
    Launch { program: String, message: String },

    #[error("I/O error on remote channel: {0}")]
    Io(#[from] std::io::Error),
}

/// An established session to one remote host
pub trait RemoteShell {
    /// `user@host` of the session (for messages)
    fn destination(&self) -> String;

    /// Run `command` through the remote login shell
    ///
    /// `stdin` is piped to the command when given. A non-zero exit status
    /// is reported in the output, not as an error.
    fn exec(&self, command: &str, stdin: Option<&str>) -> Result<CommandOutput, ShellError>;

    /// Mirror `local` into `remote_dir`, deleting remote files that no
    /// longer exist locally
    fn sync_dir(&self, local: &Path, remote_dir: &str) -> Result<CommandOutput, ShellError>;
}

/// Opens sessions
pub trait Connector {
    type Session: RemoteShell + 'static;

    /// Authenticate once and return a session reused for the whole run
    fn connect(&self, config: &DeploymentConfig) -> Result<Self::Session, HoistError>;
}
