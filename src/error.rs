//! Error types for Hoist
//!
//! Uses `thiserror` for library errors. Every fatal stage failure maps to
//! one `HoistError` variant; variants caused by a command carry the
//! `CommandFailure` so the log and the process exit code can name it.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

use crate::domain::entities::Stage;

/// Result type alias for Hoist operations
pub type HoistResult<T> = Result<T, HoistError>;

/// A local or remote command that did not succeed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandFailure {
    /// Command line as it was logged (secrets already redacted)
    pub command: String,
    /// Exit status, or `None` when the command could not be started
    pub exit_code: Option<i32>,
    /// Captured standard error (or the launch error message)
    pub stderr: String,
}

impl CommandFailure {
    pub fn new(command: impl Into<String>, exit_code: Option<i32>, stderr: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            exit_code,
            stderr: stderr.into(),
        }
    }

    /// Last non-empty line of stderr, for one-line summaries
    pub fn last_stderr_line(&self) -> Option<&str> {
        self.stderr.lines().rev().map(str::trim).find(|l| !l.is_empty())
    }
}

impl fmt::Display for CommandFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.exit_code {
            Some(code) => write!(f, "`{}` exited with status {}", self.command, code)?,
            None => write!(f, "`{}` could not be run", self.command)?,
        }
        if let Some(line) = self.last_stderr_line() {
            write!(f, " ({})", line)?;
        }
        Ok(())
    }
}

/// Main error type for Hoist operations
#[derive(Error, Debug)]
pub enum HoistError {
    /// Missing or invalid input, detected before any stage runs
    #[error("invalid configuration: {message}")]
    Config { message: String },

    /// Clone, fetch or checkout failed
    #[error("failed to fetch source: {message}")]
    Fetch {
        message: String,
        failure: Option<CommandFailure>,
    },

    /// No recognized container build descriptor
    #[error("unsupported project at {}: {reason}", path.display())]
    UnsupportedProject { path: PathBuf, reason: String },

    /// Remote session could not be established
    #[error("cannot connect to {destination}: {message}")]
    Connection {
        destination: String,
        message: String,
        failure: Option<CommandFailure>,
    },

    /// No known package manager on the remote host
    #[error("no supported package manager on {destination} (tried {tried})")]
    UnsupportedDistro { destination: String, tried: String },

    /// Installing a required service failed
    #[error("failed to install {service}: {failure}")]
    Install {
        service: String,
        failure: CommandFailure,
    },

    /// Synchronizing the project tree failed
    #[error("failed to transfer project files: {failure}")]
    Transfer { failure: CommandFailure },

    /// Building or starting the application failed
    #[error("failed to {action}: {failure}")]
    Deploy {
        action: String,
        failure: CommandFailure,
    },

    /// nginx rejected the generated site or could not be reloaded
    #[error("reverse proxy configuration failed: {failure}")]
    ProxyConfig { failure: CommandFailure },

    /// A fatal post-deploy check failed
    #[error("deployment validation failed: {}", failed.join(", "))]
    Validation { failed: Vec<String> },

    /// The run was interrupted between stages
    #[error("interrupted before stage '{stage}'")]
    Interrupted { stage: Stage },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl HoistError {
    pub fn config(message: impl Into<String>) -> Self {
        HoistError::Config {
            message: message.into(),
        }
    }

    /// Taxonomy name used in log records
    pub fn kind(&self) -> &'static str {
        match self {
            HoistError::Config { .. } => "ConfigError",
            HoistError::Fetch { .. } => "FetchError",
            HoistError::UnsupportedProject { .. } => "UnsupportedProjectError",
            HoistError::Connection { .. } => "ConnectionError",
            HoistError::UnsupportedDistro { .. } => "UnsupportedDistroError",
            HoistError::Install { .. } => "InstallError",
            HoistError::Transfer { .. } => "TransferError",
            HoistError::Deploy { .. } => "DeployError",
            HoistError::ProxyConfig { .. } => "ProxyConfigError",
            HoistError::Validation { .. } => "ValidationError",
            HoistError::Interrupted { .. } => "Interrupted",
            HoistError::Io(_) => "IoError",
        }
    }

    /// The command behind this error, if one was involved
    pub fn failure(&self) -> Option<&CommandFailure> {
        match self {
            HoistError::Fetch { failure, .. } | HoistError::Connection { failure, .. } => {
                failure.as_ref()
            }
            HoistError::Install { failure, .. }
            | HoistError::Transfer { failure }
            | HoistError::Deploy { failure, .. }
            | HoistError::ProxyConfig { failure } => Some(failure),
            _ => None,
        }
    }

    /// Process exit status for this error
    ///
    /// Propagates the failing command's status when it fits in a process
    /// exit code, otherwise falls back to 1.
    pub fn exit_code(&self) -> i32 {
        if let HoistError::Interrupted { .. } = self {
            return 130;
        }
        self.failure()
            .and_then(|f| f.exit_code)
            .filter(|code| (1..=255).contains(code))
            .unwrap_or(1)
    }
}
