//! Domain Ports (Interfaces)
//!
//! These traits define the boundaries of the domain layer.
//! Infrastructure layer provides concrete implementations.

pub mod deploy_log;
pub mod remote_shell;
pub mod source_repository;

pub use deploy_log::{DeployLog, LogLevel, NoopLog};
pub use remote_shell::{CommandOutput, Connector, RemoteShell, ShellError};
pub use source_repository::SourceRepository;
