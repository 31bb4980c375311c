//! Hoist - deploy a containerized application to a remote host
//!
//! Hoist fetches a git repository, provisions a Linux host over SSH
//! (docker, docker compose, nginx), transfers and starts the application,
//! and publishes it on port 80 through an nginx reverse proxy. A teardown
//! run removes everything a deployment created.

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;

// Re-exports for convenience
pub use application::{Pipeline, RunMode, RunSummary};
pub use config::{Config, ConfigWarning};
pub use domain::entities::{DeploymentConfig, DeploymentInput, ProjectKind, Stage};
pub use error::{CommandFailure, HoistError, HoistResult};

/// Crate version, as reported by `hoist --version`
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
