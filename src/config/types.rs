//! Configuration type definitions

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::entities::{
    DeploymentInput, DEFAULT_CONNECT_TIMEOUT, DEFAULT_REMOTE_BASE, DEFAULT_SETTLE_DELAY,
};
use crate::error::HoistResult;

use super::loader::{self, ConfigWarning};

const DEFAULT_BRANCH: &str = "main";
const DEFAULT_USER: &str = "root";
const DEFAULT_LOG_DIR: &str = ".hoist/logs";

fn masked(secret: &Option<String>) -> Option<&'static str> {
    secret.as_ref().map(|_| "********")
}

/// Where the application comes from
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub repository: Option<String>,
    pub branch: Option<String>,
    pub token: Option<String>,
}

impl fmt::Debug for SourceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceConfig")
            .field("repository", &self.repository)
            .field("branch", &self.branch)
            .field("token", &masked(&self.token))
            .finish()
    }
}

/// The target host
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    pub host: Option<String>,
    pub user: Option<String>,
    pub password: Option<String>,
    /// Parent of the remote project directory
    pub base_dir: Option<String>,
    pub connect_timeout_secs: Option<u64>,
}

impl fmt::Debug for RemoteConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteConfig")
            .field("host", &self.host)
            .field("user", &self.user)
            .field("password", &masked(&self.password))
            .field("base_dir", &self.base_dir)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .finish()
    }
}

/// The application itself
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Port the application listens on inside and outside its container
    pub port: Option<i64>,
    /// Seconds to wait after starting the application
    pub settle_secs: Option<u64>,
}

/// Local directories
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Directory holding one checkout per project
    pub work_dir: Option<PathBuf>,
    pub log_dir: Option<PathBuf>,
}

/// Main configuration structure (`hoist.toml`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub source: SourceConfig,
    pub remote: RemoteConfig,
    pub app: AppConfig,
    pub paths: PathsConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> HoistResult<Self> {
        Self::load_with_warnings(path).map(|(config, _)| config)
    }

    /// Load configuration and collect non-fatal warnings (unknown keys)
    pub fn load_with_warnings(path: &Path) -> HoistResult<(Self, Vec<ConfigWarning>)> {
        loader::load_with_warnings(path)
    }

    /// Raw deployment input, with defaults for everything optional
    pub fn to_input(&self) -> DeploymentInput {
        DeploymentInput {
            repository: self.source.repository.clone(),
            token: self.source.token.clone(),
            branch: Some(
                self.source
                    .branch
                    .clone()
                    .unwrap_or_else(|| DEFAULT_BRANCH.to_string()),
            ),
            host: self.remote.host.clone(),
            user: Some(
                self.remote
                    .user
                    .clone()
                    .unwrap_or_else(|| DEFAULT_USER.to_string()),
            ),
            password: self.remote.password.clone(),
            port: self.app.port,
            checkout_root: self
                .paths
                .work_dir
                .clone()
                .unwrap_or_else(default_work_dir),
            remote_base: self
                .remote
                .base_dir
                .clone()
                .unwrap_or_else(|| DEFAULT_REMOTE_BASE.to_string()),
            connect_timeout: self
                .remote
                .connect_timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_CONNECT_TIMEOUT),
            settle_delay: self
                .app
                .settle_secs
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_SETTLE_DELAY),
        }
    }

    /// Directory for run logs
    pub fn log_dir(&self) -> PathBuf {
        self.paths
            .log_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_DIR))
    }
}

/// `<cache dir>/hoist/checkouts`, or `.hoist/checkouts` when the platform
/// has no cache directory
fn default_work_dir() -> PathBuf {
    dirs::cache_dir()
        .map(|dir| dir.join("hoist").join("checkouts"))
        .unwrap_or_else(|| PathBuf::from(".hoist/checkouts"))
}
