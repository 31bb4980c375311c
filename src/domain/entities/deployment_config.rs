//! Deployment configuration
//!
//! `DeploymentConfig` is built once per run from a `DeploymentInput`
//! (whatever the config layer collected) and then only ever borrowed.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::domain::value_objects::{AppPort, Credential, ProjectName};
use crate::error::{HoistError, HoistResult};

pub const DEFAULT_REMOTE_BASE: &str = "/opt";
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_secs(10);

/// Raw, unvalidated deployment parameters
#[derive(Debug, Clone)]
pub struct DeploymentInput {
    pub repository: Option<String>,
    pub token: Option<String>,
    pub branch: Option<String>,
    pub host: Option<String>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub port: Option<i64>,
    /// Local directory that holds one checkout per project
    pub checkout_root: PathBuf,
    /// Remote directory that holds one directory per project
    pub remote_base: String,
    pub connect_timeout: Duration,
    pub settle_delay: Duration,
}

impl Default for DeploymentInput {
    fn default() -> Self {
        Self {
            repository: None,
            token: None,
            branch: None,
            host: None,
            user: None,
            password: None,
            port: None,
            checkout_root: PathBuf::from("."),
            remote_base: DEFAULT_REMOTE_BASE.to_string(),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            settle_delay: DEFAULT_SETTLE_DELAY,
        }
    }
}

/// Validated, immutable parameters of one run
#[derive(Debug, Clone)]
pub struct DeploymentConfig {
    repository: String,
    token: Credential,
    branch: String,
    host: String,
    user: String,
    password: Credential,
    port: AppPort,
    project: ProjectName,
    work_dir: PathBuf,
    remote_dir: String,
    connect_timeout: Duration,
    settle_delay: Duration,
}

impl DeploymentConfig {
    /// Validate raw input into a configuration
    ///
    /// Every field must be present and non-empty. Values that end up as
    /// command arguments (`host`, `user`, `branch`, `repository`) may not
    /// start with `-` or contain whitespace, so they can never be read
    /// as options.
    pub fn from_input(input: DeploymentInput) -> HoistResult<Self> {
        let repository = required_word("repository", input.repository)?;
        let branch = required_word("branch", input.branch)?;
        let host = required_word("host", input.host)?;
        let user = required_word("user", input.user)?;

        let token = input
            .token
            .and_then(Credential::new)
            .ok_or_else(|| HoistError::config("missing required value 'token'"))?;
        let password = input
            .password
            .and_then(Credential::new)
            .ok_or_else(|| HoistError::config("missing required value 'password'"))?;

        let raw_port = input
            .port
            .ok_or_else(|| HoistError::config("missing required value 'port'"))?;
        let port = u16::try_from(raw_port)
            .ok()
            .and_then(AppPort::new)
            .ok_or_else(|| {
                HoistError::config(format!("port {} is outside 1-65535", raw_port))
            })?;

        let project = ProjectName::from_repository(&repository).ok_or_else(|| {
            HoistError::config(format!(
                "cannot derive a project name from repository '{}'",
                repository
            ))
        })?;

        let remote_base = input.remote_base.trim().trim_end_matches('/').to_string();
        if !input.remote_base.trim().starts_with('/') {
            return Err(HoistError::config(format!(
                "remote base directory '{}' must be an absolute path",
                input.remote_base
            )));
        }

        if input.connect_timeout.is_zero() {
            return Err(HoistError::config("connect timeout must be at least one second"));
        }

        Ok(Self {
            work_dir: input.checkout_root.join(project.as_str()),
            remote_dir: format!("{}/{}", remote_base, project),
            repository,
            token,
            branch,
            host,
            user,
            password,
            port,
            project,
            connect_timeout: input.connect_timeout,
            settle_delay: input.settle_delay,
        })
    }

    pub fn repository(&self) -> &str {
        &self.repository
    }

    pub fn token(&self) -> &Credential {
        &self.token
    }

    pub fn branch(&self) -> &str {
        &self.branch
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn password(&self) -> &Credential {
        &self.password
    }

    pub fn port(&self) -> AppPort {
        self.port
    }

    pub fn project(&self) -> &ProjectName {
        &self.project
    }

    /// Local checkout directory (`LocalWorkDir`)
    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    /// Remote project directory
    pub fn remote_dir(&self) -> &str {
        &self.remote_dir
    }

    pub fn connect_timeout(&self) -> Duration {
        self.connect_timeout
    }

    pub fn settle_delay(&self) -> Duration {
        self.settle_delay
    }

    /// `user@host` as used by ssh and rsync
    pub fn destination(&self) -> String {
        format!("{}@{}", self.user, self.host)
    }

    /// Non-root logins run privileged commands through `sudo -n`
    pub fn needs_elevation(&self) -> bool {
        self.user != "root"
    }

    /// Public URLs of the deployed application: through nginx, then direct
    pub fn access_urls(&self) -> Vec<String> {
        let host = if self.host.contains(':') && !self.host.starts_with('[') {
            format!("[{}]", self.host)
        } else {
            self.host.clone()
        };
        vec![
            format!("http://{}", host),
            format!("http://{}:{}", host, self.port),
        ]
    }
}

fn required_word(field: &str, value: Option<String>) -> HoistResult<String> {
    let value = value.map(|v| v.trim().to_string()).unwrap_or_default();
    if value.is_empty() {
        return Err(HoistError::config(format!("missing required value '{}'", field)));
    }
    if value.starts_with('-') || value.chars().any(char::is_whitespace) {
        return Err(HoistError::config(format!(
            "{} '{}' may not start with '-' or contain whitespace",
            field, value
        )));
    }
    Ok(value)
}
