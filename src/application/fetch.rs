//! Source fetch stage
//!
//! Clones the repository into the local work directory, or brings an
//! existing checkout up to date with the requested branch.

use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::entities::DeploymentConfig;
use crate::domain::ports::{DeployLog, SourceRepository};
use crate::domain::services::authenticated_url;
use crate::error::{CommandFailure, HoistError, HoistResult};

pub struct SourceFetcher<'a> {
    repository: &'a dyn SourceRepository,
    log: &'a dyn DeployLog,
}

impl<'a> SourceFetcher<'a> {
    pub fn new(repository: &'a dyn SourceRepository, log: &'a dyn DeployLog) -> Self {
        Self { repository, log }
    }

    /// Make `config.work_dir()` a checkout of `config.branch()`
    pub fn fetch(&self, config: &DeploymentConfig) -> HoistResult<PathBuf> {
        let path = config.work_dir();
        let branch = config.branch();
        let url = authenticated_url(config.repository(), config.token());

        if self.repository.is_checkout(path) {
            self.log.info(&format!(
                "Updating existing checkout {} to '{}'",
                path.display(),
                branch
            ));
            self.repository
                .fetch(path, &url, branch)
                .map_err(|f| fetch_error(format!("cannot fetch branch '{}'", branch), f))?;
            self.repository
                .checkout(path, branch)
                .map_err(|f| fetch_error(format!("cannot check out branch '{}'", branch), f))?;
        } else {
            prepare_destination(path)?;
            self.log.info(&format!(
                "Cloning {} into {}",
                config.repository(),
                path.display()
            ));
            self.repository
                .clone_repo(&url, path)
                .map_err(|f| fetch_error(format!("cannot clone {}", config.repository()), f))?;
            self.repository
                .checkout(path, branch)
                .map_err(|f| fetch_error(format!("branch '{}' not found", branch), f))?;
        }

        self.log
            .success(&format!("Source ready at {} ({})", path.display(), branch));
        Ok(path.to_path_buf())
    }
}

/// A clone target must be absent or an empty directory
fn prepare_destination(path: &Path) -> HoistResult<()> {
    if path.exists() {
        let occupied = fs::read_dir(path)
            .map(|mut entries| entries.next().is_some())
            .unwrap_or(true);
        if occupied {
            return Err(HoistError::Fetch {
                message: format!("{} exists and is not a git checkout", path.display()),
                failure: None,
            });
        }
        return Ok(());
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| HoistError::Fetch {
            message: format!("cannot create {}: {}", parent.display(), e),
            failure: None,
        })?;
    }
    Ok(())
}

fn fetch_error(message: String, failure: CommandFailure) -> HoistError {
    HoistError::Fetch {
        message,
        failure: Some(failure),
    }
}
