//! Application deployment
//!
//! Ships the checkout to the host and (re)starts the application:
//!
//! 1. Ensure the remote project directory exists
//! 2. Mirror the local tree into it
//! 3. Stop and remove the previous instance, if any
//! 4. Build and start the new instance
//! 5. Give it time to settle, then capture diagnostics

use std::path::Path;
use std::thread;

use crate::application::docker;
use crate::application::executor::RemoteExecutor;
use crate::domain::entities::{DeploymentConfig, ProjectKind};
use crate::domain::services::shell::quote;
use crate::error::{CommandFailure, HoistError, HoistResult};

pub struct ApplicationDeployer<'a> {
    exec: &'a RemoteExecutor<'a>,
}

impl<'a> ApplicationDeployer<'a> {
    pub fn new(exec: &'a RemoteExecutor<'a>) -> Self {
        Self { exec }
    }

    pub fn deploy(
        &self,
        config: &DeploymentConfig,
        local: &Path,
        kind: &ProjectKind,
    ) -> HoistResult<()> {
        let log = self.exec.log();
        let remote_dir = config.remote_dir();

        self.exec
            .run(&format!("mkdir -p {}", quote(remote_dir)))
            .map_err(deploy_error("create the remote project directory"))?;
        if config.needs_elevation() {
            // rsync runs as the login user
            self.exec
                .run(&format!("chown {} {}", quote(config.user()), quote(remote_dir)))
                .map_err(deploy_error("take ownership of the remote project directory"))?;
        }

        log.info(&format!("Transferring project files to {}", remote_dir));
        self.exec
            .sync_dir(local, remote_dir)
            .map_err(|failure| HoistError::Transfer { failure })?;

        self.stop_previous(config);

        match kind {
            ProjectKind::Compose { descriptor } => {
                log.info(&format!("Starting services from {}", descriptor));
                self.exec
                    .run(&docker::compose(config, descriptor, "up -d --build"))
                    .map_err(deploy_error("start the compose services"))?;
            }
            ProjectKind::Dockerfile => {
                log.info(&format!("Building image {}", config.project().image_tag()));
                self.exec
                    .run(&docker::build_image(config))
                    .map_err(deploy_error("build the application image"))?;
                log.info(&format!(
                    "Starting container {} on port {}",
                    config.project(),
                    config.port()
                ));
                self.exec
                    .run(&docker::run_container(config))
                    .map_err(deploy_error("start the application container"))?;
            }
        }

        let settle = config.settle_delay();
        if !settle.is_zero() {
            log.info(&format!(
                "Waiting {}s for the application to start",
                settle.as_secs()
            ));
            thread::sleep(settle);
        }

        self.capture_diagnostics(config, kind);
        log.success(&format!("{} is running on {}", config.project(), self.exec.destination()));
        Ok(())
    }

    /// Remove whatever the previous run left behind; absence is fine
    ///
    /// The previous run may have been a compose stack or a standalone
    /// container regardless of what is deployed now, so both are removed.
    fn stop_previous(&self, config: &DeploymentConfig) {
        let commands = [
            docker::compose_project(config, "down --remove-orphans"),
            docker::remove_container(config),
        ];

        for command in commands {
            match self.exec.run_tolerant(&command) {
                Ok(output) if !output.success() => {
                    self.exec
                        .log()
                        .debug("No previous instance to remove");
                }
                Ok(_) => {}
                Err(failure) => self.exec.log().warning(&failure.to_string()),
            }
        }
    }

    fn capture_diagnostics(&self, config: &DeploymentConfig, kind: &ProjectKind) {
        let log = self.exec.log();
        let listing = format!(
            "docker ps -a --format {}",
            quote("table {{.Names}}\t{{.Status}}\t{{.Ports}}")
        );
        match self.exec.run_tolerant(&listing) {
            Ok(output) if output.success() && !output.stdout.trim().is_empty() => {
                log.info(&format!("Containers:\n{}", output.stdout.trim_end()));
            }
            Ok(_) => {}
            Err(failure) => log.warning(&format!("could not list containers: {}", failure)),
        }

        let logs = match kind {
            ProjectKind::Compose { descriptor } => docker::compose(config, descriptor, "logs --tail 50"),
            ProjectKind::Dockerfile => docker::container_logs(config),
        };
        // Output lands in the run log through the executor
        if let Err(failure) = self.exec.run_tolerant(&logs) {
            log.warning(&format!("could not read container logs: {}", failure));
        }
    }
}

fn deploy_error(action: &'static str) -> impl Fn(CommandFailure) -> HoistError {
    move |failure| HoistError::Deploy {
        action: action.to_string(),
        failure,
    }
}
