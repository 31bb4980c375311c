//! Teardown
//!
//! Removes everything a deployment created on the host: containers,
//! images, the nginx site and the remote project directory. Missing
//! pieces are not errors, so teardown is safe to repeat.

use crate::application::docker;
use crate::application::executor::RemoteExecutor;
use crate::domain::entities::{DeploymentConfig, ProxyRoute, COMPOSE_DESCRIPTORS};
use crate::domain::services::shell::{join, quote};
use crate::error::{HoistError, HoistResult};

pub struct Teardown<'a> {
    exec: &'a RemoteExecutor<'a>,
}

impl<'a> Teardown<'a> {
    pub fn new(exec: &'a RemoteExecutor<'a>) -> Self {
        Self { exec }
    }

    pub fn run(&self, config: &DeploymentConfig) -> HoistResult<()> {
        let log = self.exec.log();
        log.info(&format!(
            "Removing {} from {}",
            config.project(),
            self.exec.destination()
        ));

        let mut cleanup = Vec::new();
        if let Some(descriptor) = self.remote_compose_descriptor(config) {
            cleanup.push(docker::compose(
                config,
                descriptor,
                "down --rmi local --remove-orphans",
            ));
        }
        cleanup.push(docker::remove_container(config));
        cleanup.push(docker::remove_image(config));
        for command in &cleanup {
            if let Err(failure) = self.exec.run_tolerant(command) {
                log.warning(&failure.to_string());
            }
        }

        let route = ProxyRoute::new(config.project().clone(), config.port());
        self.exec
            .run(&format!("rm -f {}", join(route.all_artifacts())))
            .map_err(|failure| HoistError::ProxyConfig { failure })?;

        if matches!(self.exec.succeeds("command -v nginx >/dev/null 2>&1"), Ok(true)) {
            match self.exec.run("nginx -t && systemctl reload nginx") {
                Ok(_) => log.info("nginx reloaded without the site"),
                Err(failure) => log.warning(&format!("nginx was not reloaded: {}", failure)),
            }
        }

        self.exec
            .run(&format!("rm -rf {}", quote(config.remote_dir())))
            .map_err(|failure| HoistError::Deploy {
                action: "remove the remote project directory".to_string(),
                failure,
            })?;

        log.success(&format!("Removed {} from {}", config.project(), self.exec.destination()));
        Ok(())
    }

    fn remote_compose_descriptor(&self, config: &DeploymentConfig) -> Option<&'static str> {
        COMPOSE_DESCRIPTORS.into_iter().find(|descriptor| {
            let path = format!("{}/{}", config.remote_dir(), descriptor);
            matches!(self.exec.succeeds(&format!("test -f {}", quote(&path))), Ok(true))
        })
    }
}
