//! Host provisioning
//!
//! Walks the ordered service checks, installing only what is missing.
//! The package manager is detected lazily, the first time something has
//! to be installed, so an already-provisioned host is never asked.

use crate::application::executor::RemoteExecutor;
use crate::domain::entities::{PackageManager, ProvisionReport, ProvisionedService, ServiceCheck};
use crate::error::{CommandFailure, HoistError, HoistResult};

pub struct HostProvisioner<'a> {
    exec: &'a RemoteExecutor<'a>,
}

impl<'a> HostProvisioner<'a> {
    pub fn new(exec: &'a RemoteExecutor<'a>) -> Self {
        Self { exec }
    }

    pub fn provision(&self, checks: &[ServiceCheck]) -> HoistResult<ProvisionReport> {
        let log = self.exec.log();
        let mut manager: Option<PackageManager> = None;
        let mut report = ProvisionReport::default();

        for check in checks {
            let present = self
                .exec
                .succeeds(&check.probe)
                .map_err(|failure| install_error(check, failure))?;

            if present {
                log.info(&format!("{} already present", check.name));
            } else {
                let pm = match manager {
                    Some(pm) => pm,
                    None => {
                        let pm = self.detect_package_manager()?;
                        manager = Some(pm);
                        pm
                    }
                };
                log.info(&format!("Installing {} with {}", check.name, pm));
                self.exec
                    .run_script(&check.install_script(pm))
                    .map_err(|failure| install_error(check, failure))?;
            }

            let output = self
                .exec
                .run(&check.version)
                .map_err(|failure| install_error(check, failure))?;
            let version = output
                .combined()
                .lines()
                .map(str::trim)
                .find(|l| !l.is_empty())
                .unwrap_or("unknown version")
                .to_string();

            if present {
                log.info(&format!("{}: {}", check.name, version));
            } else {
                log.success(&format!("Installed {}: {}", check.name, version));
            }

            report.services.push(ProvisionedService {
                name: check.name.to_string(),
                installed: !present,
                version,
            });
        }

        Ok(report)
    }

    /// First package manager found, in `PackageManager::ALL` order
    pub fn detect_package_manager(&self) -> HoistResult<PackageManager> {
        for pm in PackageManager::ALL {
            let found = self.exec.succeeds(&pm.probe()).map_err(|failure| {
                HoistError::Connection {
                    destination: self.exec.destination(),
                    message: "lost the remote session while probing for a package manager"
                        .to_string(),
                    failure: Some(failure),
                }
            })?;
            if found {
                self.exec
                    .log()
                    .debug(&format!("Package manager: {}", pm));
                return Ok(pm);
            }
        }

        Err(HoistError::UnsupportedDistro {
            destination: self.exec.destination(),
            tried: PackageManager::ALL
                .iter()
                .map(|pm| pm.binary())
                .collect::<Vec<_>>()
                .join(", "),
        })
    }
}

fn install_error(check: &ServiceCheck, failure: CommandFailure) -> HoistError {
    HoistError::Install {
        service: check.name.to_string(),
        failure,
    }
}
