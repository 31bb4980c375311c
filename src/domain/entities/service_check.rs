//! Service checks
//!
//! A `ServiceCheck` pairs a presence test with the recipe that installs
//! the missing piece and the command that reports its version. The
//! provisioner walks an ordered list of them, so installing only what is
//! absent is an explicit, testable contract.

use std::fmt;

/// Package managers the provisioner knows how to drive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageManager {
    Apt,
    Dnf,
    Yum,
}

impl PackageManager {
    /// Probe order
    pub const ALL: [PackageManager; 3] = [PackageManager::Apt, PackageManager::Dnf, PackageManager::Yum];

    pub fn binary(self) -> &'static str {
        match self {
            PackageManager::Apt => "apt-get",
            PackageManager::Dnf => "dnf",
            PackageManager::Yum => "yum",
        }
    }

    /// Command that succeeds when this package manager is installed
    pub fn probe(self) -> String {
        format!("command -v {} >/dev/null 2>&1", self.binary())
    }

    /// Refresh the package index
    pub fn refresh(self) -> &'static str {
        match self {
            PackageManager::Apt => "apt-get update -y",
            PackageManager::Dnf => "dnf makecache -y",
            PackageManager::Yum => "yum makecache -y",
        }
    }

    /// Non-interactive install of `packages`
    pub fn install(self, packages: &[&str]) -> String {
        match self {
            PackageManager::Apt => format!(
                "DEBIAN_FRONTEND=noninteractive apt-get install -y {}",
                packages.join(" ")
            ),
            PackageManager::Dnf | PackageManager::Yum => {
                format!("{} install -y {}", self.binary(), packages.join(" "))
            }
        }
    }
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.binary())
    }
}

/// How a missing service gets installed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallRecipe {
    /// Install distribution packages
    Packages {
        /// Refresh the package index first
        refresh: bool,
        /// Package names on Debian-family hosts
        deb: &'static [&'static str],
        /// Package names on RPM-family hosts
        rpm: &'static [&'static str],
    },
    /// Run a vendor install script that handles every distribution itself
    Script(&'static str),
}

/// A named piece of required remote infrastructure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceCheck {
    pub name: &'static str,
    /// Succeeds when the service is already present
    pub probe: String,
    pub install: InstallRecipe,
    /// systemd unit to enable and start after installing
    pub unit: Option<&'static str>,
    /// Prints the installed version
    pub version: String,
}

impl ServiceCheck {
    /// First line of every install script; identifies the check in logs
    pub fn install_marker(&self) -> String {
        format!("# hoist: install {}", self.name)
    }

    /// Render the install script for the detected package manager
    pub fn install_script(&self, manager: PackageManager) -> String {
        let mut lines = vec![self.install_marker(), "set -e".to_string()];

        match &self.install {
            InstallRecipe::Packages { refresh, deb, rpm } => {
                if *refresh {
                    lines.push(manager.refresh().to_string());
                }
                let packages = match manager {
                    PackageManager::Apt => deb,
                    PackageManager::Dnf | PackageManager::Yum => rpm,
                };
                lines.push(manager.install(packages));
            }
            InstallRecipe::Script(script) => lines.push((*script).to_string()),
        }

        if let Some(unit) = self.unit {
            lines.push(format!("systemctl enable --now {}", unit));
        }

        let mut script = lines.join("\n");
        script.push('\n');
        script
    }
}
