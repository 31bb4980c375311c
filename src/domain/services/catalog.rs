//! Required remote infrastructure, in install order
//!
//! Later checks assume earlier ones succeeded: the Compose plugin needs
//! the Docker engine, and everything needs the base packages.

use crate::domain::entities::{InstallRecipe, ServiceCheck};

pub const BASE_PACKAGES: &str = "base packages";
pub const DOCKER: &str = "docker";
pub const COMPOSE: &str = "docker compose";
pub const NGINX: &str = "nginx";

/// The ordered checks a host needs before an application can run on it
pub fn default_checks() -> Vec<ServiceCheck> {
    vec![
        ServiceCheck {
            name: BASE_PACKAGES,
            probe: "command -v curl >/dev/null 2>&1 && command -v rsync >/dev/null 2>&1"
                .to_string(),
            install: InstallRecipe::Packages {
                refresh: true,
                deb: &["ca-certificates", "curl", "gnupg", "rsync"],
                rpm: &["ca-certificates", "curl", "rsync"],
            },
            unit: None,
            version: "rsync --version | head -n 1".to_string(),
        },
        ServiceCheck {
            name: DOCKER,
            probe: "command -v docker >/dev/null 2>&1".to_string(),
            install: InstallRecipe::Script("curl -fsSL https://get.docker.com | sh"),
            unit: Some("docker"),
            version: "docker --version".to_string(),
        },
        ServiceCheck {
            name: COMPOSE,
            probe: "docker compose version >/dev/null 2>&1".to_string(),
            install: InstallRecipe::Packages {
                refresh: true,
                deb: &["docker-compose-plugin"],
                rpm: &["docker-compose-plugin"],
            },
            unit: None,
            version: "docker compose version".to_string(),
        },
        ServiceCheck {
            name: NGINX,
            probe: "command -v nginx >/dev/null 2>&1".to_string(),
            install: InstallRecipe::Packages {
                refresh: false,
                deb: &["nginx"],
                rpm: &["nginx"],
            },
            unit: Some("nginx"),
            version: "nginx -v 2>&1".to_string(),
        },
    ]
}
