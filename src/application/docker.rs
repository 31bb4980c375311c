//! Container runtime command lines shared by the deploy, verify and
//! teardown stages

use crate::domain::entities::DeploymentConfig;
use crate::domain::services::shell::quote;

/// `docker ps` format that prints one container name per line
pub(crate) const NAMES_FORMAT: &str = "'{{.Names}}'";

/// `docker compose` scoped to the project's directory, name and descriptor
pub(crate) fn compose(config: &DeploymentConfig, descriptor: &str, args: &str) -> String {
    format!(
        "cd {} && docker compose -p {} -f {} {}",
        quote(config.remote_dir()),
        quote(config.project().as_str()),
        quote(descriptor),
        args
    )
}

/// `docker compose` addressing the project by its label only
///
/// Compose v2 finds the containers without a descriptor, so this reaches a
/// stack even when the checkout no longer has (or never had) a compose file.
pub(crate) fn compose_project(config: &DeploymentConfig, args: &str) -> String {
    format!("docker compose -p {} {}", quote(config.project().as_str()), args)
}

pub(crate) fn remove_container(config: &DeploymentConfig) -> String {
    format!("docker rm -f {}", quote(config.project().as_str()))
}

pub(crate) fn remove_image(config: &DeploymentConfig) -> String {
    format!("docker rmi {}", quote(&config.project().image_tag()))
}

pub(crate) fn build_image(config: &DeploymentConfig) -> String {
    format!(
        "docker build -t {} {}",
        quote(&config.project().image_tag()),
        quote(config.remote_dir())
    )
}

/// Detached, restarting container publishing the application port
pub(crate) fn run_container(config: &DeploymentConfig) -> String {
    let port = config.port();
    format!(
        "docker run -d --name {} --restart unless-stopped -p {port}:{port} {}",
        quote(config.project().as_str()),
        quote(&config.project().image_tag()),
        port = port
    )
}

pub(crate) fn container_logs(config: &DeploymentConfig) -> String {
    format!("docker logs --tail 50 {}", quote(config.project().as_str()))
}

/// Running containers belonging to a compose project
pub(crate) fn running_compose_containers(config: &DeploymentConfig) -> String {
    format!(
        "docker ps --filter {} --filter status=running --format {}",
        quote(&format!("label=com.docker.compose.project={}", config.project())),
        NAMES_FORMAT
    )
}

pub(crate) fn running_containers() -> String {
    format!("docker ps --filter status=running --format {}", NAMES_FORMAT)
}
