//! Deployment verification
//!
//! Checks the running deployment and produces a `ValidationReport`.
//! Service and container checks are fatal; HTTP reachability is
//! advisory, since an application may legitimately take longer to
//! answer or not speak HTTP on `/` at all.

use crate::application::docker;
use crate::application::executor::RemoteExecutor;
use crate::domain::entities::{DeploymentConfig, ProjectKind, Severity, ValidationReport};
use crate::domain::services::shell::quote;
use crate::domain::value_objects::AppPort;

pub struct DeploymentValidator<'a> {
    exec: &'a RemoteExecutor<'a>,
}

impl<'a> DeploymentValidator<'a> {
    pub fn new(exec: &'a RemoteExecutor<'a>) -> Self {
        Self { exec }
    }

    pub fn validate(&self, config: &DeploymentConfig, kind: &ProjectKind) -> ValidationReport {
        let mut report = ValidationReport {
            access_urls: config.access_urls(),
            ..ValidationReport::default()
        };

        self.check_unit(&mut report, "docker");
        self.check_container(&mut report, config, kind);
        self.check_unit(&mut report, "nginx");
        self.check_http(&mut report, "application reachable", config.port());
        self.check_http(&mut report, "proxy reachable", AppPort::HTTP);

        let log = self.exec.log();
        for check in &report.checks {
            let line = format!("{}: {}", check.name, check.detail);
            match (check.passed, check.severity) {
                (true, _) => log.success(&line),
                (false, Severity::Fatal) => log.error(&line),
                (false, Severity::Advisory) => log.warning(&line),
            }
        }
        report
    }

    fn check_unit(&self, report: &mut ValidationReport, unit: &str) {
        let name = format!("{} service active", unit);
        match self
            .exec
            .succeeds(&format!("systemctl is-active --quiet {}", unit))
        {
            Ok(true) => report.record(name, Severity::Fatal, true, "active"),
            Ok(false) => report.record(name, Severity::Fatal, false, "inactive"),
            Err(failure) => report.record(name, Severity::Fatal, false, failure.to_string()),
        }
    }

    fn check_container(
        &self,
        report: &mut ValidationReport,
        config: &DeploymentConfig,
        kind: &ProjectKind,
    ) {
        let name = "container running";
        let project = config.project().as_str();
        let command = match kind {
            ProjectKind::Compose { .. } => docker::running_compose_containers(config),
            ProjectKind::Dockerfile => docker::running_containers(),
        };

        let output = match self.exec.run(&command) {
            Ok(output) => output,
            Err(failure) => {
                report.record(name, Severity::Fatal, false, failure.to_string());
                return;
            }
        };
        let running: Vec<&str> = output
            .stdout
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect();

        let found = match kind {
            ProjectKind::Compose { .. } => !running.is_empty(),
            ProjectKind::Dockerfile => running.contains(&project),
        };
        if found {
            report.record(name, Severity::Fatal, true, running.join(", "));
        } else {
            report.record(
                name,
                Severity::Fatal,
                false,
                format!("no running container for {}", project),
            );
        }
    }

    fn check_http(&self, report: &mut ValidationReport, name: &str, port: AppPort) {
        let url = format!("http://localhost:{}", port);
        let command = format!(
            "curl -s -o /dev/null -w '%{{http_code}}' --max-time 10 {}",
            quote(&url)
        );
        match self.exec.run_tolerant(&command) {
            Ok(output) if output.success() => {
                let status = output.stdout.trim();
                report.record(name, Severity::Advisory, true, format!("{} answered HTTP {}", url, status));
            }
            Ok(output) => report.record(
                name,
                Severity::Advisory,
                false,
                format!("{} did not answer (curl exit {})", url, output.exit_code),
            ),
            Err(failure) => report.record(name, Severity::Advisory, false, failure.to_string()),
        }
    }
}
