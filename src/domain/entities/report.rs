//! Provisioning and validation reports

use serde::Serialize;

/// One provisioned service
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProvisionedService {
    pub name: String,
    /// Whether this run installed it
    pub installed: bool,
    pub version: String,
}

/// Result of walking the service checks
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProvisionReport {
    pub services: Vec<ProvisionedService>,
}

impl ProvisionReport {
    pub fn installed_count(&self) -> usize {
        self.services.iter().filter(|s| s.installed).count()
    }
}

/// Whether a failed check fails the run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Fatal,
    Advisory,
}

/// Outcome of one post-deploy check
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckOutcome {
    pub name: String,
    pub passed: bool,
    pub severity: Severity,
    pub detail: String,
}

/// Pass/fail summary of a deployment
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub checks: Vec<CheckOutcome>,
    pub access_urls: Vec<String>,
}

impl ValidationReport {
    pub fn record(
        &mut self,
        name: impl Into<String>,
        severity: Severity,
        passed: bool,
        detail: impl Into<String>,
    ) {
        self.checks.push(CheckOutcome {
            name: name.into(),
            passed,
            severity,
            detail: detail.into(),
        });
    }

    /// Names of failed fatal checks
    pub fn fatal_failures(&self) -> Vec<String> {
        self.checks
            .iter()
            .filter(|c| !c.passed && c.severity == Severity::Fatal)
            .map(|c| c.name.clone())
            .collect()
    }

    /// Advisory checks that failed
    pub fn warnings(&self) -> impl Iterator<Item = &CheckOutcome> {
        self.checks
            .iter()
            .filter(|c| !c.passed && c.severity == Severity::Advisory)
    }

    pub fn is_healthy(&self) -> bool {
        self.fatal_failures().is_empty()
    }
}
