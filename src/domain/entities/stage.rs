//! Pipeline stages and their outcomes

use std::fmt;
use std::time::Duration;

use crate::error::HoistError;

/// One discrete step of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Fetch,
    ValidateProject,
    Connect,
    Provision,
    Deploy,
    ConfigureProxy,
    Verify,
    Teardown,
}

impl Stage {
    /// Forward pipeline, in execution order
    pub const FORWARD: [Stage; 7] = [
        Stage::Fetch,
        Stage::ValidateProject,
        Stage::Connect,
        Stage::Provision,
        Stage::Deploy,
        Stage::ConfigureProxy,
        Stage::Verify,
    ];

    /// Teardown pipeline, in execution order
    pub const TEARDOWN: [Stage; 2] = [Stage::Connect, Stage::Teardown];

    pub fn label(self) -> &'static str {
        match self {
            Stage::Fetch => "Fetch source",
            Stage::ValidateProject => "Validate project",
            Stage::Connect => "Connect to host",
            Stage::Provision => "Provision host",
            Stage::Deploy => "Deploy application",
            Stage::ConfigureProxy => "Configure reverse proxy",
            Stage::Verify => "Verify deployment",
            Stage::Teardown => "Tear down deployment",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Outcome of one stage
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageResult {
    Succeeded,
    Failed { cause: String, exit_code: i32 },
}

impl StageResult {
    pub fn is_success(&self) -> bool {
        matches!(self, StageResult::Succeeded)
    }
}

impl<T> From<&Result<T, HoistError>> for StageResult {
    fn from(result: &Result<T, HoistError>) -> Self {
        match result {
            Ok(_) => StageResult::Succeeded,
            Err(err) => StageResult::Failed {
                cause: err.to_string(),
                exit_code: err.exit_code(),
            },
        }
    }
}

/// A stage that ran, with how long it took
#[derive(Debug, Clone)]
pub struct StageRecord {
    pub stage: Stage,
    pub result: StageResult,
    pub elapsed: Duration,
}
