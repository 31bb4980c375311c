//! Deployment pipeline
//!
//! Runs the stages of one deployment (or teardown) strictly in order,
//! stopping at the first failure. Every stage is timed and recorded in
//! the `RunSummary`; the failing stage's error is logged with the
//! command, exit status and stderr that caused it.
//!
//! ## Flow
//!
//! Deploy: fetch → validate project → connect → provision → deploy →
//! configure proxy → verify
//!
//! Teardown: connect → teardown

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::application::deploy::ApplicationDeployer;
use crate::application::executor::RemoteExecutor;
use crate::application::fetch::SourceFetcher;
use crate::application::project::validate_project;
use crate::application::provision::HostProvisioner;
use crate::application::proxy::ProxyConfigurer;
use crate::application::teardown::Teardown;
use crate::application::verify::DeploymentValidator;
use crate::domain::entities::{
    DeploymentConfig, ProvisionReport, ServiceCheck, Stage, StageRecord, StageResult,
    ValidationReport,
};
use crate::domain::ports::{Connector, DeployLog, SourceRepository};
use crate::domain::services::default_checks;
use crate::error::{HoistError, HoistResult};

/// stderr lines repeated in the failure report
const STDERR_TAIL: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    Deploy,
    Teardown,
}

impl RunMode {
    pub fn stages(self) -> &'static [Stage] {
        match self {
            RunMode::Deploy => &Stage::FORWARD,
            RunMode::Teardown => &Stage::TEARDOWN,
        }
    }
}

/// What happened during one run
#[derive(Debug)]
pub struct RunSummary {
    pub mode: RunMode,
    /// Stages that ran, in order
    pub stages: Vec<StageRecord>,
    pub provision: Option<ProvisionReport>,
    pub report: Option<ValidationReport>,
    pub error: Option<HoistError>,
    pub elapsed: Duration,
}

impl RunSummary {
    fn new(mode: RunMode) -> Self {
        Self {
            mode,
            stages: Vec::new(),
            provision: None,
            report: None,
            error: None,
            elapsed: Duration::ZERO,
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    /// 0 on success, otherwise the error's exit status
    pub fn exit_code(&self) -> i32 {
        self.error.as_ref().map_or(0, HoistError::exit_code)
    }

    pub fn ran(&self, stage: Stage) -> bool {
        self.stages.iter().any(|r| r.stage == stage)
    }

    pub fn failed_stage(&self) -> Option<Stage> {
        self.stages
            .iter()
            .find(|r| !r.result.is_success())
            .map(|r| r.stage)
    }
}

/// Orchestrates one run against a source repository and a remote host
pub struct Pipeline<R, C>
where
    R: SourceRepository,
    C: Connector,
{
    repository: R,
    connector: C,
    log: Arc<dyn DeployLog>,
    checks: Vec<ServiceCheck>,
    interrupt: Arc<AtomicBool>,
}

impl<R, C> Pipeline<R, C>
where
    R: SourceRepository,
    C: Connector,
{
    pub fn new(repository: R, connector: C, log: Arc<dyn DeployLog>) -> Self {
        Self {
            repository,
            connector,
            log,
            checks: default_checks(),
            interrupt: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Replace the service checks run during provisioning
    pub fn with_checks(mut self, checks: Vec<ServiceCheck>) -> Self {
        self.checks = checks;
        self
    }

    /// Flag polled between stages; once set, no further stage starts
    pub fn with_interrupt(mut self, flag: Arc<AtomicBool>) -> Self {
        self.interrupt = flag;
        self
    }

    pub fn run(&self, config: &DeploymentConfig, mode: RunMode) -> RunSummary {
        let started = Instant::now();
        let mut summary = RunSummary::new(mode);

        self.log_header(config, mode);
        let result = match mode {
            RunMode::Deploy => self.deploy(config, &mut summary),
            RunMode::Teardown => self.teardown(config, &mut summary),
        };
        summary.elapsed = started.elapsed();

        match result {
            Ok(()) => self.log_success(config, &summary),
            Err(err) => {
                self.log_failure(&summary, &err);
                summary.error = Some(err);
            }
        }
        summary
    }

    fn deploy(&self, config: &DeploymentConfig, summary: &mut RunSummary) -> HoistResult<()> {
        let log = self.log.as_ref();

        let source = self.stage(summary, Stage::Fetch, || {
            SourceFetcher::new(&self.repository, log).fetch(config)
        })?;
        let kind = self.stage(summary, Stage::ValidateProject, || {
            let kind = validate_project(&source)?;
            log.info(&format!("Building from {}", kind.descriptor()));
            Ok(kind)
        })?;

        let session = self.stage(summary, Stage::Connect, || self.connector.connect(config))?;
        let exec = RemoteExecutor::new(&session, log, config.needs_elevation());

        let provision = self.stage(summary, Stage::Provision, || {
            HostProvisioner::new(&exec).provision(&self.checks)
        })?;
        summary.provision = Some(provision);

        self.stage(summary, Stage::Deploy, || {
            ApplicationDeployer::new(&exec).deploy(config, &source, &kind)
        })?;
        self.stage(summary, Stage::ConfigureProxy, || {
            ProxyConfigurer::new(&exec).configure(config)
        })?;

        let mut report = None;
        let verified = self.stage(summary, Stage::Verify, || {
            let outcome = DeploymentValidator::new(&exec).validate(config, &kind);
            let failed = outcome.fatal_failures();
            report = Some(outcome);
            if failed.is_empty() {
                Ok(())
            } else {
                Err(HoistError::Validation { failed })
            }
        });
        summary.report = report;
        verified
    }

    fn teardown(&self, config: &DeploymentConfig, summary: &mut RunSummary) -> HoistResult<()> {
        let session = self.stage(summary, Stage::Connect, || self.connector.connect(config))?;
        let exec = RemoteExecutor::new(&session, self.log.as_ref(), config.needs_elevation());

        self.stage(summary, Stage::Teardown, || Teardown::new(&exec).run(config))
    }

    fn stage<T>(
        &self,
        summary: &mut RunSummary,
        stage: Stage,
        run: impl FnOnce() -> HoistResult<T>,
    ) -> HoistResult<T> {
        if self.interrupt.load(Ordering::SeqCst) {
            self.log
                .warning(&format!("Interrupted; not starting '{}'", stage));
            return Err(HoistError::Interrupted { stage });
        }

        let stages = summary.mode.stages();
        let position = stages.iter().position(|s| *s == stage).map_or(0, |i| i + 1);
        self.log
            .info(&format!("[{}/{}] {}", position, stages.len(), stage));

        let started = Instant::now();
        let result = run();
        let elapsed = started.elapsed();

        self.log.debug(&format!(
            "{} finished in {:.1}s",
            stage,
            elapsed.as_secs_f64()
        ));
        summary.stages.push(StageRecord {
            stage,
            result: StageResult::from(&result),
            elapsed,
        });
        result
    }

    fn log_header(&self, config: &DeploymentConfig, mode: RunMode) {
        let action = match mode {
            RunMode::Deploy => "Deploying",
            RunMode::Teardown => "Tearing down",
        };
        self.log.info(&format!(
            "{} {} ({} @ {}) on {}",
            action,
            config.project(),
            config.repository(),
            config.branch(),
            config.destination()
        ));
        self.log.debug(&format!(
            "port {}, work dir {}, remote dir {}, token {}, password {}",
            config.port(),
            config.work_dir().display(),
            config.remote_dir(),
            config.token(),
            config.password()
        ));
    }

    fn log_success(&self, config: &DeploymentConfig, summary: &RunSummary) {
        let seconds = summary.elapsed.as_secs_f64();
        match summary.mode {
            RunMode::Deploy => {
                self.log.success(&format!(
                    "Deployed {} to {} in {:.1}s",
                    config.project(),
                    config.host(),
                    seconds
                ));
                if let Some(report) = &summary.report {
                    for url in &report.access_urls {
                        self.log.info(&format!("  {}", url));
                    }
                    let warnings = report.warnings().count();
                    if warnings > 0 {
                        self.log.warning(&format!(
                            "{} advisory check(s) failed; see above",
                            warnings
                        ));
                    }
                }
            }
            RunMode::Teardown => {
                self.log.success(&format!(
                    "Tore down {} on {} in {:.1}s",
                    config.project(),
                    config.host(),
                    seconds
                ));
            }
        }
    }

    fn log_failure(&self, summary: &RunSummary, err: &HoistError) {
        match summary.failed_stage() {
            Some(stage) => self
                .log
                .error(&format!("{} failed [{}]: {}", stage, err.kind(), err)),
            None => self.log.error(&format!("Run stopped [{}]: {}", err.kind(), err)),
        }

        let Some(failure) = err.failure() else {
            return;
        };
        self.log.error(&format!("  command: {}", failure.command));
        match failure.exit_code {
            Some(code) => self.log.error(&format!("  exit status: {}", code)),
            None => self.log.error("  the command could not be started"),
        }
        let lines: Vec<&str> = failure
            .stderr
            .lines()
            .filter(|l| !l.trim().is_empty())
            .collect();
        for line in &lines[lines.len().saturating_sub(STDERR_TAIL)..] {
            self.log.error(&format!("  | {}", line));
        }
    }
}
