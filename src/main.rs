//! Hoist CLI
//!
//! Usage: hoist [OPTIONS]
//!
//! Deploys the configured repository to the configured host, or removes
//! the deployment with `--teardown`. The exit status is 0 on success and
//! otherwise the status of the command that failed (130 when interrupted).

use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use is_terminal::IsTerminal;
use serde_json::json;

use hoist::config::{self, Config};
use hoist::domain::entities::{DeploymentConfig, StageResult};
use hoist::domain::ports::DeployLog;
use hoist::infrastructure::{ConsoleLog, FileLog, GitCli, SshConnector, TeeLog};
use hoist::{HoistError, Pipeline, RunMode, RunSummary};

mod cli;

use cli::Cli;

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(&cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("✗ {:#}", err);
            let code = err
                .downcast_ref::<HoistError>()
                .map_or(1, HoistError::exit_code);
            exit_code(code)
        }
    }
}

fn run(cli: &Cli) -> Result<ExitCode> {
    let config = resolve_config(cli)?;
    let deployment = DeploymentConfig::from_input(config.to_input())?;

    let file_log = FileLog::create(&config.log_dir(), deployment.project())
        .with_context(|| format!("cannot create log in {}", config.log_dir().display()))?;
    let log_path = file_log.path().to_path_buf();
    let log: Arc<dyn DeployLog> = Arc::new(
        TeeLog::new()
            .with(Arc::new(ConsoleLog::new(cli.verbose > 0)))
            .with(Arc::new(file_log)),
    );

    let interrupt = Arc::new(AtomicBool::new(false));
    let flag = interrupt.clone();
    ctrlc::set_handler(move || flag.store(true, Ordering::SeqCst))
        .context("cannot install Ctrl-C handler")?;

    let mode = if cli.teardown {
        RunMode::Teardown
    } else {
        RunMode::Deploy
    };
    let summary = Pipeline::new(GitCli::new(), SshConnector, log.clone())
        .with_interrupt(interrupt)
        .run(&deployment, mode);
    log.info(&format!("Log written to {}", log_path.display()));

    if cli.json {
        let value = json_summary(&summary, &deployment, &log_path.display().to_string());
        println!("{}", serde_json::to_string_pretty(&value)?);
    }
    Ok(exit_code(summary.exit_code()))
}

/// File, then environment, then flags, then prompts
fn resolve_config(cli: &Cli) -> Result<Config> {
    let cwd = std::env::current_dir().context("cannot determine current directory")?;
    let (file_config, warnings) = config::load_or_default(cli.config.as_deref(), &cwd)?;
    for warning in &warnings {
        eprintln!("⚠ {}", warning);
    }

    let config = config::with_env_overrides(file_config, |name| std::env::var(name).ok())?;
    let config = config::with_cli_overrides(config, &cli.overrides());

    let interactive = !cli.no_input && std::io::stdin().is_terminal();
    if interactive && !config::missing_fields(&config).is_empty() {
        return Ok(config::fill_missing(config)?);
    }
    Ok(config)
}

fn json_summary(
    summary: &RunSummary,
    config: &DeploymentConfig,
    log_path: &str,
) -> serde_json::Value {
    let stages: Vec<_> = summary
        .stages
        .iter()
        .map(|record| {
            let (status, cause) = match &record.result {
                StageResult::Succeeded => ("succeeded", None),
                StageResult::Failed { cause, .. } => ("failed", Some(cause.as_str())),
            };
            json!({
                "stage": record.stage.label(),
                "status": status,
                "cause": cause,
                "elapsed_secs": record.elapsed.as_secs_f64(),
            })
        })
        .collect();

    let mode = match summary.mode {
        RunMode::Deploy => "deploy",
        RunMode::Teardown => "teardown",
    };
    json!({
        "mode": mode,
        "project": config.project().as_str(),
        "host": config.host(),
        "success": summary.is_success(),
        "exit_code": summary.exit_code(),
        "error": summary.error.as_ref().map(|e| json!({
            "kind": e.kind(),
            "message": e.to_string(),
        })),
        "stages": stages,
        "provisioned": summary.provision.as_ref().map(|p| &p.services),
        "checks": summary.report.as_ref().map(|r| &r.checks),
        "access_urls": summary.report.as_ref().map(|r| &r.access_urls),
        "log_file": log_path,
        "elapsed_secs": summary.elapsed.as_secs_f64(),
    })
}

fn exit_code(code: i32) -> ExitCode {
    ExitCode::from(u8::try_from(code).unwrap_or(1))
}
