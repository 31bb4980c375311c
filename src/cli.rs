use std::path::PathBuf;

use clap::Parser;
use hoist::config::CliOverrides;

/// Hoist - deploy a containerized application to a remote host
#[derive(Parser, Debug)]
#[command(name = "hoist")]
#[command(author, version, about, long_about = None)]
#[command(
    after_help = "Values not given as flags are read from hoist.toml and HOIST_* environment variables.\nSecrets (token, password) are never accepted as flags."
)]
pub struct Cli {
    /// Config file (defaults to ./hoist.toml when present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Git repository URL (HTTPS)
    #[arg(short, long)]
    pub repository: Option<String>,

    /// Branch to deploy [default: main]
    #[arg(short, long)]
    pub branch: Option<String>,

    /// Remote host name or address
    #[arg(long)]
    pub host: Option<String>,

    /// SSH login user [default: root]
    #[arg(short, long)]
    pub user: Option<String>,

    /// Port the application listens on
    #[arg(short, long)]
    pub port: Option<i64>,

    /// Remove the deployment instead of creating it
    #[arg(long)]
    pub teardown: bool,

    /// Fail instead of prompting for missing values
    #[arg(long)]
    pub no_input: bool,

    /// Print a machine-readable run summary on stdout
    #[arg(long)]
    pub json: bool,

    /// Show every remote command and its output
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn overrides(&self) -> CliOverrides {
        CliOverrides {
            repository: self.repository.clone(),
            branch: self.branch.clone(),
            host: self.host.clone(),
            user: self.user.clone(),
            port: self.port,
        }
    }
}
