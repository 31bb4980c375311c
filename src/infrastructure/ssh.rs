//! SSH session
//!
//! Password authentication goes through `sshpass -e`: the password is
//! handed over in the `SSHPASS` environment variable and never appears on
//! a command line. The first connection becomes a multiplexing master
//! (`ControlMaster=auto`), so every later command and the rsync transfer
//! reuse one authenticated channel. The master is closed on drop.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::Duration;

use tempfile::TempDir;

use crate::domain::entities::DeploymentConfig;
use crate::domain::ports::{CommandOutput, Connector, RemoteShell, ShellError};
use crate::domain::services::shell;
use crate::domain::value_objects::Credential;
use crate::error::{CommandFailure, HoistError, HoistResult};

/// sshpass exit status for a rejected password
const SSHPASS_BAD_PASSWORD: i32 = 5;
/// ssh exit status for connection-level failures
const SSH_FAILURE: i32 = 255;

/// Opens `SshSession`s
pub struct SshConnector;

impl Connector for SshConnector {
    type Session = SshSession;

    fn connect(&self, config: &DeploymentConfig) -> HoistResult<SshSession> {
        SshSession::open(config)
    }
}

pub struct SshSession {
    destination: String,
    password: Credential,
    options: Vec<String>,
    /// Holds the control socket; removed with the session
    _control_dir: TempDir,
}

impl SshSession {
    /// Authenticate once and keep the master connection open
    pub fn open(config: &DeploymentConfig) -> HoistResult<Self> {
        let control_dir = tempfile::Builder::new().prefix("hoist-ssh-").tempdir()?;
        let session = Self {
            destination: config.destination(),
            password: config.password().clone(),
            options: ssh_options(config.connect_timeout(), &control_dir.path().join("cm")),
            _control_dir: control_dir,
        };

        let probe = session
            .exec("true", None)
            .map_err(|e| HoistError::Connection {
                destination: session.destination.clone(),
                message: format!("{} (are ssh and sshpass installed?)", e),
                failure: None,
            })?;

        let message = match probe.exit_code {
            0 => return Ok(session),
            SSHPASS_BAD_PASSWORD => "authentication failed: wrong user or password".to_string(),
            SSH_FAILURE => "host unreachable or ssh refused the connection".to_string(),
            code => format!("ssh exited with status {}", code),
        };
        Err(HoistError::Connection {
            destination: session.destination.clone(),
            message,
            failure: Some(CommandFailure::new(
                format!("ssh {} true", session.destination),
                Some(probe.exit_code),
                probe.stderr,
            )),
        })
    }

    /// `sshpass -e <program>` with the password in the environment
    fn authenticated(&self, program: &str) -> Command {
        let mut command = Command::new("sshpass");
        command
            .arg("-e")
            .arg(program)
            .env("SSHPASS", self.password.expose());
        command
    }

    /// Remote shell for rsync's `-e`, reusing the master connection
    fn rsync_shell(&self) -> String {
        format!("ssh {}", shell::join(&self.options))
    }
}

impl RemoteShell for SshSession {
    fn destination(&self) -> String {
        self.destination.clone()
    }

    fn exec(&self, command: &str, stdin: Option<&str>) -> Result<CommandOutput, ShellError> {
        let mut ssh = self.authenticated("ssh");
        ssh.args(&self.options).arg(&self.destination).arg(command);
        run_captured(ssh, "sshpass", stdin)
    }

    fn sync_dir(&self, local: &Path, remote_dir: &str) -> Result<CommandOutput, ShellError> {
        let mut source = PathBuf::from(local).into_os_string();
        source.push("/");

        let mut rsync = self.authenticated("rsync");
        rsync
            .args(["-az", "--delete", "--protect-args", "--exclude", ".git/"])
            .arg("-e")
            .arg(self.rsync_shell())
            .arg(source)
            .arg(format!("{}:{}", self.destination, remote_dir));
        run_captured(rsync, "rsync", None)
    }
}

impl Drop for SshSession {
    fn drop(&mut self) {
        let _ = Command::new("ssh")
            .args(&self.options)
            .args(["-O", "exit"])
            .arg(&self.destination)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();
    }
}

fn ssh_options(connect_timeout: Duration, control_path: &Path) -> Vec<String> {
    let timeout = connect_timeout.as_secs().max(1);
    [
        "StrictHostKeyChecking=no".to_string(),
        "UserKnownHostsFile=/dev/null".to_string(),
        "LogLevel=ERROR".to_string(),
        format!("ConnectTimeout={}", timeout),
        "ServerAliveInterval=15".to_string(),
        "NumberOfPasswordPrompts=1".to_string(),
        "ControlMaster=auto".to_string(),
        format!("ControlPath={}", control_path.display()),
        "ControlPersist=600".to_string(),
    ]
    .into_iter()
    .flat_map(|option| ["-o".to_string(), option])
    .collect()
}

fn run_captured(
    mut command: Command,
    program: &str,
    stdin: Option<&str>,
) -> Result<CommandOutput, ShellError> {
    command
        .stdin(if stdin.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        })
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    let mut child = command.spawn().map_err(|e| ShellError::Launch {
        program: program.to_string(),
        message: e.to_string(),
    })?;

    if let Some(input) = stdin {
        if let Some(mut pipe) = child.stdin.take() {
            pipe.write_all(input.as_bytes())?;
        }
    }

    let output = child.wait_with_output()?;
    Ok(CommandOutput {
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        exit_code: output.status.code().unwrap_or(-1),
    })
}
