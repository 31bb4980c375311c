//! Remote Executor
//!
//! Runs commands and scripts over a `RemoteShell`, appends every
//! invocation and its output to the run log, and turns non-zero exits
//! into `CommandFailure`s. It never retries; whether a failure is
//! tolerable is the caller's decision (`run_tolerant`).

use std::path::Path;

use crate::domain::ports::{CommandOutput, DeployLog, RemoteShell};
use crate::domain::services::shell::quote;
use crate::error::CommandFailure;

pub struct RemoteExecutor<'a> {
    shell: &'a dyn RemoteShell,
    log: &'a dyn DeployLog,
    /// Wrap commands in `sudo -n` (non-root logins)
    elevate: bool,
}

impl<'a> RemoteExecutor<'a> {
    pub fn new(shell: &'a dyn RemoteShell, log: &'a dyn DeployLog, elevate: bool) -> Self {
        Self { shell, log, elevate }
    }

    pub fn log(&self) -> &'a dyn DeployLog {
        self.log
    }

    pub fn destination(&self) -> String {
        self.shell.destination()
    }

    /// Run `command`, failing on a non-zero exit status
    pub fn run(&self, command: &str) -> Result<CommandOutput, CommandFailure> {
        let output = self.run_tolerant(command)?;
        ensure_success(command, output)
    }

    /// Run `command` and return its output whatever the exit status
    ///
    /// Only a broken channel is an error here.
    pub fn run_tolerant(&self, command: &str) -> Result<CommandOutput, CommandFailure> {
        self.log.debug(&format!("$ {}", command));
        let wrapped = self.privileged(command);
        self.invoke(command, &wrapped, None)
    }

    /// Run a probe; `Ok(true)` when it exits zero
    pub fn succeeds(&self, command: &str) -> Result<bool, CommandFailure> {
        Ok(self.run_tolerant(command)?.success())
    }

    /// Pipe a multi-line script into `bash -s` and return its combined output
    pub fn run_script(&self, script: &str) -> Result<String, CommandFailure> {
        let runner = if self.elevate {
            "sudo -n bash -s"
        } else {
            "bash -s"
        };
        let shown = match script.lines().next() {
            Some(first) => format!("{} <<< {}", runner, first.trim()),
            None => runner.to_string(),
        };

        self.log.debug(&format!("$ {}", runner));
        for line in script.lines() {
            self.log.debug(&format!("  | {}", line));
        }

        let output = self.invoke(&shown, runner, Some(script))?;
        let output = ensure_success(&shown, output)?;
        Ok(output.combined())
    }

    /// Replace `path` with `contents`, going through a temp file
    pub fn write_file(&self, path: &str, contents: &str) -> Result<(), CommandFailure> {
        let tmp = format!("{}.hoist-tmp", path);
        let command = format!(
            "cat > {tmp} && mv -f {tmp} {path}",
            tmp = quote(&tmp),
            path = quote(path)
        );
        self.log.debug(&format!("$ write {} ({} bytes)", path, contents.len()));
        for line in contents.lines() {
            self.log.debug(&format!("  | {}", line));
        }

        let wrapped = self.privileged(&command);
        let output = self.invoke(&command, &wrapped, Some(contents))?;
        ensure_success(&command, output).map(|_| ())
    }

    /// Mirror a local directory into `remote_dir`
    pub fn sync_dir(&self, local: &Path, remote_dir: &str) -> Result<CommandOutput, CommandFailure> {
        let shown = format!(
            "rsync -az --delete {}/ {}:{}",
            local.display(),
            self.shell.destination(),
            remote_dir
        );
        self.log.debug(&format!("$ {}", shown));

        let output = match self.shell.sync_dir(local, remote_dir) {
            Ok(output) => output,
            Err(err) => {
                self.log.debug(&format!("  ! {}", err));
                return Err(CommandFailure::new(shown, None, err.to_string()));
            }
        };
        self.log_output(&output);
        ensure_success(&shown, output)
    }

    fn privileged(&self, command: &str) -> String {
        if self.elevate {
            format!("sudo -n sh -c {}", quote(command))
        } else {
            command.to_string()
        }
    }

    fn invoke(
        &self,
        shown: &str,
        command: &str,
        stdin: Option<&str>,
    ) -> Result<CommandOutput, CommandFailure> {
        match self.shell.exec(command, stdin) {
            Ok(output) => {
                self.log_output(&output);
                Ok(output)
            }
            Err(err) => {
                self.log.debug(&format!("  ! {}", err));
                Err(CommandFailure::new(shown, None, err.to_string()))
            }
        }
    }

    fn log_output(&self, output: &CommandOutput) {
        for line in output.stdout.lines() {
            self.log.debug(&format!("  > {}", line));
        }
        for line in output.stderr.lines() {
            self.log.debug(&format!("  ! {}", line));
        }
        if !output.success() {
            self.log.debug(&format!("  exit status {}", output.exit_code));
        }
    }
}

fn ensure_success(command: &str, output: CommandOutput) -> Result<CommandOutput, CommandFailure> {
    if output.success() {
        return Ok(output);
    }
    let detail = if output.stderr.trim().is_empty() {
        output.stdout.clone()
    } else {
        output.stderr.clone()
    };
    Err(CommandFailure::new(command, Some(output.exit_code), detail))
}
