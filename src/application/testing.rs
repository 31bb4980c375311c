//! Test doubles for the application layer

use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::Mutex;
use std::time::Duration;

use crate::domain::entities::{DeploymentConfig, DeploymentInput};
use crate::domain::ports::{
    CommandOutput, Connector, DeployLog, LogLevel, RemoteShell, ShellError, SourceRepository,
};
use crate::error::{CommandFailure, HoistError, HoistResult};

/// acme from git.example.com, deployed to 10.0.0.5:8080 by `user`
pub(crate) fn config_in(root: &Path, user: &str) -> DeploymentConfig {
    DeploymentConfig::from_input(DeploymentInput {
        repository: Some("https://git.example.com/team/acme.git".to_string()),
        token: Some("s3cr3t".to_string()),
        branch: Some("main".to_string()),
        host: Some("10.0.0.5".to_string()),
        user: Some(user.to_string()),
        password: Some("hunter2".to_string()),
        port: Some(8080),
        checkout_root: root.to_path_buf(),
        settle_delay: Duration::ZERO,
        ..DeploymentInput::default()
    })
    .unwrap()
}

pub(crate) fn config_as(user: &str) -> DeploymentConfig {
    config_in(Path::new("/tmp/hoist-checkouts"), user)
}

pub(crate) fn config() -> DeploymentConfig {
    config_as("root")
}

struct Rule {
    needle: String,
    output: CommandOutput,
}

/// Remote shell that answers from a list of canned responses
///
/// The first rule whose needle occurs in the command (or its stdin)
/// wins; unmatched commands succeed with empty output.
pub(crate) struct ScriptedShell {
    rules: Vec<Rule>,
    calls: RefCell<Vec<String>>,
    syncs: RefCell<Vec<(PathBuf, String)>>,
    sync_exit: i32,
    broken: Vec<String>,
}

impl ScriptedShell {
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            calls: RefCell::new(Vec::new()),
            syncs: RefCell::new(Vec::new()),
            sync_exit: 0,
            broken: Vec::new(),
        }
    }

    pub fn on(mut self, needle: &str, exit_code: i32, stdout: &str) -> Self {
        self.rules.push(Rule {
            needle: needle.to_string(),
            output: CommandOutput {
                stdout: stdout.to_string(),
                stderr: if exit_code == 0 {
                    String::new()
                } else {
                    format!("{} failed", needle)
                },
                exit_code,
            },
        });
        self
    }

    /// Commands containing `needle` fail with a broken channel
    pub fn broken_on(mut self, needle: &str) -> Self {
        self.broken.push(needle.to_string());
        self
    }

    pub fn failing_sync(mut self, exit_code: i32) -> Self {
        self.sync_exit = exit_code;
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    pub fn ran(&self, needle: &str) -> bool {
        self.count(needle) > 0
    }

    pub fn count(&self, needle: &str) -> usize {
        self.calls.borrow().iter().filter(|c| c.contains(needle)).count()
    }

    /// Index of the first call containing `needle`
    pub fn position(&self, needle: &str) -> Option<usize> {
        self.calls.borrow().iter().position(|c| c.contains(needle))
    }

    pub fn syncs(&self) -> Vec<(PathBuf, String)> {
        self.syncs.borrow().clone()
    }
}

impl RemoteShell for ScriptedShell {
    fn destination(&self) -> String {
        "root@test-host".to_string()
    }

    fn exec(&self, command: &str, stdin: Option<&str>) -> Result<CommandOutput, ShellError> {
        let text = match stdin {
            Some(input) => format!("{}\n{}", command, input),
            None => command.to_string(),
        };
        self.calls.borrow_mut().push(text.clone());

        if self.broken.iter().any(|needle| text.contains(needle)) {
            return Err(ShellError::Io(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                "connection reset",
            )));
        }

        Ok(self
            .rules
            .iter()
            .find(|rule| text.contains(&rule.needle))
            .map(|rule| rule.output.clone())
            .unwrap_or_default())
    }

    fn sync_dir(&self, local: &Path, remote_dir: &str) -> Result<CommandOutput, ShellError> {
        self.syncs
            .borrow_mut()
            .push((local.to_path_buf(), remote_dir.to_string()));
        Ok(CommandOutput {
            exit_code: self.sync_exit,
            stderr: if self.sync_exit == 0 {
                String::new()
            } else {
                "rsync error: some files could not be transferred".to_string()
            },
            ..CommandOutput::default()
        })
    }
}

impl RemoteShell for Rc<ScriptedShell> {
    fn destination(&self) -> String {
        self.as_ref().destination()
    }

    fn exec(&self, command: &str, stdin: Option<&str>) -> Result<CommandOutput, ShellError> {
        self.as_ref().exec(command, stdin)
    }

    fn sync_dir(&self, local: &Path, remote_dir: &str) -> Result<CommandOutput, ShellError> {
        self.as_ref().sync_dir(local, remote_dir)
    }
}

/// Hands out one shared `ScriptedShell`, or refuses to connect
pub(crate) struct ScriptedConnector {
    pub shell: Rc<ScriptedShell>,
    pub refuse: bool,
}

impl ScriptedConnector {
    pub fn new(shell: ScriptedShell) -> Self {
        Self {
            shell: Rc::new(shell),
            refuse: false,
        }
    }
}

impl Connector for ScriptedConnector {
    type Session = Rc<ScriptedShell>;

    fn connect(&self, config: &DeploymentConfig) -> HoistResult<Self::Session> {
        if self.refuse {
            return Err(HoistError::Connection {
                destination: config.destination(),
                message: "authentication failed".to_string(),
                failure: Some(CommandFailure::new("ssh true", Some(5), "Permission denied")),
            });
        }
        Ok(self.shell.clone())
    }
}

/// Repository whose clones contain a fixed set of files
pub(crate) struct FixtureRepository {
    pub files: Vec<(&'static str, &'static str)>,
}

impl FixtureRepository {
    pub fn dockerfile() -> Self {
        Self {
            files: vec![("Dockerfile", "FROM nginx:alpine\n")],
        }
    }
}

impl SourceRepository for FixtureRepository {
    fn is_checkout(&self, path: &Path) -> bool {
        path.join(".git").is_dir()
    }

    fn clone_repo(&self, _url: &str, dest: &Path) -> Result<(), CommandFailure> {
        let io = |e: std::io::Error| CommandFailure::new("git clone", None, e.to_string());
        fs::create_dir_all(dest.join(".git")).map_err(io)?;
        for (name, content) in &self.files {
            fs::write(dest.join(name), content).map_err(io)?;
        }
        Ok(())
    }

    fn fetch(&self, _path: &Path, _url: &str, _branch: &str) -> Result<(), CommandFailure> {
        Ok(())
    }

    fn checkout(&self, _path: &Path, _branch: &str) -> Result<(), CommandFailure> {
        Ok(())
    }
}

/// Log that keeps every record in memory
#[derive(Default)]
pub(crate) struct RecordingLog {
    records: Mutex<Vec<(LogLevel, String)>>,
}

impl RecordingLog {
    pub fn records(&self) -> Vec<(LogLevel, String)> {
        self.records.lock().unwrap().clone()
    }

    pub fn at(&self, level: LogLevel) -> Vec<String> {
        self.records()
            .into_iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m)
            .collect()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.records().iter().any(|(_, m)| m.contains(needle))
    }
}

impl DeployLog for RecordingLog {
    fn record(&self, level: LogLevel, message: &str) {
        self.records.lock().unwrap().push((level, message.to_string()));
    }
}
