//! Common test utilities for Hoist pipeline and scenario tests.
//!
//! This module provides:
//! - `FakeHost`: an in-memory Linux host that remembers what was
//!   installed, written and started across runs
//! - `FakeConnector` / `FakeRepository`: port implementations backed by it
//! - `RecordingLog`: a `DeployLog` that keeps every record
//! - `deployment()`: a ready-to-run `DeploymentConfig`

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use hoist::domain::entities::{DeploymentConfig, DeploymentInput};
use hoist::domain::ports::{
    CommandOutput, Connector, DeployLog, LogLevel, RemoteShell, ShellError, SourceRepository,
};
use hoist::{CommandFailure, HoistError, HoistResult, Pipeline, RunMode, RunSummary};

pub const DOCKERFILE: &str = "FROM nginx:alpine\nEXPOSE 8080\n";
pub const COMPOSE: &str = "services:\n  web:\n    build: .\n    ports:\n      - \"8080:8080\"\n";

/// `shop` from git.example.com, deployed to 203.0.113.10:8080 as root
pub fn deployment(checkouts: &Path) -> DeploymentConfig {
    DeploymentConfig::from_input(DeploymentInput {
        repository: Some("https://git.example.com/acme/shop.git".to_string()),
        token: Some("ghp_TOKEN123".to_string()),
        branch: Some("main".to_string()),
        host: Some("203.0.113.10".to_string()),
        user: Some("root".to_string()),
        password: Some("correct-horse".to_string()),
        port: Some(8080),
        checkout_root: checkouts.to_path_buf(),
        settle_delay: Duration::ZERO,
        ..DeploymentInput::default()
    })
    .unwrap()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Container {
    pub name: String,
    /// Compose project label, if started by compose
    pub project: Option<String>,
}

#[derive(Default)]
struct HostState {
    installed: BTreeSet<String>,
    files: BTreeMap<String, String>,
    dirs: BTreeSet<String>,
    containers: Vec<Container>,
    commands: Vec<String>,
    failures: Vec<(String, i32)>,
    transfer_failure: Option<i32>,
    unreachable: bool,
}

/// In-memory host
///
/// Understands the handful of commands a deployment issues (probes,
/// install scripts, file writes, docker and nginx) and keeps their
/// effects; anything else succeeds without effect. Cloning shares state.
#[derive(Clone, Default)]
pub struct FakeHost {
    state: Rc<RefCell<HostState>>,
}

impl FakeHost {
    /// Debian host with nothing but apt
    pub fn fresh() -> Self {
        let host = Self::default();
        host.install(&["apt-get"]);
        host
    }

    /// Debian host that already runs everything a deployment needs
    pub fn provisioned() -> Self {
        let host = Self::fresh();
        host.install(&["curl", "rsync", "docker", "compose", "nginx"]);
        host
    }

    pub fn install(&self, binaries: &[&str]) {
        let mut state = self.state.borrow_mut();
        for binary in binaries {
            state.installed.insert(binary.to_string());
        }
    }

    /// Every command (or stdin) containing `needle` exits with `code`
    pub fn fail_on(&self, needle: &str, code: i32) {
        self.state
            .borrow_mut()
            .failures
            .push((needle.to_string(), code));
    }

    /// The next transfers exit with `code`
    pub fn fail_transfer(&self, code: i32) {
        self.state.borrow_mut().transfer_failure = Some(code);
    }

    pub fn set_unreachable(&self) {
        self.state.borrow_mut().unreachable = true;
    }

    pub fn has(&self, binary: &str) -> bool {
        self.state.borrow().installed.contains(binary)
    }

    pub fn file(&self, path: &str) -> Option<String> {
        self.state.borrow().files.get(path).cloned()
    }

    pub fn has_dir(&self, path: &str) -> bool {
        self.state.borrow().dirs.contains(path)
    }

    pub fn containers(&self) -> Vec<Container> {
        self.state.borrow().containers.clone()
    }

    pub fn commands(&self) -> Vec<String> {
        self.state.borrow().commands.clone()
    }

    pub fn ran(&self, needle: &str) -> bool {
        self.state.borrow().commands.iter().any(|c| c.contains(needle))
    }

    pub fn forget_commands(&self) {
        self.state.borrow_mut().commands.clear();
    }

    fn respond(&self, command: &str, stdin: Option<&str>) -> CommandOutput {
        let mut state = self.state.borrow_mut();
        let full = match stdin {
            Some(input) => format!("{}\n{}", command, input),
            None => command.to_string(),
        };
        state.commands.push(full.clone());

        if let Some((needle, code)) = state
            .failures
            .iter()
            .find(|(needle, _)| full.contains(needle.as_str()))
            .cloned()
        {
            return exit(code, "", &format!("{}: simulated failure", needle));
        }

        if command == "bash -s" {
            return state.run_script(stdin.unwrap_or_default());
        }
        state.run_command(command, stdin)
    }
}

impl HostState {
    fn run_script(&mut self, script: &str) -> CommandOutput {
        let Some(name) = script
            .lines()
            .next()
            .and_then(|l| l.strip_prefix("# hoist: install "))
        else {
            return ok("");
        };
        let binaries: &[&str] = match name {
            "base packages" => &["curl", "rsync"],
            "docker" => &["docker"],
            "docker compose" => &["compose"],
            "nginx" => &["nginx"],
            _ => &[],
        };
        for binary in binaries {
            self.installed.insert(binary.to_string());
        }
        if name == "nginx" {
            self.files.insert(
                "/etc/nginx/sites-enabled/default".to_string(),
                "server { listen 80 default_server; }\n".to_string(),
            );
        }
        ok("")
    }

    fn run_command(&mut self, command: &str, stdin: Option<&str>) -> CommandOutput {
        let words = quoted_words(command);

        if command.starts_with("command -v ") {
            let present = command
                .split("command -v ")
                .skip(1)
                .filter_map(|rest| rest.split_whitespace().next())
                .all(|binary| self.installed.contains(binary));
            return status(present);
        }
        if command.starts_with("docker compose version") {
            if !self.installed.contains("compose") {
                return exit(1, "", "docker: 'compose' is not a docker command.");
            }
            return ok("Docker Compose version v2.29.1\n");
        }
        if command == "docker --version" {
            return ok("Docker version 27.1.1, build 6312585\n");
        }
        if command.starts_with("nginx -v") {
            return ok("nginx version: nginx/1.24.0\n");
        }
        if command.starts_with("rsync --version") {
            return ok("rsync  version 3.2.7  protocol version 31\n");
        }
        if let Some(unit) = command.strip_prefix("systemctl is-active --quiet ") {
            return status(self.installed.contains(unit));
        }
        if command.starts_with("test -d /etc/nginx/sites-available") {
            return status(self.installed.contains("nginx"));
        }
        if command.starts_with("test -f ") {
            return status(words.first().is_some_and(|p| self.files.contains_key(p)));
        }
        if command.starts_with("cat > ") {
            if let Some(dest) = words.last() {
                self.files
                    .insert(dest.clone(), stdin.unwrap_or_default().to_string());
            }
            return ok("");
        }
        if command.starts_with("ln -sf ") {
            if let [target, link] = words.as_slice() {
                let contents = self.files.get(target).cloned().unwrap_or_default();
                self.files.insert(link.clone(), contents);
            }
            return ok("");
        }
        if command.starts_with("mkdir -p ") {
            self.dirs.extend(words);
            return ok("");
        }
        if command.starts_with("rm -rf ") {
            for dir in &words {
                self.dirs.remove(dir);
                let prefix = format!("{}/", dir);
                self.files.retain(|path, _| !path.starts_with(&prefix));
            }
            return ok("");
        }
        if let Some(rest) = command.strip_prefix("rm -f ") {
            let paths: Vec<String> = if words.is_empty() {
                rest.split_whitespace().map(str::to_string).collect()
            } else {
                words
            };
            for path in &paths {
                self.files.remove(path);
            }
            return ok("");
        }
        if command.contains("docker compose -p ") {
            let project = command
                .split("-p '")
                .nth(1)
                .and_then(|rest| rest.split('\'').next())
                .unwrap_or_default()
                .to_string();
            if command.contains(" up -d") {
                self.containers.retain(|c| c.project.as_ref() != Some(&project));
                self.containers.push(Container {
                    name: format!("{}-web-1", project),
                    project: Some(project),
                });
            } else if command.contains(" down") {
                self.containers.retain(|c| c.project.as_ref() != Some(&project));
            }
            return ok("");
        }
        if command.starts_with("docker run -d --name ") {
            let name = words.first().cloned().unwrap_or_default();
            self.containers.push(Container {
                name,
                project: None,
            });
            return ok("");
        }
        if command.starts_with("docker rm -f ") {
            let before = self.containers.len();
            self.containers.retain(|c| !words.contains(&c.name));
            if self.containers.len() == before {
                return exit(1, "", "Error response from daemon: No such container");
            }
            return ok("");
        }
        if command.starts_with("docker ps --filter ") {
            let label = words
                .first()
                .and_then(|w| w.strip_prefix("label=com.docker.compose.project="));
            let names: Vec<&str> = self
                .containers
                .iter()
                .filter(|c| label.is_none() || c.project.as_deref() == label)
                .map(|c| c.name.as_str())
                .collect();
            return ok(&lines(&names));
        }
        if command.starts_with("curl ") {
            if self.containers.is_empty() {
                return exit(7, "000", "");
            }
            return ok("200");
        }
        ok("")
    }
}

impl RemoteShell for FakeHost {
    fn destination(&self) -> String {
        "root@203.0.113.10".to_string()
    }

    fn exec(&self, command: &str, stdin: Option<&str>) -> Result<CommandOutput, ShellError> {
        Ok(self.respond(command, stdin))
    }

    fn sync_dir(&self, local: &Path, remote_dir: &str) -> Result<CommandOutput, ShellError> {
        let mut state = self.state.borrow_mut();
        state.commands.push(format!("rsync {} {}", local.display(), remote_dir));
        if let Some(code) = state.transfer_failure {
            return Ok(exit(code, "", "rsync: connection unexpectedly closed"));
        }

        let prefix = format!("{}/", remote_dir);
        state.files.retain(|path, _| !path.starts_with(&prefix));
        for (relative, contents) in walk(local) {
            state
                .files
                .insert(format!("{}/{}", remote_dir, relative), contents);
        }
        state.dirs.insert(remote_dir.to_string());
        Ok(ok(""))
    }
}

/// Hands out the shared `FakeHost`, or refuses like an unreachable host
#[derive(Clone)]
pub struct FakeConnector {
    pub host: FakeHost,
}

impl Connector for FakeConnector {
    type Session = FakeHost;

    fn connect(&self, config: &DeploymentConfig) -> HoistResult<FakeHost> {
        if self.host.state.borrow().unreachable {
            return Err(HoistError::Connection {
                destination: config.destination(),
                message: "host unreachable or ssh refused the connection".to_string(),
                failure: Some(CommandFailure::new(
                    format!("ssh {} true", config.destination()),
                    Some(255),
                    "ssh: connect to host 203.0.113.10 port 22: Connection refused",
                )),
            });
        }
        Ok(self.host.clone())
    }
}

/// Repository whose clone writes a fixed set of files
#[derive(Clone, Default)]
pub struct FakeRepository {
    files: Vec<(String, String)>,
    clones: Rc<Cell<usize>>,
    fetches: Rc<Cell<usize>>,
    urls: Rc<RefCell<Vec<String>>>,
}

impl FakeRepository {
    pub fn with_file(mut self, name: &str, contents: &str) -> Self {
        self.files.push((name.to_string(), contents.to_string()));
        self
    }

    pub fn dockerfile() -> Self {
        Self::default().with_file("Dockerfile", DOCKERFILE)
    }

    pub fn compose() -> Self {
        Self::default()
            .with_file("Dockerfile", DOCKERFILE)
            .with_file("compose.yaml", COMPOSE)
    }

    pub fn clones(&self) -> usize {
        self.clones.get()
    }

    pub fn fetches(&self) -> usize {
        self.fetches.get()
    }

    /// URLs handed to clone and fetch
    pub fn urls(&self) -> Vec<String> {
        self.urls.borrow().clone()
    }
}

impl SourceRepository for FakeRepository {
    fn is_checkout(&self, path: &Path) -> bool {
        path.join(".git").is_dir()
    }

    fn clone_repo(&self, url: &str, dest: &Path) -> Result<(), CommandFailure> {
        self.clones.set(self.clones.get() + 1);
        self.urls.borrow_mut().push(url.to_string());
        fs::create_dir_all(dest.join(".git")).unwrap();
        for (name, contents) in &self.files {
            fs::write(dest.join(name), contents).unwrap();
        }
        Ok(())
    }

    fn fetch(&self, _path: &Path, url: &str, _branch: &str) -> Result<(), CommandFailure> {
        self.fetches.set(self.fetches.get() + 1);
        self.urls.borrow_mut().push(url.to_string());
        Ok(())
    }

    fn checkout(&self, _path: &Path, _branch: &str) -> Result<(), CommandFailure> {
        Ok(())
    }
}

/// `DeployLog` that keeps every record in memory
#[derive(Default)]
pub struct RecordingLog {
    records: Mutex<Vec<(LogLevel, String)>>,
}

impl RecordingLog {
    pub fn records(&self) -> Vec<(LogLevel, String)> {
        self.records.lock().unwrap().clone()
    }

    /// Whole log as text, one record per line
    pub fn text(&self) -> String {
        self.records()
            .iter()
            .map(|(level, message)| format!("[{}] {}", level, message))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.text().contains(needle)
    }
}

impl DeployLog for RecordingLog {
    fn record(&self, level: LogLevel, message: &str) {
        self.records
            .lock()
            .unwrap()
            .push((level, message.to_string()));
    }
}

/// One pipeline run against shared fakes
pub fn run(
    repository: &FakeRepository,
    host: &FakeHost,
    config: &DeploymentConfig,
    mode: RunMode,
) -> (RunSummary, Arc<RecordingLog>) {
    let log = Arc::new(RecordingLog::default());
    let pipeline = Pipeline::new(
        repository.clone(),
        FakeConnector { host: host.clone() },
        log.clone(),
    );
    let summary = pipeline.run(config, mode);
    (summary, log)
}

fn ok(stdout: &str) -> CommandOutput {
    exit(0, stdout, "")
}

fn status(success: bool) -> CommandOutput {
    exit(if success { 0 } else { 1 }, "", "")
}

fn exit(code: i32, stdout: &str, stderr: &str) -> CommandOutput {
    CommandOutput {
        stdout: stdout.to_string(),
        stderr: stderr.to_string(),
        exit_code: code,
    }
}

fn lines(items: &[&str]) -> String {
    items.iter().map(|i| format!("{}\n", i)).collect()
}

/// Single-quoted words of a command, in order
fn quoted_words(command: &str) -> Vec<String> {
    command
        .split('\'')
        .skip(1)
        .step_by(2)
        .map(str::to_string)
        .collect()
}

/// Files under `root` (skipping `.git`), as relative path and contents
fn walk(root: &Path) -> Vec<(String, String)> {
    let mut found = Vec::new();
    let mut pending: Vec<PathBuf> = vec![root.to_path_buf()];
    while let Some(dir) = pending.pop() {
        let Ok(entries) = fs::read_dir(&dir) else {
            continue;
        };
        for entry in entries.flatten() {
            let path = entry.path();
            if entry.file_name() == ".git" {
                continue;
            }
            if path.is_dir() {
                pending.push(path);
            } else if let Ok(relative) = path.strip_prefix(root) {
                let contents = fs::read_to_string(&path).unwrap_or_default();
                found.push((relative.to_string_lossy().into_owned(), contents));
            }
        }
    }
    found
}
