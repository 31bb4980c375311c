//! Configuration loading and layering

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{HoistError, HoistResult};

use super::types::Config;

/// Non-fatal configuration warning surfaced to CLI users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub key: String,
    pub file: PathBuf,
    pub line: Option<usize>,
    pub suggestion: Option<String>,
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown key '{}' in {}", self.key, self.file.display())?;
        if let Some(line) = self.line {
            write!(f, ":{}", line)?;
        }
        if let Some(suggestion) = &self.suggestion {
            write!(f, " (did you mean '{}'?)", suggestion)?;
        }
        Ok(())
    }
}

/// Flag values; each one set replaces the file and environment value
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliOverrides {
    pub repository: Option<String>,
    pub branch: Option<String>,
    pub host: Option<String>,
    pub user: Option<String>,
    pub port: Option<i64>,
}

/// Load configuration and collect non-fatal warnings (e.g. unknown keys).
pub fn load_with_warnings(path: &Path) -> HoistResult<(Config, Vec<ConfigWarning>)> {
    let content = fs::read_to_string(path).map_err(|e| {
        HoistError::config(format!("cannot read {}: {}", path.display(), e))
    })?;

    let mut unknown_paths: Vec<String> = Vec::new();
    let deserializer = toml::de::Deserializer::new(&content);

    let config: Config = serde_ignored::deserialize(deserializer, |p| {
        unknown_paths.push(p.to_string());
    })
    .map_err(|e| HoistError::config(format!("{}: {}", path.display(), e)))?;

    let warnings = unknown_paths
        .into_iter()
        .map(|path_str| {
            let key = path_str
                .split('.')
                .next_back()
                .unwrap_or(path_str.as_str())
                .to_string();
            ConfigWarning {
                key: key.clone(),
                file: path.to_path_buf(),
                line: find_line_number(&content, &key),
                suggestion: suggest_key(&key),
            }
        })
        .collect();

    Ok((config, warnings))
}

/// Load `explicit`, or `hoist.toml` in `dir` if present, or defaults
///
/// An explicitly named file must exist.
pub fn load_or_default(
    explicit: Option<&Path>,
    dir: &Path,
) -> HoistResult<(Config, Vec<ConfigWarning>)> {
    if let Some(path) = explicit {
        if !path.is_file() {
            return Err(HoistError::config(format!(
                "config file {} not found",
                path.display()
            )));
        }
        return load_with_warnings(path);
    }

    let default_path = dir.join(super::CONFIG_FILE);
    if default_path.is_file() {
        return load_with_warnings(&default_path);
    }
    Ok((Config::default(), Vec::new()))
}

/// Apply environment variable overrides (HOIST_* prefix)
///
/// `lookup` is `std::env::var(..).ok()` in production.
pub fn with_env_overrides(
    mut config: Config,
    lookup: impl Fn(&str) -> Option<String>,
) -> HoistResult<Config> {
    let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

    if let Some(v) = get("HOIST_REPOSITORY") {
        config.source.repository = Some(v);
    }
    if let Some(v) = get("HOIST_BRANCH") {
        config.source.branch = Some(v);
    }
    if let Some(v) = get("HOIST_SOURCE_TOKEN") {
        config.source.token = Some(v);
    }
    if let Some(v) = get("HOIST_HOST") {
        config.remote.host = Some(v);
    }
    if let Some(v) = get("HOIST_USER") {
        config.remote.user = Some(v);
    }
    if let Some(v) = get("HOIST_REMOTE_PASSWORD") {
        config.remote.password = Some(v);
    }
    if let Some(v) = get("HOIST_PORT") {
        config.app.port = Some(parse_number("HOIST_PORT", &v)?);
    }
    if let Some(v) = get("HOIST_SETTLE_SECS") {
        config.app.settle_secs = Some(parse_number("HOIST_SETTLE_SECS", &v)?);
    }
    if let Some(v) = get("HOIST_LOG_DIR") {
        config.paths.log_dir = Some(PathBuf::from(v));
    }

    Ok(config)
}

/// Apply command-line flags
pub fn with_cli_overrides(mut config: Config, cli: &CliOverrides) -> Config {
    if let Some(v) = &cli.repository {
        config.source.repository = Some(v.clone());
    }
    if let Some(v) = &cli.branch {
        config.source.branch = Some(v.clone());
    }
    if let Some(v) = &cli.host {
        config.remote.host = Some(v.clone());
    }
    if let Some(v) = &cli.user {
        config.remote.user = Some(v.clone());
    }
    if let Some(v) = cli.port {
        config.app.port = Some(v);
    }
    config
}

fn parse_number<T: std::str::FromStr>(name: &str, value: &str) -> HoistResult<T> {
    value
        .trim()
        .parse()
        .map_err(|_| HoistError::config(format!("{} must be a number, got '{}'", name, value)))
}

fn find_line_number(content: &str, needle: &str) -> Option<usize> {
    content
        .lines()
        .position(|line| line.trim_start().starts_with(needle))
        .map(|i| i + 1)
}

fn suggest_key(unknown: &str) -> Option<String> {
    const CANDIDATES: &[&str] = &[
        "source",
        "repository",
        "branch",
        "token",
        "remote",
        "host",
        "user",
        "password",
        "base_dir",
        "connect_timeout_secs",
        "app",
        "port",
        "settle_secs",
        "paths",
        "work_dir",
        "log_dir",
    ];

    let mut best: Option<(&str, usize)> = None;
    for candidate in CANDIDATES {
        let dist = levenshtein(unknown, candidate);
        best = match best {
            None => Some((candidate, dist)),
            Some((_, best_dist)) if dist < best_dist => Some((candidate, dist)),
            Some(current) => Some(current),
        };
    }

    match best {
        Some((candidate, dist)) if dist <= 2 => Some(candidate.to_string()),
        _ => None,
    }
}

fn levenshtein(a: &str, b: &str) -> usize {
    if a == b {
        return 0;
    }

    let b_bytes = b.as_bytes();
    let mut prev: Vec<usize> = (0..=b_bytes.len()).collect();
    let mut curr = vec![0usize; b_bytes.len() + 1];

    for (i, &ac) in a.as_bytes().iter().enumerate() {
        curr[0] = i + 1;
        for (j, &bc) in b_bytes.iter().enumerate() {
            let cost = usize::from(ac != bc);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b_bytes.len()]
}
