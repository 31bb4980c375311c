//! Configuration module for Hoist
//!
//! Layers, highest priority first:
//! 1. CLI flags
//! 2. Environment variables (HOIST_*)
//! 3. Project config (`hoist.toml`, or the file given with `--config`)
//! 4. Interactive prompts for whatever required value is still missing
//! 5. Built-in defaults (branch `main`, user `root`, remote base `/opt`)

mod loader;
mod prompt;
mod types;

pub use loader::{
    load_or_default, load_with_warnings, with_cli_overrides, with_env_overrides, CliOverrides,
    ConfigWarning,
};
pub use prompt::{fill_missing, missing_fields};
pub use types::{AppConfig, Config, PathsConfig, RemoteConfig, SourceConfig};

/// Default project config file name
pub const CONFIG_FILE: &str = "hoist.toml";
