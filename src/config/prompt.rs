//! Interactive completion of missing values
//!
//! Only fields that are still unset after file, environment and flags are
//! asked for. Secrets are read without echo.

use dialoguer::{Input, Password};

use crate::error::{HoistError, HoistResult};

use super::types::Config;

fn prompt_failed(err: dialoguer::Error) -> HoistError {
    HoistError::config(format!("prompt failed: {}", err))
}

fn ask_text(prompt: &str) -> HoistResult<String> {
    Input::<String>::new()
        .with_prompt(prompt)
        .interact_text()
        .map_err(prompt_failed)
}

fn ask_secret(prompt: &str) -> HoistResult<String> {
    Password::new()
        .with_prompt(prompt)
        .interact()
        .map_err(prompt_failed)
}

/// Names of required values that are still missing
pub fn missing_fields(config: &Config) -> Vec<&'static str> {
    let mut missing = Vec::new();
    if config.source.repository.is_none() {
        missing.push("repository");
    }
    if config.source.token.is_none() {
        missing.push("token");
    }
    if config.remote.host.is_none() {
        missing.push("host");
    }
    if config.remote.password.is_none() {
        missing.push("password");
    }
    if config.app.port.is_none() {
        missing.push("port");
    }
    missing
}

/// Ask on the terminal for every missing required value
pub fn fill_missing(mut config: Config) -> HoistResult<Config> {
    if config.source.repository.is_none() {
        config.source.repository = Some(ask_text("Repository URL")?);
    }
    if config.source.token.is_none() {
        config.source.token = Some(ask_secret("Access token")?);
    }
    if config.remote.host.is_none() {
        config.remote.host = Some(ask_text("Remote host")?);
    }
    if config.remote.password.is_none() {
        let user = config.remote.user.as_deref().unwrap_or("root");
        config.remote.password = Some(ask_secret(&format!("Password for {}", user))?);
    }
    if config.app.port.is_none() {
        let port = Input::<i64>::new()
            .with_prompt("Application port")
            .interact_text()
            .map_err(prompt_failed)?;
        config.app.port = Some(port);
    }
    Ok(config)
}
