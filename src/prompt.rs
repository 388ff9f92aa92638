//! Interactive prompts for passwords and confirmations.
//!
//! Passwords are read without echo via `rpassword` and handed out as
//! `SecretString`s. For non-interactive runs the `SEALNOTE_TEST_PASSWORD` and
//! `SEALNOTE_TEST_NEW_PASSWORD` variables replace the prompts.

use crate::constants::{ENV_VAR_TEST_NEW_PASSWORD, ENV_VAR_TEST_PASSWORD};
use crate::errors::{AppError, AppResult};
use secrecy::{ExposeSecret, SecretString};
use std::env;
use std::io::{self, BufRead, Write};
use tracing::debug;

/// Asks for the password of an existing note.
pub fn existing_password(prompt: &str) -> AppResult<SecretString> {
    if let Ok(password) = env::var(ENV_VAR_TEST_PASSWORD) {
        debug!("Using password from {}", ENV_VAR_TEST_PASSWORD);
        return non_empty(SecretString::new(password));
    }

    non_empty(read_secret(prompt)?)
}

/// Asks for a password that will protect a note, with confirmation.
///
/// `replacing` selects the replacement-password override, used when the
/// current password is also needed in the same command.
pub fn new_password(prompt: &str, replacing: bool) -> AppResult<SecretString> {
    let override_var = if replacing {
        ENV_VAR_TEST_NEW_PASSWORD
    } else {
        ENV_VAR_TEST_PASSWORD
    };
    if let Ok(password) = env::var(override_var) {
        debug!("Using password from {}", override_var);
        return non_empty(SecretString::new(password));
    }

    let password = read_secret(prompt)?;
    let confirmation = read_secret("Confirm password: ")?;

    if !same_secret(&password, &confirmation) {
        return Err(AppError::Prompt("Passwords do not match".to_string()));
    }
    non_empty(password)
}

/// Reads a password without echo, wrapping it before anything else sees it.
fn read_secret(prompt: &str) -> AppResult<SecretString> {
    rpassword::prompt_password(prompt)
        .map(SecretString::new)
        .map_err(|e| AppError::Prompt(format!("Failed to read password: {}", e)))
}

fn same_secret(a: &SecretString, b: &SecretString) -> bool {
    a.expose_secret() == b.expose_secret()
}

fn non_empty(password: SecretString) -> AppResult<SecretString> {
    if password.expose_secret().is_empty() {
        return Err(AppError::Prompt("Password cannot be empty".to_string()));
    }
    Ok(password)
}

/// Asks a yes/no question on stderr, defaulting to no.
pub fn confirm(question: &str) -> AppResult<bool> {
    let mut stderr = io::stderr();
    write!(stderr, "{} [y/N] ", question)?;
    stderr.flush()?;

    let mut input = String::new();
    io::stdin().lock().read_line(&mut input)?;

    Ok(parse_yes_no(&input))
}

fn parse_yes_no(input: &str) -> bool {
    matches!(input.trim().to_lowercase().as_str(), "y" | "yes")
}
