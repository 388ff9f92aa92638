//! Where notes live and which editor opens them.
//!
//! Everything comes from the environment; there is no config file.
//!
//! | Variable | Meaning | Default |
//! |---|---|---|
//! | `SEALNOTE_DIR` | Notes directory; `~` and `$VARS` are expanded | `$HOME/.sealnote/notes` |
//! | `SEALNOTE_EDITOR` | Editor for `sealnote edit` | `$EDITOR`, then `vim` |
//!
//! The notes directory does not have to exist yet: [`Config::open_registry`]
//! creates it owner-only on first use.

use crate::constants::{
    DEFAULT_EDITOR_COMMAND, DEFAULT_NOTES_SUBDIR, EDITOR_FORBIDDEN_CHARS, ENV_VAR_EDITOR,
    ENV_VAR_HOME, ENV_VAR_SEALNOTE_DIR, ENV_VAR_SEALNOTE_EDITOR, REDACTED_PLACEHOLDER,
};
use crate::errors::{AppError, AppResult};
use crate::store::NoteRegistry;
use std::env;
use std::fmt;
use std::path::PathBuf;
use tracing::debug;

/// Resolved settings for one invocation.
///
/// ```
/// use sealnote::Config;
/// use std::path::PathBuf;
///
/// let config = Config {
///     editor: "nano".to_string(),
///     notes_dir: PathBuf::from("/home/me/.sealnote/notes"),
/// };
/// assert!(config.validate().is_ok());
/// ```
pub struct Config {
    /// Editor command, a single program name or path without arguments.
    pub editor: String,

    /// Directory holding the `*.encryptednote` files; the registry's index is
    /// rebuilt from it on every open.
    pub notes_dir: PathBuf,
}

// Paths can identify the user, so neither field is printed.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("editor", &REDACTED_PLACEHOLDER)
            .field("notes_dir", &REDACTED_PLACEHOLDER)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            editor: DEFAULT_EDITOR_COMMAND.to_string(),
            notes_dir: PathBuf::new(),
        }
    }
}

impl Config {
    /// Reads the configuration from the environment.
    ///
    /// # Errors
    ///
    /// `AppError::Config` if the editor command is unsafe to run, or if
    /// `SEALNOTE_DIR` cannot be expanded or expands to nothing.
    pub fn load() -> AppResult<Self> {
        let config = Config {
            editor: editor_from_env()?,
            notes_dir: notes_dir_from_env()?,
        };
        debug!("Configuration loaded");
        Ok(config)
    }

    /// Checks the invariants `load` does not enforce, for configs built by hand.
    ///
    /// # Errors
    ///
    /// `AppError::Config` with one of:
    /// - "Notes directory path is empty"
    /// - "Editor command is empty"
    /// - "Notes directory must be an absolute path"
    pub fn validate(&self) -> AppResult<()> {
        if self.notes_dir.as_os_str().is_empty() {
            return Err(AppError::Config("Notes directory path is empty".to_string()));
        }
        if self.editor.is_empty() {
            return Err(AppError::Config("Editor command is empty".to_string()));
        }
        if !self.notes_dir.is_absolute() {
            return Err(AppError::Config(
                "Notes directory must be an absolute path".to_string(),
            ));
        }
        Ok(())
    }

    /// Opens the note registry for `notes_dir`, creating the directory if needed.
    pub fn open_registry(&self) -> AppResult<NoteRegistry> {
        Ok(NoteRegistry::open(&self.notes_dir)?)
    }
}

/// `SEALNOTE_EDITOR`, then `EDITOR`, then `vim`, checked before it is ever run.
fn editor_from_env() -> AppResult<String> {
    let editor = env::var(ENV_VAR_SEALNOTE_EDITOR)
        .or_else(|_| env::var(ENV_VAR_EDITOR))
        .unwrap_or_else(|_| DEFAULT_EDITOR_COMMAND.to_string());
    check_editor_command(&editor)?;
    Ok(editor)
}

/// `SEALNOTE_DIR` expanded, or `.sealnote/notes` under `$HOME`.
fn notes_dir_from_env() -> AppResult<PathBuf> {
    let raw = env::var(ENV_VAR_SEALNOTE_DIR).unwrap_or_else(|_| {
        let home = env::var(ENV_VAR_HOME).unwrap_or_default();
        format!("{}/{}", home, DEFAULT_NOTES_SUBDIR)
    });

    let expanded = shellexpand::full(&raw)
        .map_err(|e| AppError::Config(format!("Failed to expand path: {}", e)))?;
    let notes_dir = PathBuf::from(expanded.into_owned());

    if notes_dir.as_os_str().is_empty() {
        return Err(AppError::Config("Notes directory path is empty".to_string()));
    }
    Ok(notes_dir)
}

/// The editor is spawned directly with the scratch file as its only argument,
/// so anything that needs a shell to mean what it says is refused.
fn check_editor_command(editor_cmd: &str) -> AppResult<()> {
    if editor_cmd.is_empty() {
        return Err(AppError::Config(
            "Editor command cannot be empty".to_string(),
        ));
    }

    if editor_cmd.contains(' ') {
        return Err(AppError::Config(
            "Editor command cannot contain spaces. Use a wrapper script or shell alias for editors requiring arguments".to_string(),
        ));
    }

    if let Some(ch) = editor_cmd
        .chars()
        .find(|ch| EDITOR_FORBIDDEN_CHARS.contains(ch))
    {
        return Err(AppError::Config(format!(
            "Editor command cannot contain shell metacharacters: '{}'. Use a wrapper script or shell alias instead",
            ch
        )));
    }

    Ok(())
}
