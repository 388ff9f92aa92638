//! Editor abstraction for editing decrypted notes.
//!
//! This module provides an abstraction for opening a file in an external editor,
//! allowing the application to work with different editors and to be testable
//! by mocking the editor functionality.

use crate::errors::{AppResult, EditorError};
use std::io::ErrorKind;
use std::path::Path;
use std::process::Command;
use tracing::debug;

/// Trait defining the interface for an editor component.
///
/// # Examples
///
/// ```
/// use sealnote::editor::Editor;
/// use sealnote::errors::AppResult;
/// use std::path::Path;
///
/// struct DummyEditor;
///
/// impl Editor for DummyEditor {
///     fn open_file(&self, path: &Path) -> AppResult<()> {
///         println!("Would open {}", path.display());
///         Ok(())
///     }
/// }
///
/// DummyEditor.open_file(Path::new("note.txt")).unwrap();
/// ```
pub trait Editor {
    /// Opens `path` and returns once the user is done editing.
    fn open_file(&self, path: &Path) -> AppResult<()>;
}

/// An implementation of the Editor trait that launches an external command.
///
/// ```no_run
/// use sealnote::editor::{Editor, SystemEditor};
/// use std::path::Path;
///
/// let editor = SystemEditor {
///     editor_cmd: "vim".to_string(),
/// };
/// editor.open_file(Path::new("note.txt")).expect("Failed to open file");
/// ```
pub struct SystemEditor {
    /// The command to use for opening files (e.g., "vim", "code", "nano").
    pub editor_cmd: String,
}

impl Editor for SystemEditor {
    /// Launches the editor and waits for it to exit.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Editor` with a specific `EditorError` variant depending on what went wrong:
    /// - `EditorError::CommandNotFound` if the editor command doesn't exist
    /// - `EditorError::PermissionDenied` if permission is denied to execute the editor
    /// - `EditorError::ExecutionFailed` for other I/O errors during execution
    /// - `EditorError::NonZeroExit` if the editor exits with a non-zero status code
    fn open_file(&self, path: &Path) -> AppResult<()> {
        let command = self.editor_cmd.clone();
        debug!("Launching editor: {}", command);

        match Command::new(&self.editor_cmd).arg(path).status() {
            Ok(status) if status.success() => Ok(()),
            Ok(status) => Err(EditorError::NonZeroExit {
                command,
                status_code: status.code().unwrap_or(-1),
            }
            .into()),
            Err(e) => {
                let specific_error = match e.kind() {
                    ErrorKind::NotFound => EditorError::CommandNotFound { command, source: e },
                    ErrorKind::PermissionDenied => {
                        EditorError::PermissionDenied { command, source: e }
                    }
                    _ => EditorError::ExecutionFailed { command, source: e },
                };
                Err(specific_error.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AppError;

    #[test]
    fn test_missing_editor_command() {
        let editor = SystemEditor {
            editor_cmd: "sealnote-definitely-not-an-editor".to_string(),
        };

        match editor.open_file(Path::new("note.txt")) {
            Err(AppError::Editor(EditorError::CommandNotFound { command, .. })) => {
                assert_eq!(command, "sealnote-definitely-not-an-editor");
            }
            other => panic!("Expected CommandNotFound, got {:?}", other),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_editor_success_and_failure_status() {
        let ok = SystemEditor {
            editor_cmd: "true".to_string(),
        };
        assert!(ok.open_file(Path::new("note.txt")).is_ok());

        let failing = SystemEditor {
            editor_cmd: "false".to_string(),
        };
        match failing.open_file(Path::new("note.txt")) {
            Err(AppError::Editor(EditorError::NonZeroExit { status_code, .. })) => {
                assert_eq!(status_code, 1);
            }
            other => panic!("Expected NonZeroExit, got {:?}", other),
        }
    }
}
