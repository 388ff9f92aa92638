//! Error handling utilities for the sealnote application.
//!
//! This module provides the note store's closed error taxonomy `NoteError`, the
//! cipher engine's `CryptoError`, and the central application error `AppError`
//! together with the convenience alias `AppResult`.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the note registry.
///
/// Every registry operation reports failures through exactly one of these
/// variants. Wrong passwords and damaged files both surface as
/// [`NoteError::Authentication`]; the cipher cannot tell them apart.
///
/// # Examples
///
/// ```
/// use sealnote::errors::NoteError;
///
/// let error = NoteError::DuplicateName { name: "diary".to_string() };
/// assert!(format!("{}", error).contains("diary"));
/// assert!(format!("{}", error).contains("already exists"));
/// ```
#[derive(Debug, Error)]
pub enum NoteError {
    /// A note with this name is already registered.
    #[error("A note named '{name}' already exists. Choose another name.")]
    DuplicateName {
        /// The conflicting name
        name: String,
    },

    /// No note with this name is registered.
    #[error("No note named '{name}' was found.")]
    NotFound {
        /// The missing name
        name: String,
    },

    /// Decryption failed: wrong password, or the stored token is damaged.
    #[error("Incorrect password or corrupted note.")]
    Authentication,

    /// The underlying filesystem operation failed.
    #[error("Storage error at {path}: {source}")]
    Storage {
        /// The path the operation touched
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },

    /// The name cannot be used as a note file name.
    #[error("Invalid note name '{name}': {reason}")]
    InvalidName {
        /// The rejected name
        name: String,
        /// Why it was rejected
        reason: String,
    },

    /// The cipher refused to encrypt the body.
    #[error("Encryption failed: {0}")]
    Encryption(String),
}

impl NoteError {
    /// Wraps an I/O error with the path it occurred on.
    pub fn storage(path: impl Into<PathBuf>, source: io::Error) -> Self {
        NoteError::Storage {
            path: path.into(),
            source,
        }
    }
}

/// Errors raised by the cipher engine.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// The token did not verify under the supplied key.
    #[error("Token failed authentication")]
    Authentication,

    /// The token is not a well-formed sealnote token.
    #[error("Malformed token: {0}")]
    MalformedToken(String),

    /// Encryption failed.
    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),
}

impl From<CryptoError> for NoteError {
    fn from(err: CryptoError) -> Self {
        match err {
            CryptoError::Authentication | CryptoError::MalformedToken(_) => {
                NoteError::Authentication
            }
            CryptoError::EncryptionFailed(message) => NoteError::Encryption(message),
        }
    }
}

/// Represents specific error cases that can occur when interacting with external editors.
///
/// # Examples
///
/// ```
/// use sealnote::errors::EditorError;
///
/// let error = EditorError::NonZeroExit {
///     command: "vim".to_string(),
///     status_code: 1,
/// };
///
/// assert!(format!("{}", error).contains("non-zero status code"));
/// assert!(format!("{}", error).contains("vim"));
/// ```
#[derive(Debug, Error)]
pub enum EditorError {
    /// Error when the specified editor command cannot be found.
    #[error("Editor command '{command}' not found: {source}. Please check that the editor is installed and available in your PATH.")]
    CommandNotFound {
        /// The editor command that was not found
        command: String,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Error when permission is denied to execute the editor command.
    #[error("Permission denied when trying to execute editor '{command}': {source}. Please check file permissions or try running with appropriate access rights.")]
    PermissionDenied {
        /// The editor command that had permission denied
        command: String,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Error when the editor command fails to execute due to other I/O errors.
    #[error("Failed to execute editor '{command}': {source}. Please check system resources, disk space, or editor installation.")]
    ExecutionFailed {
        /// The editor command that failed to execute
        command: String,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Error when the editor exits with a non-zero status code.
    #[error("Editor '{command}' exited with non-zero status code: {status_code}. The note was left unchanged.")]
    NonZeroExit {
        /// The editor command that exited with a non-zero status
        command: String,
        /// The exit status code
        status_code: i32,
    },
}

/// Represents all possible errors that can occur in the sealnote application.
///
/// Note: This type does not implement `Clone` to avoid losing error context when
/// cloning `std::io::Error` values.
///
/// # Examples
///
/// Creating a configuration error:
/// ```
/// use sealnote::errors::AppError;
///
/// let error = AppError::Config("Missing notes directory".to_string());
/// assert_eq!(format!("{}", error), "Configuration error: Missing notes directory");
/// ```
///
/// Converting from a note error:
/// ```
/// use sealnote::errors::{AppError, NoteError};
///
/// let app_error: AppError = NoteError::Authentication.into();
/// assert!(matches!(app_error, AppError::Note(NoteError::Authentication)));
/// ```
#[derive(Debug, Error)]
pub enum AppError {
    /// Errors related to configuration loading or validation.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Input/output errors outside the note store (stdin, scratch files).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Errors from note store operations.
    #[error("{0}")]
    Note(#[from] NoteError),

    /// Errors when interacting with the text editor.
    #[error("Editor error: {0}")]
    Editor(#[from] EditorError),

    /// Errors while asking the user for input (passwords, confirmations).
    #[error("Input error: {0}")]
    Prompt(String),
}

/// A type alias for `Result<T, AppError>` to simplify function signatures.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_app_error_from_io_error() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "file not found");

        let app_error: AppError = io_error.into();

        match app_error {
            AppError::Io(inner) => {
                assert_eq!(inner.kind(), io::ErrorKind::NotFound);
            }
            _ => panic!("Expected AppError::Io variant"),
        }
    }

    #[test]
    fn test_note_error_display() {
        let error = NoteError::NotFound {
            name: "diary".to_string(),
        };
        assert_eq!(format!("{}", error), "No note named 'diary' was found.");

        let error = NoteError::Authentication;
        assert!(format!("{}", error).contains("Incorrect password"));

        let error = NoteError::InvalidName {
            name: "a/b".to_string(),
            reason: "contains '/'".to_string(),
        };
        assert!(format!("{}", error).contains("a/b"));
        assert!(format!("{}", error).contains("contains '/'"));
    }

    #[test]
    fn test_app_error_wraps_note_error_transparently() {
        let app_error: AppError = NoteError::DuplicateName {
            name: "diary".to_string(),
        }
        .into();
        assert_eq!(
            format!("{}", app_error),
            "A note named 'diary' already exists. Choose another name."
        );
    }

    #[test]
    fn test_crypto_error_collapses_to_authentication() {
        let note_error: NoteError = CryptoError::Authentication.into();
        assert!(matches!(note_error, NoteError::Authentication));

        let note_error: NoteError = CryptoError::MalformedToken("too short".to_string()).into();
        assert!(matches!(note_error, NoteError::Authentication));

        let note_error: NoteError = CryptoError::EncryptionFailed("aead".to_string()).into();
        match note_error {
            NoteError::Encryption(message) => assert_eq!(message, "aead"),
            other => panic!("Expected NoteError::Encryption, got {:?}", other),
        }
    }

    #[test]
    fn test_storage_error_source_chaining() {
        let io_error = io::Error::new(io::ErrorKind::PermissionDenied, "permission denied");
        let error = NoteError::storage("/notes/diary.encryptednote", io_error);

        assert!(format!("{}", error).contains("/notes/diary.encryptednote"));

        let source = error
            .source()
            .expect("NoteError::Storage should have a source");
        let source_io_error = source
            .downcast_ref::<io::Error>()
            .expect("Source should be an io::Error");
        assert_eq!(source_io_error.kind(), io::ErrorKind::PermissionDenied);
    }

    #[test]
    fn test_editor_error_variants() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "command not found");
        let error = EditorError::CommandNotFound {
            command: "vim".to_string(),
            source: io_error,
        };
        assert!(format!("{}", error).contains("not found"));
        assert!(format!("{}", error).contains("vim"));

        let io_error = io::Error::new(io::ErrorKind::PermissionDenied, "permission denied");
        let error = EditorError::PermissionDenied {
            command: "vim".to_string(),
            source: io_error,
        };
        assert!(format!("{}", error).contains("Permission denied"));

        let error = EditorError::ExecutionFailed {
            command: "vim".to_string(),
            source: io::Error::other("disk full"),
        };
        assert!(format!("{}", error).contains("Failed to execute"));

        let error = EditorError::NonZeroExit {
            command: "vim".to_string(),
            status_code: 2,
        };
        assert!(format!("{}", error).contains("2"));
    }

    #[test]
    fn test_result_combinators() {
        let io_result: Result<(), io::Error> = Err(io::Error::other("test error"));
        let app_result: AppResult<()> = io_result.map_err(AppError::Io);

        match app_result {
            Err(AppError::Io(inner)) => {
                assert_eq!(inner.kind(), io::ErrorKind::Other);
            }
            _ => panic!("Expected AppError::Io variant"),
        }
    }
}
