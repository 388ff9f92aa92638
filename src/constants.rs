//! Constants used throughout the application.
//!
//! This module contains all constants used in the sealnote application, organized
//! into logical groups. Having constants centralized makes them easier to find,
//! modify, and reference consistently.

// Application Metadata
/// The name of the application.
pub const APP_NAME: &str = "sealnote";
/// The description of the application used in CLI help text.
pub const APP_DESCRIPTION: &str = "Password-protected notes, one encrypted file per note";

// CLI Arguments & Defaults
/// Default command for the editor if not specified otherwise.
pub const DEFAULT_EDITOR_COMMAND: &str = "vim";
/// Log format identifier for plain text.
pub const LOG_FORMAT_TEXT: &str = "text";
/// Log format identifier for JSON.
pub const LOG_FORMAT_JSON: &str = "json";
/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";
/// Log level used with `--verbose`.
pub const VERBOSE_LOG_LEVEL: &str = "debug";

// Configuration Keys & Environment Variables
/// Environment variable for specifying the note storage directory.
pub const ENV_VAR_SEALNOTE_DIR: &str = "SEALNOTE_DIR";
/// Environment variable for specifying the preferred editor.
pub const ENV_VAR_SEALNOTE_EDITOR: &str = "SEALNOTE_EDITOR";
/// Standard environment variable for specifying the default editor.
pub const ENV_VAR_EDITOR: &str = "EDITOR";
/// Standard environment variable for the user's home directory.
pub const ENV_VAR_HOME: &str = "HOME";
/// Environment variable often used to indicate a Continuous Integration environment.
pub const ENV_VAR_CI: &str = "CI";
/// Password used instead of prompting, for non-interactive test runs.
pub const ENV_VAR_TEST_PASSWORD: &str = "SEALNOTE_TEST_PASSWORD";
/// Replacement password used instead of prompting by `passwd` and `rename --change-password`.
pub const ENV_VAR_TEST_NEW_PASSWORD: &str = "SEALNOTE_TEST_NEW_PASSWORD";
/// Default sub-directory for notes within the user's home directory.
pub const DEFAULT_NOTES_SUBDIR: &str = ".sealnote/notes";

// Validation
/// Characters forbidden in editor commands for security reasons.
pub const EDITOR_FORBIDDEN_CHARS: &[char] =
    &['|', '&', ';', '$', '(', ')', '`', '\\', '<', '>', '\'', '"'];
/// Characters that may not appear in a note name, since names become file names.
pub const NOTE_NAME_FORBIDDEN_CHARS: &[char] = &['/', '\\', '\0'];
/// Placeholder string for redacted information in debug output.
pub const REDACTED_PLACEHOLDER: &str = "[REDACTED]";

// File System Parameters
/// File extension of an encrypted note, both in the store and for import/export.
pub const NOTE_FILE_EXTENSION: &str = ".encryptednote";
/// Base name used on import when the source file name yields no usable name.
pub const IMPORT_FALLBACK_NAME: &str = "imported";
/// Default POSIX permissions for newly created directories (owner read/write/execute).
#[cfg(unix)]
pub const DEFAULT_DIR_PERMISSIONS: u32 = 0o700;
/// Default POSIX permissions for newly created files (owner read/write).
#[cfg(unix)]
pub const DEFAULT_FILE_PERMISSIONS: u32 = 0o600;
/// RAM-backed directories preferred for decrypted scratch files.
pub const TMPFS_PATHS: &[&str] = &["/dev/shm", "/run/shm"];

// Token Format
/// Leading byte of every Fernet token.
pub const TOKEN_VERSION: u8 = 0x80;
/// Length of the derived key in bytes.
pub const KEY_LEN: usize = 32;
/// Length of the AES-CBC initialization vector in bytes.
pub const IV_LEN: usize = 16;
/// AES block length; the ciphertext is always a whole number of blocks.
pub const CIPHER_BLOCK_LEN: usize = 16;
/// Length of the trailing HMAC-SHA256 in bytes.
pub const HMAC_LEN: usize = 32;
/// Length of the header (version byte and issue timestamp).
pub const TOKEN_HEADER_LEN: usize = 1 + 8;

// Logging Configuration
/// Service name used in tracing spans and structured logs.
pub const TRACING_SERVICE_NAME: &str = "sealnote";
