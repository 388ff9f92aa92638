/*!
# Sealnote

Sealnote keeps a set of named text notes, each encrypted independently under its
own password and stored as one `<name>.encryptednote` file in a notes directory.

## Core Features

- Create, read, save, rename and delete password-protected notes
- Change a note's password, optionally together with its name
- Import and export notes as self-contained encrypted files
- Edit notes in an external editor through wiped scratch files

## Architecture

- `crypto`: Password-to-key derivation, authenticated tokens, secure scratch files
- `store`: The note registry and its filesystem adapter
- `ops`: Workflows combining the registry with the editor
- `cli`: Command-line interface handling using clap
- `config`: Configuration loading and validation
- `errors`: Error handling infrastructure

## Usage Example

```rust,no_run
use sealnote::{Config, NoteRegistry};
use secrecy::SecretString;

fn main() -> sealnote::AppResult<()> {
    let config = Config::load()?;
    let mut registry = NoteRegistry::open(&config.notes_dir)?;

    let password = SecretString::new("p1".to_string());
    registry.create("diary", &password)?;
    registry.save("diary", "hello", &password)?;
    println!("{}", registry.decrypt("diary", &password)?);
    Ok(())
}
```
*/

/// Command-line interface for parsing and handling user arguments
pub mod cli;
/// Configuration loading and management
pub mod config;
/// Application-wide constants
pub mod constants;
/// Key derivation, note tokens and scratch files
pub mod crypto;
/// External editor integration
pub mod editor;
/// Error types and utilities for error handling
pub mod errors;
/// Workflows built on the note registry
pub mod ops;
/// Password and confirmation prompts
pub mod prompt;
/// The encrypted note registry
pub mod store;

// Re-export important types for convenience
pub use cli::CliArgs;
pub use config::Config;
pub use errors::{AppError, AppResult, NoteError};
pub use store::NoteRegistry;
