//! Command-line interface definitions.
//!
//! One subcommand per note store operation. Passwords are never accepted as
//! arguments; they are prompted for (see `main.rs`).

use crate::constants::{APP_DESCRIPTION, APP_NAME, LOG_FORMAT_JSON, LOG_FORMAT_TEXT};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Password-protected notes, one encrypted file per note
#[derive(Parser, Debug)]
#[command(name = APP_NAME, about = APP_DESCRIPTION, author, version, long_about = None)]
pub struct CliArgs {
    /// Print verbose output
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// Log output format
    #[arg(
        long,
        global = true,
        default_value = LOG_FORMAT_TEXT,
        value_parser = [LOG_FORMAT_TEXT, LOG_FORMAT_JSON]
    )]
    pub log_format: String,

    #[command(subcommand)]
    pub command: Command,
}

/// Note store operations.
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// List note names
    List,

    /// Create an empty note protected by a new password
    New {
        /// Name of the note
        name: String,
    },

    /// Decrypt a note and print it
    Show {
        /// Name of the note
        name: String,
    },

    /// Replace a note's body with standard input
    Save {
        /// Name of the note
        name: String,
    },

    /// Edit a note in $SEALNOTE_EDITOR / $EDITOR
    Edit {
        /// Name of the note
        name: String,
    },

    /// Delete a note
    Delete {
        /// Name of the note
        name: String,

        /// Do not ask for confirmation
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Rename a note
    Rename {
        /// Current name
        old: String,

        /// New name
        new: String,

        /// Also re-encrypt the note under a new password
        #[arg(long)]
        change_password: bool,
    },

    /// Change a note's password
    Passwd {
        /// Name of the note
        name: String,
    },

    /// Import an exported .encryptednote file
    Import {
        /// File to import
        file: PathBuf,
    },

    /// Export a note's encrypted file
    Export {
        /// Name of the note
        name: String,

        /// Destination (defaults to ./<NAME>.encryptednote)
        dest: Option<PathBuf>,
    },
}
