/*!
# Sealnote - Password-Protected Notes

Command-line front end for the sealnote note store. Each subcommand maps to one
registry operation; passwords are prompted for and never accepted as arguments.

## Usage

```text
sealnote [OPTIONS] <COMMAND>

Commands:
  list     List note names
  new      Create an empty note protected by a new password
  show     Decrypt a note and print it
  save     Replace a note's body with standard input
  edit     Edit a note in $SEALNOTE_EDITOR / $EDITOR
  delete   Delete a note
  rename   Rename a note
  passwd   Change a note's password
  import   Import an exported .encryptednote file
  export   Export a note's encrypted file
```

## Configuration

- `SEALNOTE_DIR`: The notes directory (defaults to "~/.sealnote/notes")
- `SEALNOTE_EDITOR` or `EDITOR`: The editor used by `edit` (defaults to "vim")
- `RUST_LOG`: Log filter; logs go to stderr
*/

use clap::Parser;
use sealnote::cli::{CliArgs, Command};
use sealnote::config::Config;
use sealnote::constants::{
    DEFAULT_LOG_LEVEL, ENV_VAR_CI, LOG_FORMAT_JSON, NOTE_FILE_EXTENSION, TRACING_SERVICE_NAME,
    VERBOSE_LOG_LEVEL,
};
use sealnote::crypto::get_secure_temp_dir;
use sealnote::editor::SystemEditor;
use sealnote::errors::{AppResult, NoteError};
use sealnote::ops::{edit_note, EditOutcome};
use sealnote::prompt;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let args = CliArgs::parse();
    init_tracing(&args);

    let span = tracing::info_span!(
        "app_invocation",
        service_name = TRACING_SERVICE_NAME,
        correlation_id = %uuid::Uuid::new_v4()
    );
    let _guard = span.enter();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Installs the tracing subscriber on stderr.
///
/// `RUST_LOG` wins over `--verbose`. JSON output is used with
/// `--log-format json` or when running under CI.
fn init_tracing(args: &CliArgs) {
    let default_level = if args.verbose {
        VERBOSE_LOG_LEVEL
    } else {
        DEFAULT_LOG_LEVEL
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let json = args.log_format == LOG_FORMAT_JSON || std::env::var_os(ENV_VAR_CI).is_some();
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn run(args: CliArgs) -> AppResult<()> {
    debug!("CLI arguments: {:?}", args.command);

    let config = Config::load()?;
    config.validate()?;

    let mut registry = config.open_registry()?;

    match args.command {
        Command::List => {
            let mut stdout = io::stdout().lock();
            for name in registry.names() {
                writeln!(stdout, "{}", name)?;
            }
        }
        Command::New { name } => {
            let password = prompt::new_password(&format!("Password for '{}': ", name), false)?;
            registry.create(&name, &password)?;
            println!("Created '{}'", name);
        }
        Command::Show { name } => {
            let password = prompt::existing_password(&format!("Password for '{}': ", name))?;
            let content = registry.decrypt(&name, &password)?;
            print!("{}", content);
            io::stdout().flush()?;
        }
        Command::Save { name } => {
            if !registry.contains(&name) {
                return Err(NoteError::NotFound { name }.into());
            }
            let password = prompt::existing_password(&format!("Password for '{}': ", name))?;
            // Check the password before overwriting with whatever it is.
            registry.decrypt(&name, &password)?;

            let mut content = String::new();
            io::stdin().read_to_string(&mut content)?;
            registry.save(&name, &content, &password)?;
            println!("Saved '{}'", name);
        }
        Command::Edit { name } => {
            let password = prompt::existing_password(&format!("Password for '{}': ", name))?;
            let editor = SystemEditor {
                editor_cmd: config.editor.clone(),
            };
            let outcome = edit_note(
                &mut registry,
                &name,
                &password,
                &editor,
                &get_secure_temp_dir(),
            )?;
            match outcome {
                EditOutcome::Saved => println!("Saved '{}'", name),
                EditOutcome::Unchanged => println!("'{}' unchanged", name),
            }
        }
        Command::Delete { name, yes } => {
            if !registry.contains(&name) {
                return Err(NoteError::NotFound { name }.into());
            }
            let confirmed = yes
                || prompt::confirm(&format!(
                    "Delete '{}'? This cannot be undone.",
                    name
                ))?;
            if !confirmed {
                info!("Delete cancelled");
                return Ok(());
            }
            registry.delete(&name)?;
            println!("Deleted '{}'", name);
        }
        Command::Rename {
            old,
            new,
            change_password,
        } => {
            if change_password {
                let current = prompt::existing_password(&format!("Password for '{}': ", old))?;
                let replacement =
                    prompt::new_password(&format!("New password for '{}': ", new), true)?;
                registry.rename_with_password(&old, &new, &current, &replacement)?;
            } else {
                registry.rename(&old, &new)?;
            }
            println!("Renamed '{}' to '{}'", old, new);
        }
        Command::Passwd { name } => {
            if !registry.contains(&name) {
                return Err(NoteError::NotFound { name }.into());
            }
            let current = prompt::existing_password(&format!("Current password for '{}': ", name))?;
            let replacement =
                prompt::new_password(&format!("New password for '{}': ", name), true)?;
            registry.change_password(&name, &current, &replacement)?;
            println!("Password changed for '{}'", name);
        }
        Command::Import { file } => {
            let password = prompt::existing_password("Password for the imported note: ")?;
            let name = registry.import(&file, &password)?;
            println!("{}", name);
        }
        Command::Export { name, dest } => {
            let dest =
                dest.unwrap_or_else(|| PathBuf::from(format!("{}{}", name, NOTE_FILE_EXTENSION)));
            registry.export(&name, &dest)?;
            println!("Exported '{}' to {}", name, dest.display());
        }
    }

    Ok(())
}
