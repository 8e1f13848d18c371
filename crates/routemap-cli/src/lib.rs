//! # routemap-cli
//!
//! The `routemap` command-line tool: build URLs from an exported route
//! table, validate the table, and list its endpoints.
//!
//! ## Quick Start
//!
//! ```rust
//! use routemap_cli::command::CommandRegistry;
//! use routemap_cli::commands::register_builtin_commands;
//!
//! let mut registry = CommandRegistry::new();
//! register_builtin_commands(&mut registry);
//!
//! assert_eq!(registry.list_commands(), vec!["build", "check", "endpoints"]);
//! ```

// - doc_markdown: backtick requirements for documentation items are too strict
// - missing_const_for_fn: some functions may gain runtime logic later
#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_const_for_fn)]

pub mod command;
pub mod commands;
pub mod error;

use std::io::Write;
use std::path::PathBuf;

use routemap_core::logging::setup_logging;
use routemap_core::{settings_loader, Settings};

pub use command::{CommandRegistry, RouteCommand};
pub use error::{CommandError, CommandResult, RunError};

/// Loads settings from the `--settings` file when given, else from the
/// environment.
pub fn load_settings(matches: &clap::ArgMatches) -> CommandResult<Settings> {
    match matches.get_one::<PathBuf>("settings") {
        Some(path) => Ok(settings_loader::from_file_with_env(path)?),
        None => Ok(settings_loader::from_env()),
    }
}

/// Parses `args`, loads settings, sets up logging, and runs the selected
/// command with its output written to `out`.
///
/// Argument errors (including `--help`) are returned as clap errors so the
/// caller can print them the way clap does.
pub fn run<I, T>(args: I, out: &mut dyn Write) -> Result<(), RunError>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let mut registry = CommandRegistry::new();
    commands::register_builtin_commands(&mut registry);

    let matches = registry.build_cli().try_get_matches_from(args)?;
    let settings = load_settings(&matches)?;
    setup_logging(&settings);

    registry.execute(&matches, &settings, out)?;
    Ok(())
}
