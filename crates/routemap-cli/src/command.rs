//! Command framework for the `routemap` tool.
//!
//! This module provides the [`RouteCommand`] trait for defining subcommands
//! and [`CommandRegistry`] for registering and dispatching them.
//!
//! ## Defining a Custom Command
//!
//! ```rust
//! use std::io::Write;
//!
//! use routemap_cli::command::{CommandRegistry, RouteCommand};
//! use routemap_cli::error::CommandResult;
//! use routemap_core::Settings;
//!
//! struct BaseCommand;
//!
//! impl RouteCommand for BaseCommand {
//!     fn name(&self) -> &'static str { "base" }
//!     fn help(&self) -> &'static str { "Print the configured base URL" }
//!
//!     fn handle(
//!         &self,
//!         _matches: &clap::ArgMatches,
//!         settings: &Settings,
//!         out: &mut dyn Write,
//!     ) -> CommandResult<()> {
//!         writeln!(out, "{}", settings.base_url)?;
//!         Ok(())
//!     }
//! }
//!
//! let mut registry = CommandRegistry::new();
//! registry.register(Box::new(BaseCommand));
//! let matches = registry.build_cli().try_get_matches_from(["routemap", "base"]).unwrap();
//!
//! let mut settings = Settings::default();
//! settings.base_url = "/indico".into();
//! let mut out = Vec::new();
//! registry.execute(&matches, &settings, &mut out).unwrap();
//! assert_eq!(out, b"/indico\n");
//! ```

use std::collections::HashMap;
use std::io::Write;
use std::path::PathBuf;

use routemap_core::{RouteMapError, Settings};

use crate::error::{CommandError, CommandResult};

/// A subcommand that can be registered and invoked through the CLI.
///
/// Commands write their regular output to `out` so they can be run against
/// a buffer in tests; diagnostics go through `tracing`.
pub trait RouteCommand: Send + Sync {
    /// Returns the name used to invoke this command.
    fn name(&self) -> &'static str;

    /// Returns a short help description.
    fn help(&self) -> &'static str;

    /// Adds command-specific arguments. The default adds none.
    fn add_arguments(&self, cmd: clap::Command) -> clap::Command {
        cmd
    }

    /// Runs the command.
    fn handle(
        &self,
        matches: &clap::ArgMatches,
        settings: &Settings,
        out: &mut dyn Write,
    ) -> CommandResult<()>;
}

/// The registered subcommands of the `routemap` tool.
pub struct CommandRegistry {
    commands: HashMap<String, Box<dyn RouteCommand>>,
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            commands: HashMap::new(),
        }
    }

    /// Registers a command, replacing any command with the same name.
    pub fn register(&mut self, command: Box<dyn RouteCommand>) {
        self.commands.insert(command.name().to_string(), command);
    }

    /// Returns the command with the given name, if registered.
    pub fn get(&self, name: &str) -> Option<&dyn RouteCommand> {
        self.commands.get(name).map(AsRef::as_ref)
    }

    /// Returns the registered command names, sorted.
    pub fn list_commands(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.commands.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Returns the number of registered commands.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Returns `true` if no commands are registered.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Builds the top-level clap `Command` with every registered subcommand
    /// and the global `--settings` option.
    pub fn build_cli(&self) -> clap::Command {
        let mut app = clap::Command::new("routemap")
            .about("Build URLs from an exported Werkzeug route table")
            .subcommand_required(true)
            .arg(
                clap::Arg::new("settings")
                    .long("settings")
                    .global(true)
                    .value_name("FILE")
                    .value_parser(clap::value_parser!(PathBuf))
                    .help("Settings file (.toml or .json); defaults to the environment"),
            );

        let mut entries: Vec<&dyn RouteCommand> = self.commands.values().map(AsRef::as_ref).collect();
        entries.sort_by_key(|cmd| cmd.name());

        for cmd in entries {
            let subcmd = clap::Command::new(cmd.name()).about(cmd.help());
            app = app.subcommand(cmd.add_arguments(subcmd));
        }

        app
    }

    /// Dispatches to the subcommand selected in `matches`.
    pub fn execute(
        &self,
        matches: &clap::ArgMatches,
        settings: &Settings,
        out: &mut dyn Write,
    ) -> CommandResult<()> {
        let (name, sub_matches) = matches.subcommand().ok_or_else(|| {
            CommandError::Config(RouteMapError::ConfigurationError(
                "No subcommand specified".to_string(),
            ))
        })?;

        let cmd = self.get(name).ok_or_else(|| {
            CommandError::Config(RouteMapError::ConfigurationError(format!(
                "Unknown command: {name}"
            )))
        })?;

        tracing::debug!(command = name, "running command");
        cmd.handle(sub_matches, settings, out)
    }
}
