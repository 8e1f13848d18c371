//! Built-in commands.
//!
//! Each command implements the [`RouteCommand`](crate::command::RouteCommand)
//! trait and reads the route table given by `--routes`, falling back to the
//! `route_table` setting.

pub mod build;
pub mod check;
pub mod endpoints;

use std::path::PathBuf;

pub use build::BuildCommand;
pub use check::CheckCommand;
pub use endpoints::EndpointsCommand;

use routemap_core::{RouteMapError, Settings};

use crate::command::CommandRegistry;
use crate::error::CommandResult;

/// Registers all built-in commands into the given registry.
pub fn register_builtin_commands(registry: &mut CommandRegistry) {
    registry.register(Box::new(BuildCommand));
    registry.register(Box::new(CheckCommand));
    registry.register(Box::new(EndpointsCommand));
}

/// The `--routes` option shared by every command.
pub(crate) fn routes_arg() -> clap::Arg {
    clap::Arg::new("routes")
        .long("routes")
        .short('r')
        .value_name("FILE")
        .value_parser(clap::value_parser!(PathBuf))
        .help("Route table JSON file; defaults to the route_table setting")
}

/// Resolves the route table path from `--routes` or the settings.
pub(crate) fn route_table_path(matches: &clap::ArgMatches, settings: &Settings) -> CommandResult<PathBuf> {
    matches
        .get_one::<PathBuf>("routes")
        .or(settings.route_table.as_ref())
        .cloned()
        .ok_or_else(|| {
            RouteMapError::ConfigurationError(
                "No route table given; pass --routes or set route_table".to_string(),
            )
            .into()
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_builtin_commands() {
        let mut registry = CommandRegistry::new();
        register_builtin_commands(&mut registry);
        assert_eq!(registry.list_commands(), vec!["build", "check", "endpoints"]);
    }

    #[test]
    fn test_route_table_path_prefers_flag() {
        let cmd = clap::Command::new("t").arg(routes_arg());
        let matches = cmd.try_get_matches_from(["t", "--routes", "a.json"]).unwrap();
        let mut settings = Settings::default();
        settings.route_table = Some(PathBuf::from("b.json"));
        assert_eq!(
            route_table_path(&matches, &settings).unwrap(),
            PathBuf::from("a.json")
        );
    }

    #[test]
    fn test_route_table_path_from_settings() {
        let cmd = clap::Command::new("t").arg(routes_arg());
        let matches = cmd.try_get_matches_from(["t"]).unwrap();
        let mut settings = Settings::default();
        settings.route_table = Some(PathBuf::from("b.json"));
        assert_eq!(
            route_table_path(&matches, &settings).unwrap(),
            PathBuf::from("b.json")
        );
    }

    #[test]
    fn test_route_table_path_missing() {
        let cmd = clap::Command::new("t").arg(routes_arg());
        let matches = cmd.try_get_matches_from(["t"]).unwrap();
        assert!(route_table_path(&matches, &Settings::default()).is_err());
    }
}
