//! The `check` command.
//!
//! Loads the whole route table and reports every entry that is not a valid
//! route template, one line per problem.

use std::io::Write;

use routemap_core::Settings;
use routemap_urls::RouteMap;

use crate::command::RouteCommand;
use crate::commands::{route_table_path, routes_arg};
use crate::error::{CommandError, CommandResult};

/// Validates every route template in the route table.
pub struct CheckCommand;

impl RouteCommand for CheckCommand {
    fn name(&self) -> &'static str {
        "check"
    }

    fn help(&self) -> &'static str {
        "Validate every route in the route table"
    }

    fn add_arguments(&self, cmd: clap::Command) -> clap::Command {
        cmd.arg(routes_arg())
    }

    fn handle(
        &self,
        matches: &clap::ArgMatches,
        settings: &Settings,
        out: &mut dyn Write,
    ) -> CommandResult<()> {
        let path = route_table_path(matches, settings)?;
        let (routes, problems) = RouteMap::from_json_file_lenient(&path)?;

        if problems.is_empty() {
            tracing::info!(routes = routes.len(), "route check identified no issues");
            writeln!(out, "{} routes OK", routes.len())?;
            return Ok(());
        }

        for problem in &problems {
            writeln!(out, "{}: {}: {}", problem.key, problem.error.kind, problem.error)?;
        }
        Err(CommandError::CheckFailed(problems.len()))
    }
}
