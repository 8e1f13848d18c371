//! The `endpoints` command: lists the keys of the route table.

use std::io::Write;

use routemap_core::Settings;
use routemap_urls::RouteMap;

use crate::command::RouteCommand;
use crate::commands::{route_table_path, routes_arg};
use crate::error::CommandResult;

/// Lists endpoint keys in document order.
pub struct EndpointsCommand;

impl RouteCommand for EndpointsCommand {
    fn name(&self) -> &'static str {
        "endpoints"
    }

    fn help(&self) -> &'static str {
        "List the endpoints of the route table"
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
        if !problems.is_empty() {
            tracing::warn!(count = problems.len(), "invalid routes omitted; run `routemap check`");
        }
        for endpoint in routes.endpoints() {
            writeln!(out, "{endpoint}")?;
        }
        Ok(())
    }
}
