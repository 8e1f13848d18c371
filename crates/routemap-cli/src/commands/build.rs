//! The `build` command.
//!
//! Builds the URL of one endpoint of the route table and prints it:
//!
//! ```text
//! routemap build Timetable.entries.delete -p confId=3 -p entry_id=44 --fragment top
//! ```
//!
//! `-p` values are parsed as JSON when they parse (`-p id=42` is a number,
//! `-p tags='["a","b"]'` a list) and taken as strings otherwise. Repeating
//! a key collects its values into a list.

use std::io::Write;

use routemap_core::Settings;
use routemap_urls::{CallArguments, ParamValue, Params, RouteMap, RouteResolver};
use tracing::warn;

use crate::command::RouteCommand;
use crate::commands::{route_table_path, routes_arg};
use crate::error::{CommandError, CommandResult};

/// Builds the URL of an endpoint.
pub struct BuildCommand;

/// Parses a `key=value` argument.
///
/// # Examples
///
/// ```
/// use routemap_cli::commands::build::parse_assignment;
/// use routemap_urls::ParamValue;
///
/// assert_eq!(parse_assignment("id=42").unwrap(), ("id".to_string(), ParamValue::Int(42)));
/// assert_eq!(
///     parse_assignment("q=a b").unwrap(),
///     ("q".to_string(), ParamValue::Str("a b".into()))
/// );
/// assert!(parse_assignment("novalue").is_err());
/// ```
pub fn parse_assignment(raw: &str) -> CommandResult<(String, ParamValue)> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| CommandError::InvalidArgument(format!("expected key=value, got '{raw}'")))?;
    if key.is_empty() {
        return Err(CommandError::InvalidArgument(format!("empty key in '{raw}'")));
    }
    let value = serde_json::from_str::<serde_json::Value>(value)
        .map_or_else(|_| ParamValue::Str(value.to_string()), ParamValue::from);
    Ok((key.to_string(), value))
}

/// Collects repeated `key=value` arguments, turning repeated keys into lists.
pub fn parse_assignments<'a>(raw: impl IntoIterator<Item = &'a String>) -> CommandResult<Params> {
    let mut params = Params::new();
    for item in raw {
        let (key, value) = parse_assignment(item)?;
        params.append(key, value);
    }
    Ok(params)
}

impl RouteCommand for BuildCommand {
    fn name(&self) -> &'static str {
        "build"
    }

    fn help(&self) -> &'static str {
        "Build the URL of an endpoint"
    }

    fn add_arguments(&self, cmd: clap::Command) -> clap::Command {
        cmd.arg(
            clap::Arg::new("endpoint")
                .required(true)
                .help("Dotted endpoint key, e.g. Timetable.entries.delete"),
        )
        .arg(
            clap::Arg::new("param")
                .long("param")
                .short('p')
                .value_name("KEY=VALUE")
                .action(clap::ArgAction::Append)
                .help("Argument matched against the endpoint's rules"),
        )
        .arg(
            clap::Arg::new("query")
                .long("query")
                .short('q')
                .value_name("KEY=VALUE")
                .action(clap::ArgAction::Append)
                .help("Extra query-string parameter, never matched against rules"),
        )
        .arg(
            clap::Arg::new("fragment")
                .long("fragment")
                .value_name("FRAGMENT")
                .help("Fragment appended after '#'"),
        )
        .arg(
            clap::Arg::new("base-url")
                .long("base-url")
                .value_name("URL")
                .help("Overrides the base_url setting"),
        )
        .arg(routes_arg())
    }

    fn handle(
        &self,
        matches: &clap::ArgMatches,
        settings: &Settings,
        out: &mut dyn Write,
    ) -> CommandResult<()> {
        let endpoint = matches
            .get_one::<String>("endpoint")
            .ok_or_else(|| CommandError::InvalidArgument("missing endpoint".to_string()))?;

        let path = route_table_path(matches, settings)?;
        let (routes, problems) = RouteMap::from_json_file_lenient(&path)?;
        for problem in &problems {
            warn!(key = %problem.key, "skipping invalid route: {}", problem.error);
        }

        let mut resolver = RouteResolver::from_settings(settings)?;
        if let Some(base_url) = matches.get_one::<String>("base-url") {
            resolver = resolver.with_base_url(base_url.clone());
        }

        let params = parse_assignments(matches.get_many::<String>("param").into_iter().flatten())?;
        let query = parse_assignments(matches.get_many::<String>("query").into_iter().flatten())?;
        let call = CallArguments {
            params,
            fragment: matches.get_one::<String>("fragment").cloned(),
            query,
        };

        let url = resolver.build_url_for(&routes, endpoint, &call)?;
        writeln!(out, "{url}")?;
        Ok(())
    }
}
