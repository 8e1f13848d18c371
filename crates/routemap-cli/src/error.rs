//! Errors raised by CLI commands.

use routemap_core::RouteMapError;
use routemap_urls::RouteBuildError;
use thiserror::Error;

/// A failure while running a command.
#[derive(Error, Debug)]
pub enum CommandError {
    /// Settings or the route table could not be loaded.
    #[error(transparent)]
    Config(#[from] RouteMapError),

    /// The URL could not be built.
    #[error("{}: {}", .0.kind, .0)]
    Build(#[from] RouteBuildError),

    /// A command-line argument was malformed.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// `check` found invalid routes.
    #[error("{0} invalid route(s) found")]
    CheckFailed(usize),

    /// Writing the command output failed.
    #[error("Output error: {0}")]
    Io(#[from] std::io::Error),
}

/// A convenience type alias for command results.
pub type CommandResult<T> = Result<T, CommandError>;

/// The ways [`run`](crate::run) can fail.
#[derive(Error, Debug)]
pub enum RunError {
    /// The command line did not parse, or help/version was requested.
    #[error(transparent)]
    Usage(#[from] clap::Error),

    /// The command itself failed.
    #[error(transparent)]
    Command(#[from] CommandError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_error_display_includes_kind() {
        let err = CommandError::from(RouteBuildError::no_suitable_rule("items.show"));
        let text = err.to_string();
        assert!(text.starts_with("no suitable rule: "), "{text}");
        assert!(text.contains("items.show"));
    }

    #[test]
    fn test_config_error_is_transparent() {
        let err = CommandError::from(RouteMapError::NotFound("urls.json".into()));
        assert_eq!(err.to_string(), RouteMapError::NotFound("urls.json".into()).to_string());
    }

    #[test]
    fn test_check_failed_display() {
        assert_eq!(CommandError::CheckFailed(2).to_string(), "2 invalid route(s) found");
    }
}
