//! The `routemap` binary.

use std::process::ExitCode;

use routemap_cli::{run, CommandError, RunError};

fn main() -> ExitCode {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match run(std::env::args_os(), &mut out) {
        Ok(()) => ExitCode::SUCCESS,
        Err(RunError::Usage(err)) => {
            // clap prints help and version to stdout with a zero exit code.
            let _ = err.print();
            if err.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(RunError::Command(err)) => {
            let context = match &err {
                CommandError::CheckFailed(_) => "route check failed",
                _ => "routemap failed",
            };
            let report = anyhow::Error::new(err).context(context);
            eprintln!("error: {report:#}");
            ExitCode::FAILURE
        }
    }
}
