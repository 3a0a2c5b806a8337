//! Entry point for the `postern` mail client.
//!
//! Delegates to [`postern_cli::run`], which parses arguments, loads
//! configuration, performs one exchange with the server and prints the
//! decoded response.

use std::io::{self, StderrLock, StdoutLock};
use std::process::ExitCode;

fn main() -> ExitCode {
    let mut stdout: StdoutLock<'_> = io::stdout().lock();
    let mut stderr: StderrLock<'_> = io::stderr().lock();
    postern_cli::run(std::env::args_os(), &mut stdout, &mut stderr)
}
