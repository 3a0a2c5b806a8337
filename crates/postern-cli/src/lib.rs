//! Command-line runtime for the postern mail client.
//!
//! Each invocation sends one command to the server and prints the decoded
//! response. The runtime owns argument parsing, configuration bootstrapping,
//! token persistence and the socket exchange. Configuration loading, the
//! token store and the IO streams can all be substituted so the whole flow is
//! exercised in tests against a fake server.

use std::ffi::OsString;
use std::io::Write;
use std::process::ExitCode;

use clap::Parser;
use clap::error::ErrorKind;
use tracing::{debug, warn};

use postern_config::Config;
use postern_proto::{Command, Decoded, TokenAction, decode, encode_command};

mod cli;
mod command;
mod config;
mod errors;
pub mod output;
mod telemetry;
mod token_store;
mod transport;

use cli::Cli;
use config::{prepare_cli_arguments, split_config_arguments};
pub(crate) use config::{ConfigLoader, OrthoConfigLoader};
pub(crate) use errors::AppError;
pub use output::{OutputFormat, render_human_output};
use token_store::{FileTokenStore, TokenStore};

/// Bundles the IO streams provided to the CLI runtime.
pub(crate) struct IoStreams<'a, W: Write, E: Write> {
    pub(crate) stdout: &'a mut W,
    pub(crate) stderr: &'a mut E,
}

impl<'a, W: Write, E: Write> IoStreams<'a, W, E> {
    pub(crate) const fn new(stdout: &'a mut W, stderr: &'a mut E) -> Self {
        Self { stdout, stderr }
    }
}

struct CliRunner<'a, W: Write, E: Write, L: ConfigLoader> {
    io: &'a mut IoStreams<'a, W, E>,
    loader: &'a L,
    token_store: Option<&'a dyn TokenStore>,
}

impl<'a, W, E, L> CliRunner<'a, W, E, L>
where
    W: Write,
    E: Write,
    L: ConfigLoader,
{
    fn new(io: &'a mut IoStreams<'a, W, E>, loader: &'a L) -> Self {
        Self {
            io,
            loader,
            token_store: None,
        }
    }

    #[cfg(test)]
    fn with_token_store(mut self, store: &'a dyn TokenStore) -> Self {
        self.token_store = Some(store);
        self
    }

    fn run<I>(&mut self, args: I) -> ExitCode
    where
        I: IntoIterator<Item = OsString>,
    {
        let args: Vec<OsString> = args.into_iter().collect();
        let split = split_config_arguments(&args);
        let cli_arguments = prepare_cli_arguments(&args, &split);

        let result = Cli::try_parse_from(cli_arguments)
            .map_err(AppError::CliUsage)
            .and_then(|cli| {
                self.loader.load(&split.config_arguments).map(|config| {
                    let overridden = config.with_overrides(cli.address.clone(), cli.port);
                    (cli, overridden)
                })
            })
            .and_then(|(cli, config)| {
                telemetry::initialise(&config)?;
                self.execute(cli, &config)
            });

        match result {
            Ok(rendered) => self.emit(&rendered),
            Err(AppError::CliUsage(error)) if is_informational(&error) => {
                self.emit(&error.render().to_string())
            }
            Err(error) => {
                let _ = writeln!(self.io.stderr, "{error}");
                ExitCode::FAILURE
            }
        }
    }

    /// Performs one request/response exchange and renders the outcome.
    ///
    /// Nothing is written to the IO streams here, so a failure at any step
    /// leaves stdout untouched.
    fn execute(&self, cli: Cli, config: &Config) -> Result<String, AppError> {
        let format = cli.output;
        let command = Command::from(cli.command);
        let kind = command.kind();

        let file_store = FileTokenStore::new(config.token_path());
        let store: &dyn TokenStore = self.token_store.unwrap_or(&file_store);

        let token = if kind.requires_token() {
            store.load()?
        } else {
            None
        };
        let envelope = encode_command(&command, token.as_ref())?;
        let endpoint = config.endpoint()?;
        debug!(command = %kind, %endpoint, "dispatching request");

        let mut session = transport::connect(&endpoint)?;
        session.send(&envelope)?;
        let response = session.receive(config.framing())?;
        session.close();

        if !response.trim_end().ends_with(')') {
            warn!(command = %kind, "response envelope is not closed");
        }
        let Decoded {
            result,
            token_action,
        } = decode(kind, &response)?;
        apply_token_action(store, token_action)?;
        output::render(format, &result)
    }

    fn emit(&mut self, text: &str) -> ExitCode {
        let written = self
            .io
            .stdout
            .write_all(text.as_bytes())
            .and_then(|()| self.io.stdout.flush());
        match written {
            Ok(()) => ExitCode::SUCCESS,
            Err(error) => {
                let _ = writeln!(self.io.stderr, "{}", AppError::WriteOutput(error));
                ExitCode::FAILURE
            }
        }
    }
}

fn is_informational(error: &clap::Error) -> bool {
    matches!(
        error.kind(),
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion
    )
}

fn apply_token_action(store: &dyn TokenStore, action: TokenAction) -> Result<(), AppError> {
    match action {
        TokenAction::Keep => Ok(()),
        TokenAction::Persist(token) => store.save(&token),
        TokenAction::Discard => store.delete(),
    }
}

/// Runs the CLI using the provided arguments and IO handles.
#[must_use]
pub fn run<I, W, E>(args: I, stdout: &mut W, stderr: &mut E) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    W: Write,
    E: Write,
{
    let mut io = IoStreams::new(stdout, stderr);
    run_with_loader(args, &mut io, &OrthoConfigLoader)
}

/// Runs the CLI with a custom configuration loader.
#[must_use]
pub(crate) fn run_with_loader<'a, I, W, E, L>(
    args: I,
    io: &'a mut IoStreams<'a, W, E>,
    loader: &'a L,
) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    W: Write,
    E: Write,
    L: ConfigLoader,
{
    CliRunner::new(io, loader).run(args)
}

/// Runs the CLI with a custom configuration loader and token store.
#[cfg(test)]
pub(crate) fn run_with_token_store<'a, I, W, E, L>(
    args: I,
    io: &'a mut IoStreams<'a, W, E>,
    loader: &'a L,
    store: &'a dyn TokenStore,
) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    W: Write,
    E: Write,
    L: ConfigLoader,
{
    CliRunner::new(io, loader)
        .with_token_store(store)
        .run(args)
}
