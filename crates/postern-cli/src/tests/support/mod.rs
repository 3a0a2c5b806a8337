//! Test support utilities for postern CLI behavioural coverage.
//!
//! Supplies a fake mail server, a fixed configuration loader and an
//! in-memory token store so step definitions and unit tests can drive the
//! full command flow without touching the real configuration or filesystem.

mod fake_server;

use std::cell::RefCell;
use std::ffi::OsString;
use std::process::ExitCode;

use anyhow::{Context, Result, ensure};
use postern_config::Config;
use postern_proto::AuthToken;
use rstest::fixture;

use crate::token_store::TokenStore;
use crate::{AppError, ConfigLoader, IoStreams, run_with_token_store};

pub(super) use fake_server::FakeServer;

/// A config loader that returns a fixed configuration for tests.
pub(super) struct StaticConfigLoader {
    config: Config,
}

impl StaticConfigLoader {
    pub(super) fn new(config: Config) -> Self {
        Self { config }
    }
}

impl ConfigLoader for StaticConfigLoader {
    fn load(&self, _args: &[OsString]) -> Result<Config, AppError> {
        Ok(self.config.clone())
    }
}

/// Token store kept in memory for the lifetime of a test.
#[derive(Debug, Default)]
pub(super) struct MemoryTokenStore {
    token: RefCell<Option<AuthToken>>,
}

impl MemoryTokenStore {
    pub(super) fn replace(&self, token: Option<AuthToken>) {
        *self.token.borrow_mut() = token;
    }

    pub(super) fn current(&self) -> Option<AuthToken> {
        self.token.borrow().clone()
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<AuthToken>, AppError> {
        Ok(self.current())
    }

    fn save(&self, token: &AuthToken) -> Result<(), AppError> {
        self.replace(Some(token.clone()));
        Ok(())
    }

    fn delete(&self) -> Result<(), AppError> {
        self.replace(None);
        Ok(())
    }
}

/// Test world holding configuration, server, token and captured output.
#[derive(Default)]
pub(super) struct TestWorld {
    pub config: Config,
    pub server: Option<FakeServer>,
    pub tokens: MemoryTokenStore,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
    pub exit_code: Option<ExitCode>,
    pub requests: Vec<String>,
}

impl TestWorld {
    pub fn start_server(&mut self, response: &str) -> Result<()> {
        let server = FakeServer::spawn(response)?;
        self.config = self
            .config
            .clone()
            .with_overrides(Some(String::from("127.0.0.1")), Some(server.port()));
        self.server = Some(server);
        Ok(())
    }

    pub fn store_token(&self, token: &str) {
        self.tokens.replace(Some(AuthToken::new(token)));
    }

    /// Runs the CLI with `command` split as a shell would, honouring single
    /// quotes for arguments containing spaces.
    pub fn run(&mut self, command: &str) -> Result<()> {
        self.run_args(split_command_line(command))
    }

    pub fn run_args(&mut self, arguments: Vec<String>) -> Result<()> {
        self.stdout.clear();
        self.stderr.clear();
        self.requests.clear();
        let mut args = vec![OsString::from("postern")];
        args.extend(arguments.into_iter().map(OsString::from));
        let loader = StaticConfigLoader::new(self.config.clone());
        let mut io = IoStreams::new(&mut self.stdout, &mut self.stderr);
        let exit = run_with_token_store(args, &mut io, &loader, &self.tokens);
        self.exit_code = Some(exit);
        if let Some(mut server) = self.server.take() {
            self.requests = server.take_requests()?;
        }
        Ok(())
    }

    pub fn stdout_text(&self) -> Result<String> {
        decode_utf8(self.stdout.clone(), "stdout")
    }

    pub fn stderr_text(&self) -> Result<String> {
        decode_utf8(self.stderr.clone(), "stderr")
    }

    pub fn assert_success(&self) -> Result<()> {
        let exit = self.exit_code.context("exit code recorded")?;
        ensure!(
            exit == ExitCode::SUCCESS,
            "expected success exit code, got {exit:?}; stderr: {:?}",
            self.stderr_text()?
        );
        Ok(())
    }

    pub fn assert_failure(&self) -> Result<()> {
        let exit = self.exit_code.context("exit code recorded")?;
        ensure!(
            exit == ExitCode::FAILURE,
            "expected failure exit code, got {exit:?}"
        );
        Ok(())
    }

    pub fn assert_single_request(&self, expected: &str) -> Result<()> {
        ensure!(
            self.requests.len() == 1,
            "expected single request but found {:?}",
            self.requests
        );
        let actual = self.requests.first().context("request missing")?;
        ensure!(
            actual == expected,
            "request mismatch: expected {expected:?}, got {actual:?}"
        );
        Ok(())
    }

    pub fn assert_no_requests(&self) -> Result<()> {
        ensure!(
            self.requests.is_empty(),
            "expected no server requests but found {:?}",
            self.requests
        );
        Ok(())
    }
}

pub(super) fn decode_utf8(buffer: Vec<u8>, label: &str) -> Result<String> {
    String::from_utf8(buffer).with_context(|| format!("{label} utf8"))
}

/// Removes one pair of surrounding double quotes from a step argument.
pub(super) fn unquote(value: &str) -> &str {
    let trimmed = value.trim();
    trimmed
        .strip_prefix('"')
        .and_then(|inner| inner.strip_suffix('"'))
        .unwrap_or(trimmed)
}

fn split_command_line(command: &str) -> Vec<String> {
    let mut arguments = Vec::new();
    let mut current = String::new();
    let mut quoted = false;
    let mut pending = false;
    for character in command.trim().chars() {
        match character {
            '\'' => {
                quoted = !quoted;
                pending = true;
            }
            ' ' if !quoted => {
                if pending {
                    arguments.push(std::mem::take(&mut current));
                    pending = false;
                }
            }
            other => {
                current.push(other);
                pending = true;
            }
        }
    }
    if pending {
        arguments.push(current);
    }
    arguments
}

#[fixture]
pub(super) fn world() -> RefCell<TestWorld> {
    RefCell::new(TestWorld::default())
}
