//! Error types for the CLI runtime.

use std::io;
use std::sync::Arc;

use camino::Utf8PathBuf;
use thiserror::Error;

use postern_config::EndpointError;
use postern_proto::{EncodeError, ProtocolError};

use crate::telemetry::TelemetryError;

#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error("failed to load configuration: {0}")]
    LoadConfiguration(Arc<ortho_config::OrthoError>),
    #[error("{0}")]
    CliUsage(clap::Error),
    #[error("failed to initialise logging: {0}")]
    Telemetry(#[from] TelemetryError),
    #[error("failed to resolve server address: {0}")]
    Resolve(#[from] EndpointError),
    #[error("failed to connect to server at {endpoint}: {source}")]
    Connect { endpoint: String, source: io::Error },
    #[error("failed to send request to server: {0}")]
    SendRequest(io::Error),
    #[error("failed to read response from server: {0}")]
    ReadResponse(io::Error),
    #[error("connection to the server is already closed")]
    SessionClosed,
    #[error(transparent)]
    Encode(#[from] EncodeError),
    #[error("malformed server response: {0}")]
    Protocol(#[from] ProtocolError),
    #[error("failed to read token file {path}: {source}")]
    ReadToken { path: Utf8PathBuf, source: io::Error },
    #[error("failed to write token file {path}: {source}")]
    WriteToken { path: Utf8PathBuf, source: io::Error },
    #[error("failed to remove token file {path}: {source}")]
    RemoveToken { path: Utf8PathBuf, source: io::Error },
    #[error("failed to serialise response: {0}")]
    SerialiseResponse(serde_json::Error),
    #[error("failed to write output: {0}")]
    WriteOutput(io::Error),
}
