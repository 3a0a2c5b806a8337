//! Error types raised while encoding requests and decoding responses.

use thiserror::Error;

use crate::command::CommandKind;

/// Failures while turning a command into a request envelope.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EncodeError {
    /// An authenticated command was attempted without a stored token.
    #[error("{command} requires a login token; run `login` first")]
    MissingToken {
        /// Command that needed the token.
        command: CommandKind,
    },
    /// The supplied arguments do not match the command's fixed argument list.
    #[error("{command} expects arguments [{expected}] but received [{found}]")]
    ArgumentMismatch {
        /// Command whose contract was violated.
        command: CommandKind,
        /// Comma separated names of the required arguments.
        expected: String,
        /// Comma separated names of the supplied arguments.
        found: String,
    },
}

/// Failures while decoding a server response.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// The server closed the connection without sending anything.
    #[error("server closed the connection without a response")]
    EmptyResponse,
    /// The response ended, or split a character, inside its status header.
    #[error("response does not carry a complete status header: {response:?}")]
    TruncatedHeader {
        /// The raw response text.
        response: String,
    },
    /// A fixed-format payload had the wrong number of quoted fields.
    #[error("{command} response has {found} fields, expected {expected}")]
    FieldCount {
        /// Command whose response was being decoded.
        command: CommandKind,
        /// Number of fields the response shape requires.
        expected: usize,
        /// Number of fields actually present.
        found: usize,
    },
    /// A successful login response carried no token.
    #[error("login response did not carry a token")]
    MissingToken,
}
