//! Wire format for the postern mail protocol.
//!
//! Requests and responses are single parenthesised envelopes of quoted,
//! escaped text fields. This crate turns typed commands into request
//! envelopes and raw response text back into displayable results. It performs
//! no IO: the client crate owns sockets and token persistence.
//!
//! # Core types
//!
//! - [`Command`] and [`CommandSpec`]: typed and positional command forms
//! - [`Envelope`]: an encoded request
//! - [`Decoded`]: a decoded response plus the [`TokenAction`] it implies
//! - [`FrameScanner`]: incremental end-of-envelope detection
//!
//! # Example
//!
//! ```ignore
//! use postern_proto::{Command, CommandKind, decode, encode_command};
//!
//! let request = encode_command(&Command::List, Some(&token))?;
//! let decoded = decode(CommandKind::List, &response_text)?;
//! ```

pub mod command;
pub mod envelope;
pub mod error;
pub mod request;
pub mod response;

pub use command::{ArgumentKey, AuthToken, Command, CommandKind, CommandSpec, Credentials, Draft};
pub use envelope::{Envelope, FrameScanner};
pub use error::{EncodeError, ProtocolError};
pub use request::{encode, encode_command};
pub use response::{
    Decoded, DecodedResult, FetchedMessage, MessageSummary, Status, TokenAction, decode,
    render_response,
};
