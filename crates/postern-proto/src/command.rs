//! Command modelling for postern requests.
//!
//! [`Command`] is the typed form built by the command line: each variant
//! carries exactly the data its request needs. [`CommandSpec`] is the
//! positional form the encoder walks, holding `(ArgumentKey, value)` pairs in
//! wire order.

use std::fmt;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::Serialize;

use crate::error::EncodeError;

/// The six commands understood by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandKind {
    /// Creates an account.
    Register,
    /// Authenticates and obtains a token.
    Login,
    /// Lists messages in the mailbox.
    List,
    /// Sends a message to another user.
    Send,
    /// Fetches one message by id.
    Fetch,
    /// Invalidates the token.
    Logout,
}

impl CommandKind {
    /// Keyword that opens the request envelope.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Register => "register",
            Self::Login => "login",
            Self::List => "list",
            Self::Send => "send",
            Self::Fetch => "fetch",
            Self::Logout => "logout",
        }
    }

    /// Whether the request must carry the stored login token.
    #[must_use]
    pub const fn requires_token(self) -> bool {
        matches!(self, Self::List | Self::Send | Self::Fetch | Self::Logout)
    }

    /// Arguments the command accepts, in wire order.
    #[must_use]
    pub const fn arguments(self) -> &'static [ArgumentKey] {
        match self {
            Self::Register | Self::Login => &[ArgumentKey::Username, ArgumentKey::Password],
            Self::Send => &[
                ArgumentKey::Recipient,
                ArgumentKey::Subject,
                ArgumentKey::Body,
            ],
            Self::Fetch => &[ArgumentKey::Id],
            Self::List | Self::Logout => &[],
        }
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.name())
    }
}

/// Named positional argument of a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ArgumentKey {
    /// Account name.
    Username,
    /// Base64 encoded password.
    Password,
    /// Addressee of a sent message.
    Recipient,
    /// Subject line of a sent message.
    Subject,
    /// Body of a sent message.
    Body,
    /// Numeric message id.
    Id,
}

impl ArgumentKey {
    /// Upper-case label used in diagnostics.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Username => "USERNAME",
            Self::Password => "PASSWORD",
            Self::Recipient => "RECIPIENT",
            Self::Subject => "SUBJECT",
            Self::Body => "BODY",
            Self::Id => "ID",
        }
    }
}

impl fmt::Display for ArgumentKey {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.label())
    }
}

/// A command kind plus its arguments in wire order.
///
/// The set of keys always matches [`CommandKind::arguments`] exactly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    kind: CommandKind,
    args: Vec<(ArgumentKey, String)>,
}

impl CommandSpec {
    /// Builds a spec, rejecting argument lists that differ from the kind's.
    ///
    /// # Errors
    ///
    /// Returns [`EncodeError::ArgumentMismatch`] when the keys are missing,
    /// duplicated, extra, or out of order.
    pub fn new(kind: CommandKind, args: Vec<(ArgumentKey, String)>) -> Result<Self, EncodeError> {
        let expected = kind.arguments();
        let matches = args.len() == expected.len()
            && args.iter().zip(expected).all(|((key, _), want)| key == want);
        if !matches {
            return Err(EncodeError::ArgumentMismatch {
                command: kind,
                expected: join_labels(expected.iter().copied()),
                found: join_labels(args.iter().map(|(key, _)| *key)),
            });
        }
        Ok(Self { kind, args })
    }

    /// The command kind.
    #[must_use]
    pub const fn kind(&self) -> CommandKind {
        self.kind
    }

    /// Arguments in wire order.
    pub fn args(&self) -> impl Iterator<Item = (ArgumentKey, &str)> {
        self.args.iter().map(|(key, value)| (*key, value.as_str()))
    }

    /// Value of a single argument.
    #[must_use]
    pub fn get(&self, key: ArgumentKey) -> Option<&str> {
        self.args()
            .find(|(candidate, _)| *candidate == key)
            .map(|(_, value)| value)
    }
}

fn join_labels(keys: impl Iterator<Item = ArgumentKey>) -> String {
    keys.map(ArgumentKey::label).collect::<Vec<_>>().join(", ")
}

/// Username and base64 encoded password.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    encoded_password: String,
}

impl Credentials {
    /// Encodes `password` with standard padded base64.
    #[must_use]
    pub fn new(username: impl Into<String>, password: &str) -> Self {
        Self {
            username: username.into(),
            encoded_password: STANDARD.encode(password),
        }
    }

    /// Account name.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Password exactly as it goes on the wire.
    #[must_use]
    pub fn encoded_password(&self) -> &str {
        &self.encoded_password
    }
}

/// An outgoing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draft {
    /// Addressee.
    pub recipient: String,
    /// Subject line.
    pub subject: String,
    /// Body text; `\n` sequences mark line breaks.
    pub body: String,
}

/// A fully typed client command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `register <username> <password>`
    Register(Credentials),
    /// `login <username> <password>`
    Login(Credentials),
    /// `list`
    List,
    /// `send <recipient> <subject> <body>`
    Send(Draft),
    /// `fetch <id>`
    Fetch {
        /// Message id as listed by the server.
        id: u64,
    },
    /// `logout`
    Logout,
}

impl Command {
    /// The kind of this command.
    #[must_use]
    pub const fn kind(&self) -> CommandKind {
        match self {
            Self::Register(_) => CommandKind::Register,
            Self::Login(_) => CommandKind::Login,
            Self::List => CommandKind::List,
            Self::Send(_) => CommandKind::Send,
            Self::Fetch { .. } => CommandKind::Fetch,
            Self::Logout => CommandKind::Logout,
        }
    }
}

impl From<&Command> for CommandSpec {
    fn from(command: &Command) -> Self {
        let args = match command {
            Command::Register(credentials) | Command::Login(credentials) => vec![
                (ArgumentKey::Username, credentials.username.clone()),
                (ArgumentKey::Password, credentials.encoded_password.clone()),
            ],
            Command::Send(draft) => vec![
                (ArgumentKey::Recipient, draft.recipient.clone()),
                (ArgumentKey::Subject, draft.subject.clone()),
                (ArgumentKey::Body, draft.body.clone()),
            ],
            Command::Fetch { id } => vec![(ArgumentKey::Id, id.to_string())],
            Command::List | Command::Logout => Vec::new(),
        };
        Self {
            kind: command.kind(),
            args,
        }
    }
}

/// Opaque session token issued by a successful login.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthToken(String);

impl AuthToken {
    /// Wraps a raw token value.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The raw token value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("AuthToken(..)")
    }
}
