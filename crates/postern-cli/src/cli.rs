//! CLI argument definitions for the postern mail client.

use clap::{Parser, Subcommand};

use crate::output::OutputFormat;

/// Command-line interface for the postern mail client.
#[derive(Parser, Debug)]
#[command(
    name = "postern",
    version,
    disable_help_subcommand = true,
    arg_required_else_help = false
)]
pub(crate) struct Cli {
    /// Server host name or IP address.
    #[arg(short = 'a', long, value_name = "HOST")]
    pub(crate) address: Option<String>,
    /// Server TCP port.
    #[arg(short = 'p', long, value_name = "PORT")]
    pub(crate) port: Option<u16>,
    /// Controls how responses are rendered.
    #[arg(long, value_enum, default_value_t = OutputFormat::Human)]
    pub(crate) output: OutputFormat,
    /// The command to send to the server.
    #[command(subcommand)]
    pub(crate) command: CliCommand,
}

/// Commands understood by the server.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub(crate) enum CliCommand {
    /// Creates an account.
    Register {
        /// Account name.
        username: String,
        /// Account password; sent base64 encoded.
        password: String,
    },
    /// Logs in and stores the session token.
    Login {
        /// Account name.
        username: String,
        /// Account password; sent base64 encoded.
        password: String,
    },
    /// Lists the messages in your mailbox.
    List,
    /// Sends a message.
    Send {
        /// User to deliver the message to.
        recipient: String,
        /// Subject line.
        subject: String,
        /// Message body; `\n` starts a new line.
        body: String,
    },
    /// Prints one message.
    Fetch {
        /// Message id as shown by `list`.
        id: u64,
    },
    /// Ends the session and forgets the stored token.
    Logout,
}
