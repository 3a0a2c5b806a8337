//! Conversion from parsed arguments to protocol commands.

use postern_proto::{Command, Credentials, Draft};

use crate::cli::CliCommand;

impl From<CliCommand> for Command {
    fn from(command: CliCommand) -> Self {
        match command {
            CliCommand::Register { username, password } => {
                Self::Register(Credentials::new(username, &password))
            }
            CliCommand::Login { username, password } => {
                Self::Login(Credentials::new(username, &password))
            }
            CliCommand::List => Self::List,
            CliCommand::Send {
                recipient,
                subject,
                body,
            } => Self::Send(Draft {
                recipient,
                subject,
                body,
            }),
            CliCommand::Fetch { id } => Self::Fetch { id },
            CliCommand::Logout => Self::Logout,
        }
    }
}
