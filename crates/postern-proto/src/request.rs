//! Request encoding.

use crate::command::{AuthToken, Command, CommandKind, CommandSpec};
use crate::envelope::{Envelope, escape};
use crate::error::EncodeError;

/// Builds the request envelope for `spec`.
///
/// Authenticated commands put the token directly after the keyword as a
/// quoted field. `fetch` takes its id as a bare token and closes the envelope
/// immediately after it; every other argument is escaped and quoted.
///
/// # Errors
///
/// Returns [`EncodeError::MissingToken`] when the command needs a token and
/// none was supplied.
pub fn encode(spec: &CommandSpec, token: Option<&AuthToken>) -> Result<Envelope, EncodeError> {
    let kind = spec.kind();
    let mut text = format!("({}", kind.name());

    if kind.requires_token() {
        let stored = token.ok_or(EncodeError::MissingToken { command: kind })?;
        push_quoted(&mut text, stored.as_str());
    }

    for (_, value) in spec.args() {
        if kind == CommandKind::Fetch {
            text.push(' ');
            text.push_str(value);
            text.push(')');
            return Ok(Envelope::new(text));
        }
        push_quoted(&mut text, value);
    }

    text.push(')');
    Ok(Envelope::new(text))
}

/// Encodes a typed command.
///
/// # Errors
///
/// See [`encode`].
pub fn encode_command(
    command: &Command,
    token: Option<&AuthToken>,
) -> Result<Envelope, EncodeError> {
    encode(&CommandSpec::from(command), token)
}

fn push_quoted(text: &mut String, value: &str) {
    text.push_str(" \"");
    text.push_str(&escape(value));
    text.push('"');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{ArgumentKey, Credentials, Draft};
    use rstest::rstest;

    fn token() -> AuthToken {
        AuthToken::new("TOKEN")
    }

    #[test]
    fn encodes_login_with_base64_password() {
        let command = Command::Login(Credentials::new("alice", "pw"));
        let envelope = encode_command(&command, None).unwrap();
        assert_eq!(envelope.as_str(), r#"(login "alice" "cHc=")"#);
    }

    #[test]
    fn register_ignores_any_stored_token() {
        let command = Command::Register(Credentials::new("alice", "pass"));
        let envelope = encode_command(&command, Some(&token())).unwrap();
        assert_eq!(envelope.as_str(), r#"(register "alice" "cGFzcw==")"#);
    }

    #[rstest]
    #[case(Command::List, r#"(list "TOKEN")"#)]
    #[case(Command::Logout, r#"(logout "TOKEN")"#)]
    #[case(Command::Fetch { id: 42 }, r#"(fetch "TOKEN" 42)"#)]
    fn authenticated_commands_carry_token(#[case] command: Command, #[case] expected: &str) {
        let envelope = encode_command(&command, Some(&token())).unwrap();
        assert_eq!(envelope.as_str(), expected);
    }

    #[test]
    fn send_escapes_every_field() {
        let command = Command::Send(Draft {
            recipient: String::from("bob"),
            subject: String::from(r#"the "plan""#),
            body: String::from(r"line one\nC:\temp"),
        });
        let envelope = encode_command(&command, Some(&token())).unwrap();
        assert_eq!(
            envelope.as_str(),
            r#"(send "TOKEN" "bob" "the \"plan\"" "line one\nC:\\temp")"#
        );
    }

    #[rstest]
    #[case(Command::List)]
    #[case(Command::Fetch { id: 1 })]
    #[case(Command::Logout)]
    fn authenticated_commands_need_a_token(#[case] command: Command) {
        let error = encode_command(&command, None).unwrap_err();
        assert_eq!(
            error,
            EncodeError::MissingToken {
                command: command.kind()
            }
        );
    }

    #[test]
    fn fetch_stops_after_the_id() {
        let spec =
            CommandSpec::new(CommandKind::Fetch, vec![(ArgumentKey::Id, String::from("7"))])
                .unwrap();
        let envelope = encode(&spec, Some(&token())).unwrap();
        assert_eq!(envelope.as_str(), r#"(fetch "TOKEN" 7)"#);
    }
}
