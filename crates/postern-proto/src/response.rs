//! Response decoding.
//!
//! A response is classified by its status header and then parsed according to
//! the command that produced it. Each command has a fixed payload shape:
//!
//! | command                    | payload after the header             |
//! |----------------------------|--------------------------------------|
//! | register, send, logout     | `"message"`                          |
//! | login                      | `"greeting" "token"`                 |
//! | list                       | `((id "from" "subject") ...)`        |
//! | fetch                      | `("from" "subject" "body")`          |
//! | any, on error              | `"message"`                          |

use serde::Serialize;

use crate::command::{AuthToken, CommandKind};
use crate::envelope::{
    ESCAPED_NEWLINE, FIELD_SEPARATOR, ITEM_SEPARATOR, escape, has_unterminated_quote, header_len,
    is_ok, split_on_substring, strip_header, strip_outer_paren, strip_outer_quotes,
    strip_trailing_paren, unescape,
};
use crate::error::ProtocolError;

/// Status carried in the response header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    /// `(ok ...)`
    Ok,
    /// Anything else, conventionally `(err ...)`.
    Err,
}

impl Status {
    /// Classifies a raw response.
    #[must_use]
    pub fn of(response: &str) -> Self {
        if is_ok(response) { Self::Ok } else { Self::Err }
    }
}

/// One entry of a mailbox listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageSummary {
    /// Server-assigned message id.
    pub id: String,
    /// Sender.
    pub from: String,
    /// Subject line.
    pub subject: String,
}

/// A fetched message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FetchedMessage {
    /// Sender.
    pub from: String,
    /// Subject line.
    pub subject: String,
    /// Body split into display lines.
    pub body: Vec<String>,
}

impl FetchedMessage {
    /// Body lines joined with real line breaks.
    #[must_use]
    pub fn body_text(&self) -> String {
        self.body.join("\n")
    }
}

/// Displayable outcome of one command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DecodedResult {
    /// Success message from register, send, or logout.
    Message {
        /// Server text.
        text: String,
    },
    /// Error reported by the server for any command.
    Error {
        /// Server text.
        message: String,
    },
    /// Successful login.
    Login {
        /// Greeting shown to the user.
        greeting: String,
        /// Token to persist for later commands.
        #[serde(skip)]
        token: AuthToken,
    },
    /// Mailbox listing.
    List {
        /// Entries in server order.
        items: Vec<MessageSummary>,
    },
    /// A single message.
    Fetch {
        /// The message.
        message: FetchedMessage,
    },
}

/// What the caller must do with its stored token after a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenAction {
    /// Leave the stored token untouched.
    Keep,
    /// Store this token, replacing any previous one.
    Persist(AuthToken),
    /// Delete the stored token.
    Discard,
}

/// A decoded response and the token bookkeeping it implies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    /// The displayable result.
    pub result: DecodedResult,
    /// Token store side effect.
    pub token_action: TokenAction,
}

impl Decoded {
    const fn keep(result: DecodedResult) -> Self {
        Self {
            result,
            token_action: TokenAction::Keep,
        }
    }
}

/// Decodes `response` as the answer to a `kind` request.
///
/// # Errors
///
/// Returns a [`ProtocolError`] when the response is empty, ends or splits a
/// character inside its header, or does not have the field layout `kind`
/// requires.
pub fn decode(kind: CommandKind, response: &str) -> Result<Decoded, ProtocolError> {
    if response.is_empty() {
        return Err(ProtocolError::EmptyResponse);
    }
    if !response.is_char_boundary(header_len(response)) {
        return Err(ProtocolError::TruncatedHeader {
            response: response.to_owned(),
        });
    }

    if Status::of(response) == Status::Err {
        return Ok(Decoded::keep(DecodedResult::Error {
            message: message_text(response),
        }));
    }

    match kind {
        CommandKind::Register | CommandKind::Send => Ok(Decoded::keep(DecodedResult::Message {
            text: message_text(response),
        })),
        CommandKind::Logout => Ok(Decoded {
            result: DecodedResult::Message {
                text: message_text(response),
            },
            token_action: TokenAction::Discard,
        }),
        CommandKind::Login => decode_login(response),
        CommandKind::List => Ok(Decoded::keep(DecodedResult::List {
            items: decode_list(response),
        })),
        CommandKind::Fetch => decode_fetch(response).map(|message| {
            Decoded::keep(DecodedResult::Fetch { message })
        }),
    }
}

fn message_text(response: &str) -> String {
    unescape(strip_outer_quotes(strip_header(response)))
}

/// Splits a payload into exactly `N` quoted fields.
fn quoted_fields<const N: usize>(
    command: CommandKind,
    payload: &str,
) -> Result<[&str; N], ProtocolError> {
    let fields = split_on_substring(payload, FIELD_SEPARATOR);
    let found = fields.len();
    <[&str; N]>::try_from(fields).map_err(|_| ProtocolError::FieldCount {
        command,
        expected: N,
        found,
    })
}

fn decode_login(response: &str) -> Result<Decoded, ProtocolError> {
    let [greeting_field, token_field] =
        quoted_fields::<2>(CommandKind::Login, strip_header(response))?;
    let raw_token = unescape(strip_outer_quotes(token_field));
    if raw_token.is_empty() {
        return Err(ProtocolError::MissingToken);
    }
    let token = AuthToken::new(raw_token);
    Ok(Decoded {
        result: DecodedResult::Login {
            greeting: unescape(strip_outer_quotes(greeting_field)),
            token: token.clone(),
        },
        token_action: TokenAction::Persist(token),
    })
}

/// Removes the header, the envelope's closing bracket, and one more layer of
/// brackets around the payload.
fn payload_body(response: &str) -> &str {
    strip_outer_paren(strip_trailing_paren(strip_header(response)))
}

fn decode_list(response: &str) -> Vec<MessageSummary> {
    list_items(payload_body(response))
        .iter()
        .map_while(|item| summarise(strip_outer_paren(item)))
        .collect()
}

/// Splits listing text into items, rejoining any split that fell inside a
/// quoted subject.
fn list_items(body: &str) -> Vec<String> {
    let mut items = Vec::new();
    let mut pending: Option<String> = None;
    for piece in split_on_substring(body, ITEM_SEPARATOR) {
        let item = match pending.take() {
            Some(mut open) => {
                open.push(' ');
                open.push_str(piece);
                open
            }
            None => piece.to_owned(),
        };
        if has_unterminated_quote(&item) {
            pending = Some(item);
        } else {
            items.push(item);
        }
    }
    items.extend(pending);
    items
}

/// Parses `id "from" "subject"`.
///
/// An item with nothing after the id, or with fewer than two quoted fields,
/// marks the end of the listing and yields `None`. Empty quoted fields are
/// still a message.
fn summarise(item: &str) -> Option<MessageSummary> {
    let (id, remainder) = item.split_once(' ').unwrap_or((item, ""));
    let fields: Vec<&str> = split_on_substring(remainder, FIELD_SEPARATOR)
        .into_iter()
        .filter(|piece| !piece.trim().is_empty())
        .take(2)
        .collect();
    let [from, subject] = <[&str; 2]>::try_from(fields).ok()?;
    Some(MessageSummary {
        id: id.to_owned(),
        from: unescape(strip_outer_quotes(from)),
        subject: unescape(strip_outer_quotes(subject)),
    })
}

fn decode_fetch(response: &str) -> Result<FetchedMessage, ProtocolError> {
    let [from, subject, body] = quoted_fields::<3>(CommandKind::Fetch, payload_body(response))?;
    Ok(FetchedMessage {
        from: unescape(strip_outer_quotes(from)),
        subject: unescape(strip_outer_quotes(subject)),
        body: split_on_substring(strip_outer_quotes(body), ESCAPED_NEWLINE)
            .into_iter()
            .map(unescape)
            .collect(),
    })
}

/// Renders the canonical `ok`/`err` response for `result`.
///
/// This is the server side of [`decode`]: decoding the returned text as the
/// matching command yields `result` again.
#[must_use]
pub fn render_response(result: &DecodedResult) -> String {
    match result {
        DecodedResult::Message { text } => format!("(ok {})", quoted(text)),
        DecodedResult::Error { message } => format!("(err {})", quoted(message)),
        DecodedResult::Login { greeting, token } => {
            format!("(ok {} {})", quoted(greeting), quoted(token.as_str()))
        }
        DecodedResult::List { items } => {
            let rendered: Vec<String> = items
                .iter()
                .map(|item| {
                    format!(
                        "({} {} {})",
                        item.id,
                        quoted(&item.from),
                        quoted(&item.subject)
                    )
                })
                .collect();
            format!("(ok ({}))", rendered.join(" "))
        }
        DecodedResult::Fetch { message } => {
            let body: Vec<String> = message
                .body
                .iter()
                .map(String::as_str)
                .map(escape)
                .collect();
            format!(
                "(ok ({} {} \"{}\"))",
                quoted(&message.from),
                quoted(&message.subject),
                body.join(ESCAPED_NEWLINE)
            )
        }
    }
}

fn quoted(value: &str) -> String {
    format!("\"{}\"", escape(value))
}
