use std::fmt::Write as _;

use postern_proto::{DecodedResult, FetchedMessage, MessageSummary};

const SUCCESS: &str = "SUCCESS: ";
const ERROR: &str = "ERROR: ";

/// Renders a decoded result as terminal text.
#[must_use]
pub fn render_human_output(result: &DecodedResult) -> String {
    match result {
        DecodedResult::Message { text } => format!("{SUCCESS}{text}\n"),
        DecodedResult::Login { greeting, .. } => format!("{SUCCESS}{greeting}\n"),
        DecodedResult::Error { message } => format!("{ERROR}{message}\n"),
        DecodedResult::List { items } => render_list(items),
        DecodedResult::Fetch { message } => render_message(message),
    }
}

fn render_list(items: &[MessageSummary]) -> String {
    let mut text = format!("{SUCCESS}\n");
    for item in items {
        let _ = write!(
            text,
            "{}: \n  From: {}\n  Subject: {}\n",
            item.id, item.from, item.subject
        );
    }
    text
}

fn render_message(message: &FetchedMessage) -> String {
    format!(
        "{SUCCESS}\n\nFrom: {}\nSubject: {}\n\n{}\n",
        message.from,
        message.subject,
        message.body_text()
    )
}
