//! String transforms over the parenthesised wire envelope.
//!
//! Every function here is total: when the delimiter a transform looks for is
//! absent, the input comes back unchanged. Nothing in this module performs IO;
//! the transport feeds received bytes through [`FrameScanner`] and the decoder
//! composes the stripping and splitting helpers.

use std::fmt;

/// Prefix that marks a successful response.
pub const OK_PREFIX: &str = "(ok ";

/// Bytes removed from the front of an `ok` response (`(ok`).
pub const OK_HEADER_LEN: usize = 3;

/// Bytes removed from the front of any other response (`(err`).
pub const ERR_HEADER_LEN: usize = 4;

/// Separator between two quoted fields: closing quote, space, opening quote.
pub const FIELD_SEPARATOR: &str = "\" \"";

/// Separator between two parenthesised list items.
pub const ITEM_SEPARATOR: &str = ") (";

/// Two-character escape sequence standing for a line break in a body.
pub const ESCAPED_NEWLINE: &str = "\\n";

/// A complete request envelope ready to be written to the socket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope(String);

impl Envelope {
    pub(crate) const fn new(text: String) -> Self {
        Self(text)
    }

    /// Returns the envelope text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the envelope as raw bytes for the transport.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    /// Consumes the envelope and returns its text.
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Envelope {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}

/// Escapes a field value for the wire.
///
/// Backslashes are doubled first, then quotes are escaped, and finally any
/// `\\n` produced by the first pass collapses back to `\n` so that a line
/// break typed as `\n` survives as a single escape. The order is part of the
/// wire format and must not change.
#[must_use]
pub fn escape(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace("\\\\n", "\\n")
}

/// Reverses [`escape`]: `\\` becomes `\`, then `\"` becomes `"`.
#[must_use]
pub fn unescape(value: &str) -> String {
    value.replace("\\\\", "\\").replace("\\\"", "\"")
}

/// Reports whether a response carries the `ok` status.
#[must_use]
pub fn is_ok(response: &str) -> bool {
    response.starts_with(OK_PREFIX)
}

/// Number of header bytes [`strip_header`] removes from `response`.
#[must_use]
pub fn header_len(response: &str) -> usize {
    if is_ok(response) {
        OK_HEADER_LEN
    } else {
        ERR_HEADER_LEN
    }
}

/// Removes the status header: three bytes for `ok`, four for anything else.
///
/// A response that ends or splits a character inside its header yields an
/// empty string; [`crate::decode`] rejects those before stripping.
#[must_use]
pub fn strip_header(response: &str) -> &str {
    response.get(header_len(response)..).unwrap_or_default()
}

/// Drops everything up to and including the first `(`.
#[must_use]
pub fn strip_leading_paren(value: &str) -> &str {
    value.split_once('(').map_or(value, |(_, rest)| rest)
}

/// Drops everything from the last `)` onwards.
#[must_use]
pub fn strip_trailing_paren(value: &str) -> &str {
    value.rsplit_once(')').map_or(value, |(head, _)| head)
}

/// Removes one layer of bracket wrapping.
#[must_use]
pub fn strip_outer_paren(value: &str) -> &str {
    strip_trailing_paren(strip_leading_paren(value))
}

/// Removes one layer of quote wrapping.
///
/// Everything up to and including the first `"` goes, then everything from
/// the last remaining `"` onwards. A value with a single quote keeps the text
/// after it.
#[must_use]
pub fn strip_outer_quotes(value: &str) -> &str {
    value.split_once('"').map_or(value, |(_, rest)| {
        rest.rsplit_once('"').map_or(rest, |(inner, _)| inner)
    })
}

/// Splits on a single character the way a line reader would.
///
/// Part of the codec surface for callers; the response decoder itself only
/// splits on literal substrings.
///
/// Empty fields between separators are kept, but a trailing empty field is
/// not, so `"a,b,"` yields two fields and `""` yields none.
#[must_use]
pub fn split_on_char(value: &str, separator: char) -> Vec<&str> {
    let mut fields: Vec<&str> = value.split(separator).collect();
    if fields.last().is_some_and(|field| field.is_empty()) {
        fields.pop();
    }
    fields
}

/// Splits on a literal separator using the protocol's half-separator rule.
///
/// For every occurrence, the field before it keeps the first byte of the
/// separator and the next field resumes `len / 2 + 1` bytes into it. With the
/// three byte separators ([`FIELD_SEPARATOR`], [`ITEM_SEPARATOR`]) each field
/// keeps its own closing and opening delimiter and only the middle space is
/// consumed. [`ESCAPED_NEWLINE`] is consumed entirely. The text after the last
/// occurrence is always appended as the final field.
#[must_use]
pub fn split_on_substring<'a>(value: &'a str, separator: &str) -> Vec<&'a str> {
    if separator.is_empty() {
        return vec![value];
    }

    let kept = usize::from(separator != ESCAPED_NEWLINE);
    let resume = separator.len().div_euclid(2) + 1;
    let mut fields = Vec::new();
    let mut rest = value;

    while let Some(position) = rest.find(separator) {
        match (rest.get(..position + kept), rest.get(position + resume..)) {
            (Some(field), Some(remainder)) => {
                fields.push(field);
                rest = remainder;
            }
            _ => {
                // Multi-byte separators cannot be cut in half; consume whole.
                let (field, tail) = rest.split_at(position);
                fields.push(field);
                rest = tail.strip_prefix(separator).unwrap_or(tail);
            }
        }
    }
    fields.push(rest);
    fields
}

/// Reports whether `value` opens a quoted string it never closes.
///
/// Quotes preceded by a backslash escape do not count.
#[must_use]
pub fn has_unterminated_quote(value: &str) -> bool {
    let mut open = false;
    let mut escaped = false;
    for byte in value.bytes() {
        if escaped {
            escaped = false;
        } else if byte == b'\\' {
            escaped = open;
        } else if byte == b'"' {
            open = !open;
        }
    }
    open
}

/// Incremental detector for the end of a response envelope.
///
/// Bytes are fed as they arrive; the scanner tracks parenthesis depth outside
/// quoted strings and honours backslash escapes inside them. Once the first
/// `(` has been matched by its closing `)`, the frame is complete and further
/// input is ignored.
#[derive(Debug, Default, Clone)]
pub struct FrameScanner {
    depth: usize,
    in_string: bool,
    escaped: bool,
    complete: bool,
}

impl FrameScanner {
    /// Creates a scanner that has seen no input.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds the next chunk and returns whether the envelope is complete.
    pub fn feed(&mut self, chunk: &[u8]) -> bool {
        for &byte in chunk {
            if self.complete {
                break;
            }
            if self.in_string {
                self.scan_string_byte(byte);
                continue;
            }
            match byte {
                b'"' => self.in_string = true,
                b'(' => self.depth += 1,
                b')' if self.depth > 0 => {
                    self.depth -= 1;
                    self.complete = self.depth == 0;
                }
                _ => {}
            }
        }
        self.complete
    }

    /// Whether the outer envelope has closed.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.complete
    }

    const fn scan_string_byte(&mut self, byte: u8) {
        if self.escaped {
            self.escaped = false;
        } else if byte == b'\\' {
            self.escaped = true;
        } else if byte == b'"' {
            self.in_string = false;
        }
    }
}
