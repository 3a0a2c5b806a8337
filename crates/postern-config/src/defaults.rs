use camino::Utf8PathBuf;

use crate::framing::Framing;
use crate::logging::LogFormat;

/// Host contacted when no address is configured.
pub const DEFAULT_ADDRESS: &str = "localhost";

/// TCP port the mail server listens on by default.
pub const DEFAULT_PORT: u16 = 32323;

/// File, relative to the working directory, holding the login token.
pub const DEFAULT_TOKEN_FILE: &str = "login-token";

/// Default log filter expression. Quiet enough that only command output
/// reaches the terminal.
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Owned default address used where allocation is required (e.g. serde).
pub fn default_address() -> String {
    DEFAULT_ADDRESS.to_owned()
}

/// Default server port.
pub const fn default_port() -> u16 {
    DEFAULT_PORT
}

/// Default token file location.
pub fn default_token_path() -> Utf8PathBuf {
    Utf8PathBuf::from(DEFAULT_TOKEN_FILE)
}

/// Default log filter expression.
pub fn default_log_filter() -> &'static str {
    DEFAULT_LOG_FILTER
}

/// Owned log filter value used where allocation is required (e.g. serde).
pub fn default_log_filter_string() -> String {
    DEFAULT_LOG_FILTER.to_owned()
}

/// Default logging format.
pub fn default_log_format() -> LogFormat {
    LogFormat::Compact
}

/// Default receive framing.
pub fn default_framing() -> Framing {
    Framing::Balanced
}
