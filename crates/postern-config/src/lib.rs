//! Shared configuration for the postern mail client.
//!
//! Values are layered by `ortho_config`: built-in defaults, then a TOML file
//! (`--config-path` or `POSTERN_CONFIG_PATH`), then `POSTERN_*` environment
//! variables, then command-line flags. The command line may further override
//! the server address and port through [`Config::with_overrides`].

use camino::{Utf8Path, Utf8PathBuf};
use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

mod defaults;
mod endpoint;
mod framing;
mod logging;

pub use defaults::{
    DEFAULT_ADDRESS, DEFAULT_LOG_FILTER, DEFAULT_PORT, DEFAULT_TOKEN_FILE, default_address,
    default_framing, default_log_filter, default_log_filter_string, default_log_format,
    default_port, default_token_path,
};
pub use endpoint::{EndpointError, ServerEndpoint};
pub use framing::Framing;
pub use logging::{LogFormat, LogFormatParseError};

/// Resolved client configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, OrthoConfig)]
#[ortho_config(prefix = "POSTERN")]
pub struct Config {
    /// Server host name or IP literal.
    #[ortho_config(default = defaults::default_address())]
    #[serde(default = "defaults::default_address")]
    address: String,
    /// Server TCP port.
    #[ortho_config(default = defaults::DEFAULT_PORT)]
    #[serde(default = "defaults::default_port")]
    port: u16,
    /// File holding the login token between invocations.
    #[ortho_config(default = defaults::default_token_path())]
    #[serde(default = "defaults::default_token_path")]
    token_path: Utf8PathBuf,
    /// `tracing` filter expression.
    #[ortho_config(default = defaults::default_log_filter_string())]
    #[serde(default = "defaults::default_log_filter_string")]
    log_filter: String,
    /// Log output format.
    #[ortho_config(default = defaults::default_log_format())]
    #[serde(default = "defaults::default_log_format")]
    log_format: LogFormat,
    /// Receive termination strategy.
    #[ortho_config(default = defaults::default_framing())]
    #[serde(default = "defaults::default_framing")]
    framing: Framing,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            address: default_address(),
            port: DEFAULT_PORT,
            token_path: default_token_path(),
            log_filter: default_log_filter_string(),
            log_format: default_log_format(),
            framing: default_framing(),
        }
    }
}

impl Config {
    /// Server host name or IP literal.
    #[must_use]
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Server TCP port.
    #[must_use]
    pub const fn port(&self) -> u16 {
        self.port
    }

    /// Token file location.
    #[must_use]
    pub fn token_path(&self) -> &Utf8Path {
        &self.token_path
    }

    /// Log filter expression.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        &self.log_filter
    }

    /// Log output format.
    #[must_use]
    pub const fn log_format(&self) -> LogFormat {
        self.log_format
    }

    /// Receive framing strategy.
    #[must_use]
    pub const fn framing(&self) -> Framing {
        self.framing
    }

    /// Applies command-line address and port overrides.
    #[must_use]
    pub fn with_overrides(mut self, address: Option<String>, port: Option<u16>) -> Self {
        if let Some(value) = address {
            self.address = value;
        }
        if let Some(value) = port {
            self.port = value;
        }
        self
    }

    /// Replaces the token file location.
    #[must_use]
    pub fn with_token_path(mut self, path: impl Into<Utf8PathBuf>) -> Self {
        self.token_path = path.into();
        self
    }

    /// Resolves the configured address and port.
    ///
    /// # Errors
    ///
    /// See [`ServerEndpoint::resolve`].
    pub fn endpoint(&self) -> Result<ServerEndpoint, EndpointError> {
        ServerEndpoint::resolve(&self.address, self.port)
    }
}
