use std::fmt;
use std::net::{IpAddr, Ipv6Addr, SocketAddr, ToSocketAddrs};

use thiserror::Error;

/// Resolved address of the mail server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServerEndpoint {
    address: IpAddr,
    port: u16,
}

impl ServerEndpoint {
    /// Builds an endpoint from an already resolved address.
    #[must_use]
    pub const fn new(address: IpAddr, port: u16) -> Self {
        Self { address, port }
    }

    /// Resolves `host` into an endpoint.
    ///
    /// `localhost` maps to the IPv6 loopback address. IP literals are used as
    /// given, with or without surrounding brackets. Any other name goes
    /// through the system resolver, preferring the first IPv4 result.
    ///
    /// # Errors
    ///
    /// Fails when the host is blank, the port is zero, or the name cannot be
    /// resolved.
    pub fn resolve(host: &str, port: u16) -> Result<Self, EndpointError> {
        if port == 0 {
            return Err(EndpointError::InvalidPort);
        }
        let trimmed = host.trim();
        if trimmed.is_empty() {
            return Err(EndpointError::EmptyHost);
        }
        if trimmed.eq_ignore_ascii_case("localhost") {
            return Ok(Self::new(IpAddr::V6(Ipv6Addr::LOCALHOST), port));
        }

        let literal = trimmed
            .strip_prefix('[')
            .and_then(|inner| inner.strip_suffix(']'))
            .unwrap_or(trimmed);
        if let Ok(address) = literal.parse::<IpAddr>() {
            return Ok(Self::new(address, port));
        }

        lookup(trimmed, port)
    }

    /// Server IP address.
    #[must_use]
    pub const fn address(&self) -> IpAddr {
        self.address
    }

    /// Server TCP port.
    #[must_use]
    pub const fn port(&self) -> u16 {
        self.port
    }

    /// Whether the address is IPv6.
    #[must_use]
    pub const fn is_v6(&self) -> bool {
        self.address.is_ipv6()
    }

    /// Socket address to connect to.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.address, self.port)
    }
}

fn lookup(host: &str, port: u16) -> Result<ServerEndpoint, EndpointError> {
    let candidates: Vec<SocketAddr> = (host, port)
        .to_socket_addrs()
        .map_err(|source| EndpointError::Lookup {
            host: host.to_owned(),
            source,
        })?
        .collect();
    candidates
        .iter()
        .find(|candidate| candidate.is_ipv4())
        .or_else(|| candidates.first())
        .map(|chosen| ServerEndpoint::new(chosen.ip(), port))
        .ok_or_else(|| EndpointError::Unresolvable {
            host: host.to_owned(),
        })
}

impl fmt::Display for ServerEndpoint {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "tcp://{}", self.socket_addr())
    }
}

/// Errors raised while resolving the server endpoint.
#[derive(Debug, Error)]
pub enum EndpointError {
    /// The configured address was blank.
    #[error("server address is empty")]
    EmptyHost,
    /// Port zero cannot be connected to.
    #[error("server port must be between 1 and 65535")]
    InvalidPort,
    /// The system resolver failed.
    #[error("failed to resolve '{host}': {source}")]
    Lookup {
        host: String,
        #[source]
        source: std::io::Error,
    },
    /// The resolver returned no addresses.
    #[error("'{host}' did not resolve to any address")]
    Unresolvable { host: String },
}
