//! Socket transport for a single request/response exchange.
//!
//! A [`Session`] moves from connected to closed exactly once. The protocol
//! has no length prefix or terminator, so [`Session::receive`] reads until a
//! read adds nothing and, with balanced framing, stops early as soon as the
//! response envelope's brackets close.

use std::io::{self, Read, Write};
use std::net::TcpStream;

use socket2::{Domain, Protocol, SockAddr, Socket, Type};
use tracing::{debug, trace};

use postern_config::{Framing, ServerEndpoint};
use postern_proto::{Envelope, FrameScanner};

use crate::AppError;

/// Size of each socket read.
pub(crate) const RECEIVE_CHUNK: usize = 4096;

/// An open connection to the server.
pub(crate) struct Session<S> {
    stream: Option<S>,
}

/// Opens a blocking TCP connection to `endpoint`.
pub(crate) fn connect(endpoint: &ServerEndpoint) -> Result<Session<TcpStream>, AppError> {
    let connect_error = |source| AppError::Connect {
        endpoint: endpoint.to_string(),
        source,
    };
    let domain = if endpoint.is_v6() {
        Domain::IPV6
    } else {
        Domain::IPV4
    };
    let socket = Socket::new(domain, Type::STREAM, Some(Protocol::TCP)).map_err(connect_error)?;
    socket
        .connect(&SockAddr::from(endpoint.socket_addr()))
        .map_err(connect_error)?;
    debug!(%endpoint, "connected");
    Ok(Session::new(TcpStream::from(socket)))
}

impl<S: Read + Write> Session<S> {
    pub(crate) const fn new(stream: S) -> Self {
        Self {
            stream: Some(stream),
        }
    }

    fn stream_mut(&mut self) -> Result<&mut S, AppError> {
        self.stream.as_mut().ok_or(AppError::SessionClosed)
    }

    /// Writes the whole envelope and flushes it.
    pub(crate) fn send(&mut self, envelope: &Envelope) -> Result<(), AppError> {
        let stream = self.stream_mut()?;
        stream
            .write_all(envelope.as_bytes())
            .map_err(AppError::SendRequest)?;
        stream.flush().map_err(AppError::SendRequest)?;
        debug!(bytes = envelope.as_bytes().len(), "request sent");
        Ok(())
    }

    /// Reads the response text.
    pub(crate) fn receive(&mut self, framing: Framing) -> Result<String, AppError> {
        let stream = self.stream_mut()?;
        let mut accumulated: Vec<u8> = Vec::new();
        let mut chunk = [0_u8; RECEIVE_CHUNK];
        let mut scanner = FrameScanner::new();

        loop {
            let read = match stream.read(&mut chunk) {
                Ok(read) => read,
                Err(error) if error.kind() == io::ErrorKind::Interrupted => continue,
                Err(error) => return Err(AppError::ReadResponse(error)),
            };
            if read == 0 {
                break;
            }
            let received = chunk.get(..read).unwrap_or_default();
            accumulated.extend_from_slice(received);
            trace!(read, total = accumulated.len(), "received chunk");
            if framing == Framing::Balanced && scanner.feed(received) {
                break;
            }
        }

        debug!(bytes = accumulated.len(), %framing, "response received");
        Ok(String::from_utf8_lossy(&accumulated).into_owned())
    }

    /// Releases the connection. Later calls do nothing.
    pub(crate) fn close(&mut self) {
        if self.stream.take().is_some() {
            debug!("connection closed");
        }
    }
}
