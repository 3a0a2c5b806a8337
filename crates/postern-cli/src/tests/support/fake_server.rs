//! Fake mail server for behavioural tests.
//!
//! Accepts one connection, records the request envelope and answers with a
//! canned response before closing the socket.

use std::io::{self, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result, anyhow};
use postern_proto::FrameScanner;

const ACCEPT_DEADLINE: Duration = Duration::from_secs(2);

/// A one-shot server answering with a fixed response.
pub(in crate::tests) struct FakeServer {
    port: u16,
    requests: Arc<Mutex<Vec<String>>>,
    result: Arc<Mutex<Option<Result<()>>>>,
    handle: Option<thread::JoinHandle<()>>,
}

impl FakeServer {
    /// Spawns a server on an ephemeral loopback port.
    ///
    /// If no client connects before the deadline the server exits without
    /// recording anything, so tests where the CLI fails early do not hang.
    pub fn spawn(response: impl Into<String>) -> Result<Self> {
        let response = response.into();
        let listener = TcpListener::bind(("127.0.0.1", 0)).context("bind fake server")?;
        listener
            .set_nonblocking(true)
            .context("fake server nonblocking")?;
        let port = listener.local_addr().context("local addr")?.port();
        let requests: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
        let result: Arc<Mutex<Option<Result<()>>>> = Arc::new(Mutex::new(None));
        let requests_clone = Arc::clone(&requests);
        let result_clone = Arc::clone(&result);
        let handle = thread::spawn(move || {
            let outcome = Self::serve_client(&listener, &response, &requests_clone);
            if let Ok(mut guard) = result_clone.lock() {
                *guard = Some(outcome);
            }
        });
        Ok(Self {
            port,
            requests,
            result,
            handle: Some(handle),
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Waits for the server thread and returns the recorded requests.
    pub fn take_requests(&mut self) -> Result<Vec<String>> {
        if let Some(handle) = self.handle.take() {
            handle
                .join()
                .map_err(|_| anyhow!("fake server thread panicked"))?;
        }
        if let Some(outcome) = self
            .result
            .lock()
            .map_err(|error| anyhow!("lock fake server result: {error}"))?
            .take()
        {
            outcome.context("fake server failed")?;
        }
        let requests = self
            .requests
            .lock()
            .map_err(|error| anyhow!("lock requests: {error}"))?;
        Ok(requests.clone())
    }

    fn serve_client(
        listener: &TcpListener,
        response: &str,
        requests: &Arc<Mutex<Vec<String>>>,
    ) -> Result<()> {
        let deadline = Instant::now() + ACCEPT_DEADLINE;
        loop {
            match listener.accept() {
                Ok((mut stream, _)) => {
                    stream
                        .set_nonblocking(false)
                        .context("blocking client stream")?;
                    stream
                        .set_read_timeout(Some(ACCEPT_DEADLINE))
                        .context("client read timeout")?;
                    Self::record_request(&mut stream, requests)?;
                    stream
                        .write_all(response.as_bytes())
                        .context("write response")?;
                    return stream.flush().context("flush response");
                }
                Err(ref error)
                    if error.kind() == io::ErrorKind::WouldBlock && Instant::now() < deadline =>
                {
                    thread::sleep(Duration::from_millis(10));
                }
                Err(ref error) if error.kind() == io::ErrorKind::WouldBlock => return Ok(()),
                Err(error) => return Err(error).context("accept connection"),
            }
        }
    }

    fn record_request(stream: &mut TcpStream, requests: &Arc<Mutex<Vec<String>>>) -> Result<()> {
        let mut scanner = FrameScanner::new();
        let mut received = Vec::new();
        let mut chunk = [0_u8; 512];
        loop {
            let read = stream.read(&mut chunk).context("read request")?;
            if read == 0 {
                break;
            }
            let bytes = chunk.get(..read).unwrap_or_default();
            received.extend_from_slice(bytes);
            if scanner.feed(bytes) {
                break;
            }
        }
        let request = String::from_utf8(received).context("request utf8")?;
        requests
            .lock()
            .map_err(|error| anyhow!("lock requests: {error}"))?
            .push(request);
        Ok(())
    }
}

impl Drop for FakeServer {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}
