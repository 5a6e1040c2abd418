//! One connection, one request, one reply.
//!
//! The request has no length prefix; the daemon learns it is complete when
//! the write side is shut down. The reply is likewise delimited only by the
//! daemon closing its side, so the session reads until EOF.

use std::io::{ErrorKind, Read, Write};
use std::net::Shutdown;
use std::os::unix::net::UnixStream;
use std::path::{Path, PathBuf};

use crate::endpoint::Endpoint;
use crate::error::ClientError;
use crate::request::Request;

/// Reply bytes kept for classification.
pub const REPLY_CAPACITY: usize = 1024 * 1024;

pub const READ_CHUNK: usize = 4096;

/// Reply bytes that did not fit in the retained buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overflow<'a> {
    /// Fired once, with everything retained so far.
    Started { head: &'a [u8] },
    /// Every later byte, in arrival order.
    Chunk(&'a [u8]),
}

/// Reply as received, up to the retention limit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawReply {
    pub bytes: Vec<u8>,
    /// True when part of the reply went through the overflow callback.
    pub overflowed: bool,
    /// Bytes read from the socket, retained or not.
    pub total_len: usize,
}

/// Connected socket plus the path it was opened on.
///
/// Dropping the session closes the socket.
#[derive(Debug)]
pub struct Session {
    stream: UnixStream,
    socket: PathBuf,
    reply_capacity: usize,
}

impl Session {
    pub fn connect(endpoint: &Endpoint) -> Result<Self, ClientError> {
        Self::connect_path(endpoint.path())
    }

    fn connect_path(socket: &Path) -> Result<Self, ClientError> {
        let stream = UnixStream::connect(socket).map_err(|source| {
            if matches!(
                source.kind(),
                ErrorKind::NotFound | ErrorKind::ConnectionRefused
            ) {
                ClientError::DaemonNotRunning {
                    socket: socket.to_path_buf(),
                    source,
                }
            } else {
                ClientError::Connect {
                    socket: socket.to_path_buf(),
                    source,
                }
            }
        })?;

        tracing::debug!(socket = %socket.display(), "connected to daemon");
        Ok(Self {
            stream,
            socket: socket.to_path_buf(),
            reply_capacity: REPLY_CAPACITY,
        })
    }

    pub fn with_reply_capacity(mut self, capacity: usize) -> Self {
        self.reply_capacity = capacity;
        self
    }

    pub fn socket(&self) -> &Path {
        &self.socket
    }

    /// Write the whole frame, then half-close so the daemon sees EOF.
    pub fn send(&mut self, request: &Request) -> Result<(), ClientError> {
        self.stream
            .write_all(request.as_bytes())
            .map_err(ClientError::Send)?;
        self.stream
            .shutdown(Shutdown::Write)
            .map_err(ClientError::Shutdown)?;
        tracing::debug!(
            bytes = request.as_bytes().len(),
            command = request.command(),
            "request sent"
        );
        Ok(())
    }

    /// Read until the daemon closes its side.
    ///
    /// On a read error nothing retained is returned; bytes already handed to
    /// `on_overflow` stay delivered.
    pub fn receive<F>(&mut self, mut on_overflow: F) -> Result<RawReply, ClientError>
    where
        F: FnMut(Overflow<'_>) -> std::io::Result<()>,
    {
        let mut reply = RawReply::default();
        let mut chunk = [0u8; READ_CHUNK];

        loop {
            let n = match self.stream.read(&mut chunk) {
                Ok(0) => break,
                Ok(n) => n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(ClientError::Receive(err)),
            };
            reply.total_len += n;

            let room = self.reply_capacity.saturating_sub(reply.bytes.len());
            let kept = n.min(room);
            reply.bytes.extend_from_slice(&chunk[..kept]);

            let rest = &chunk[kept..n];
            if rest.is_empty() {
                continue;
            }
            if !reply.overflowed {
                reply.overflowed = true;
                tracing::debug!(
                    capacity = self.reply_capacity,
                    "reply exceeds buffer, streaming remainder"
                );
                on_overflow(Overflow::Started { head: &reply.bytes })
                    .map_err(ClientError::Output)?;
            }
            on_overflow(Overflow::Chunk(rest)).map_err(ClientError::Output)?;
        }

        tracing::debug!(
            socket = %self.socket().display(),
            bytes = reply.total_len,
            overflowed = reply.overflowed,
            "reply received"
        );
        Ok(reply)
    }
}

/// Connect, send `request`, and read the full reply.
pub fn exchange<F>(
    endpoint: &Endpoint,
    request: &Request,
    on_overflow: F,
) -> Result<RawReply, ClientError>
where
    F: FnMut(Overflow<'_>) -> std::io::Result<()>,
{
    let mut session = Session::connect(endpoint)?;
    session.send(request)?;
    session.receive(on_overflow)
}
