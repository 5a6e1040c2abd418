//! Scripted stand-in for the pyprland daemon.
//!
//! Binds `.pyprland.sock` in a fresh temp directory, so pointing
//! `XDG_DATA_HOME` at [`MockDaemon::dir`] makes a client find it.

use std::io::{ErrorKind, Read, Write};
use std::os::unix::net::{UnixListener, UnixStream};
use std::path::{Path, PathBuf};
use std::thread::{self, sleep, JoinHandle};
use std::time::{Duration, Instant};

use tempfile::TempDir;

const SOCKET_FILE: &str = ".pyprland.sock";
const ACCEPT_TIMEOUT: Duration = Duration::from_secs(10);

/// Computes the reply for one request.
pub type Replier = Box<dyn Fn(&[u8]) -> Vec<u8> + Send + 'static>;

pub struct MockDaemon {
    socket: PathBuf,
    worker: Option<JoinHandle<Vec<Vec<u8>>>>,
    idle: Option<UnixListener>,
    dir: TempDir,
}

impl MockDaemon {
    /// Serve `connections` requests, answering each with `reply`.
    pub fn replying(reply: impl Into<Vec<u8>>, connections: usize) -> Self {
        let reply = reply.into();
        Self::with(Box::new(move |_: &[u8]| reply.clone()), connections)
    }

    /// Serve `connections` requests, answering `OK <request>`.
    pub fn echo_ok(connections: usize) -> Self {
        Self::with(
            Box::new(|request: &[u8]| {
                let mut reply = b"OK ".to_vec();
                reply.extend_from_slice(request);
                reply
            }),
            connections,
        )
    }

    pub fn with(replier: Replier, connections: usize) -> Self {
        let (dir, socket, listener) = bind();
        let worker = thread::spawn(move || serve(listener, replier, connections));
        Self {
            socket,
            worker: Some(worker),
            idle: None,
            dir,
        }
    }

    /// Accept one client, write `partial`, then close with most of the
    /// request still unread. Unread data turns the close into a reset, so the
    /// client's read fails instead of reaching EOF.
    pub fn resetting(partial: impl Into<Vec<u8>>) -> Self {
        let partial = partial.into();
        let (dir, socket, listener) = bind();
        let worker = thread::spawn(move || {
            if let Some(mut stream) = accept_within(&listener, ACCEPT_TIMEOUT) {
                // Waits for the request to land but leaves its tail queued.
                let mut first = [0u8; 1];
                if let Err(err) = stream.read_exact(&mut first) {
                    tracing::warn!(error = %err, "mock daemon saw no request");
                }
                if let Err(err) = stream.write_all(&partial) {
                    tracing::warn!(error = %err, "mock daemon failed to write partial reply");
                }
                tracing::debug!(bytes = partial.len(), "mock daemon resetting connection");
            }
            Vec::new()
        });
        Self {
            socket,
            worker: Some(worker),
            idle: None,
            dir,
        }
    }

    /// Listen without ever accepting; see [`MockDaemon::was_contacted`].
    pub fn idle() -> Self {
        let (dir, socket, listener) = bind();
        Self {
            socket,
            worker: None,
            idle: Some(listener),
            dir,
        }
    }

    /// Directory holding the socket; use it as `XDG_DATA_HOME`.
    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    pub fn socket(&self) -> &Path {
        &self.socket
    }

    /// Whether a client has queued a connection on an idle daemon.
    pub fn was_contacted(&self) -> bool {
        let Some(listener) = &self.idle else {
            return false;
        };
        listener
            .set_nonblocking(true)
            .expect("set listener nonblocking");
        listener.accept().is_ok()
    }

    /// Wait for the worker and return every request it read, in order.
    pub fn requests(mut self) -> Vec<Vec<u8>> {
        self.worker
            .take()
            .map(|worker| worker.join().expect("mock daemon thread panicked"))
            .unwrap_or_default()
    }
}

fn bind() -> (TempDir, PathBuf, UnixListener) {
    let dir = TempDir::new().expect("create mock daemon dir");
    let socket = dir.path().join(SOCKET_FILE);
    let listener = UnixListener::bind(&socket).expect("bind mock daemon socket");
    (dir, socket, listener)
}

/// Poll for one client until `timeout` passes; the returned stream blocks.
fn accept_within(listener: &UnixListener, timeout: Duration) -> Option<UnixStream> {
    listener
        .set_nonblocking(true)
        .expect("set listener nonblocking");
    let deadline = Instant::now() + timeout;
    loop {
        match listener.accept() {
            Ok((stream, _)) => {
                stream
                    .set_nonblocking(false)
                    .expect("set stream blocking");
                return Some(stream);
            }
            Err(err) if err.kind() == ErrorKind::WouldBlock && Instant::now() < deadline => {
                sleep(Duration::from_millis(10));
            }
            Err(err) => {
                tracing::warn!(error = %err, "mock daemon gave up waiting for a client");
                return None;
            }
        }
    }
}

fn serve(listener: UnixListener, replier: Replier, connections: usize) -> Vec<Vec<u8>> {
    let mut requests = Vec::with_capacity(connections);
    for _ in 0..connections {
        let Some(mut stream) = accept_within(&listener, ACCEPT_TIMEOUT) else {
            return requests;
        };
        stream
            .set_read_timeout(Some(ACCEPT_TIMEOUT))
            .expect("set read timeout");

        // The client half-closes after its request, so this returns.
        let mut request = Vec::new();
        if let Err(err) = stream.read_to_end(&mut request) {
            tracing::warn!(error = %err, "mock daemon failed to read request");
        }
        let reply = replier(&request);
        if let Err(err) = stream.write_all(&reply) {
            tracing::warn!(error = %err, "mock daemon failed to write reply");
        }
        tracing::debug!(
            request = %String::from_utf8_lossy(&request),
            reply_bytes = reply.len(),
            "mock daemon served request"
        );
        requests.push(request);
    }
    requests
}

impl Drop for MockDaemon {
    fn drop(&mut self) {
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}
