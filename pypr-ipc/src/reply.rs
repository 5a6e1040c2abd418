//! Reply envelope classification.
//!
//! Current daemons answer `OK[ text]` or `ERROR: message`. Older builds, and
//! a few commands such as `version` or `help`, answer with bare text which is
//! passed through as a legacy reply.

use std::io::{self, Write};

use crate::error::ExitCode;
use crate::session::Overflow;

pub const ERROR_PREFIX: &[u8] = b"ERROR:";
pub const OK_PREFIX: &[u8] = b"OK";

fn is_blank(c: char) -> bool {
    c == ' ' || c == '\n'
}

/// Envelope of a reply, decided from its leading bytes alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyKind {
    Error,
    Ok,
    Legacy,
}

impl ReplyKind {
    pub fn of(bytes: &[u8]) -> Self {
        // ERROR: first; the two prefixes never overlap but the order is fixed.
        if bytes.starts_with(ERROR_PREFIX) {
            ReplyKind::Error
        } else if bytes.starts_with(OK_PREFIX) {
            ReplyKind::Ok
        } else {
            ReplyKind::Legacy
        }
    }

    pub fn exit_code(self) -> ExitCode {
        match self {
            ReplyKind::Error => ExitCode::CommandError,
            ReplyKind::Ok | ReplyKind::Legacy => ExitCode::Success,
        }
    }
}

/// A complete reply, classified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// Message after `ERROR:`, trailing blanks removed.
    Error(String),
    /// Text after `OK`, if any, leading blanks removed.
    Ok(Option<String>),
    /// Whole reply with trailing newlines removed. Empty for an empty reply.
    Legacy(String),
}

impl Response {
    pub fn classify(bytes: &[u8]) -> Self {
        let text = String::from_utf8_lossy(bytes);
        match ReplyKind::of(bytes) {
            ReplyKind::Error => {
                let message = error_body(&text).trim_end_matches(is_blank);
                Response::Error(message.to_string())
            }
            ReplyKind::Ok => {
                let rest = ok_body(&text);
                Response::Ok((!rest.is_empty()).then(|| rest.to_string()))
            }
            ReplyKind::Legacy => Response::Legacy(text.trim_end_matches('\n').to_string()),
        }
    }

    pub fn kind(&self) -> ReplyKind {
        match self {
            Response::Error(_) => ReplyKind::Error,
            Response::Ok(_) => ReplyKind::Ok,
            Response::Legacy(_) => ReplyKind::Legacy,
        }
    }

    pub fn exit_code(&self) -> ExitCode {
        self.kind().exit_code()
    }

    /// Render the stdout part of the reply. `Error` writes nothing here.
    pub fn write_to<W: Write>(&self, out: &mut W) -> io::Result<()> {
        match self {
            Response::Ok(Some(text)) => out.write_all(text.as_bytes())?,
            Response::Legacy(text) if !text.is_empty() => writeln!(out, "{text}")?,
            Response::Error(_) | Response::Ok(None) | Response::Legacy(_) => {}
        }
        out.flush()
    }
}

/// Text after `ERROR:` and at most one following space.
fn error_body(text: &str) -> &str {
    let rest = &text[ERROR_PREFIX.len()..];
    rest.strip_prefix(' ').unwrap_or(rest)
}

/// Text after `OK` with the blank run that follows it skipped.
fn ok_body(text: &str) -> &str {
    text[OK_PREFIX.len()..].trim_start_matches(is_blank)
}

/// Renders a reply too large to buffer, as it arrives.
///
/// The retained head decides the envelope; everything after it is copied to
/// the matching stream untouched.
pub struct Passthrough<O, E> {
    out: O,
    err: E,
    kind: Option<ReplyKind>,
    pending_ok_blanks: bool,
}

impl<O: Write, E: Write> Passthrough<O, E> {
    pub fn new(out: O, err: E) -> Self {
        Self {
            out,
            err,
            kind: None,
            pending_ok_blanks: false,
        }
    }

    /// Envelope of the streamed reply, once streaming has started.
    pub fn kind(&self) -> Option<ReplyKind> {
        self.kind
    }

    pub fn feed(&mut self, event: Overflow<'_>) -> io::Result<()> {
        match event {
            Overflow::Started { head } => self.start(head),
            Overflow::Chunk(bytes) => self.forward(bytes),
        }
    }

    fn start(&mut self, head: &[u8]) -> io::Result<()> {
        let kind = ReplyKind::of(head);
        self.kind = Some(kind);
        match kind {
            ReplyKind::Error => {
                let rest = &head[ERROR_PREFIX.len()..];
                let rest = rest.strip_prefix(b" ").unwrap_or(rest);
                self.err.write_all(b"Error: ")?;
                self.err.write_all(rest)?;
            }
            ReplyKind::Ok => {
                let rest = skip_blanks(&head[OK_PREFIX.len()..]);
                // Blank run may continue into the next chunk.
                self.pending_ok_blanks = rest.is_empty();
                self.out.write_all(rest)?;
            }
            ReplyKind::Legacy => self.out.write_all(head)?,
        }
        Ok(())
    }

    fn forward(&mut self, bytes: &[u8]) -> io::Result<()> {
        match self.kind {
            Some(ReplyKind::Error) => self.err.write_all(bytes),
            Some(ReplyKind::Ok) if self.pending_ok_blanks => {
                let rest = skip_blanks(bytes);
                self.pending_ok_blanks = rest.is_empty();
                self.out.write_all(rest)
            }
            Some(_) => self.out.write_all(bytes),
            None => Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "reply chunk before stream start",
            )),
        }
    }

    pub fn finish(mut self) -> io::Result<ExitCode> {
        self.out.flush()?;
        self.err.flush()?;
        Ok(self.kind.map_or(ExitCode::Success, ReplyKind::exit_code))
    }
}

fn skip_blanks(bytes: &[u8]) -> &[u8] {
    let start = bytes
        .iter()
        .position(|b| *b != b' ' && *b != b'\n')
        .unwrap_or(bytes.len());
    &bytes[start..]
}
