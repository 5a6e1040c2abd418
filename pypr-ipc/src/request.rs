use crate::error::ClientError;

/// Wire size limit for one request, newline terminator included.
pub const REQUEST_CAPACITY: usize = 1024;

/// One command frame: the words joined by spaces, then `\n`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    payload: String,
}

impl Request {
    /// Build the frame, rejecting empty or oversized commands before anything
    /// is sent.
    pub fn encode<I, S>(words: I) -> Result<Self, ClientError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut words = words.into_iter().peekable();
        if words.peek().is_none() {
            return Err(ClientError::NoCommand);
        }

        let mut payload = String::new();
        for (i, word) in words.enumerate() {
            if i > 0 {
                payload.push(' ');
            }
            payload.push_str(word.as_ref());
        }

        if payload.len() + 1 > REQUEST_CAPACITY {
            return Err(ClientError::RequestTooLong {
                len: payload.len(),
                max: REQUEST_CAPACITY - 1,
            });
        }

        payload.push('\n');
        Ok(Self { payload })
    }

    /// Command text without the terminator.
    pub fn command(&self) -> &str {
        self.payload.trim_end_matches('\n')
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.payload.as_bytes()
    }
}
