//! Line framing for the serial byte stream
//!
//! Requests are text lines ended by `\n`, `\r` or `\r\n`:
//!
//! ```text
//! [ N bytes: request text ][ \r | \n | \r\n ]
//! ```
//!
//! Blank lines are skipped, so a CRLF pair never produces an empty request.

use bytes::{Buf, BytesMut};
use thiserror::Error;

/// Default longest accepted request line, terminator excluded
pub const DEFAULT_MAX_LINE: usize = 256;

/// Errors that can occur while splitting the stream into lines
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("Line too long (max: {0} bytes)")]
    LineTooLong(usize),

    #[error("Line is not valid UTF-8")]
    InvalidUtf8,
}

fn is_terminator(b: &u8) -> bool {
    *b == b'\n' || *b == b'\r'
}

/// Streaming line decoder
#[derive(Debug)]
pub struct LineDecoder {
    /// Bytes of the line being accumulated
    buffer: BytesMut,
    max_line: usize,
    /// Dropping the tail of an overlong line until its terminator
    discarding: bool,
}

impl Default for LineDecoder {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_LINE)
    }
}

impl LineDecoder {
    /// Create a decoder accepting lines of at most `max_line` bytes
    pub fn new(max_line: usize) -> Self {
        Self {
            buffer: BytesMut::with_capacity(max_line + 2),
            max_line,
            discarding: false,
        }
    }

    /// Add received bytes
    pub fn extend(&mut self, data: &[u8]) {
        self.buffer.extend_from_slice(data);
    }

    /// Try to take the next complete line.
    ///
    /// Call repeatedly until it returns `Ok(None)`. An overlong line is
    /// reported once and its remaining bytes are dropped.
    pub fn decode_next(&mut self) -> Result<Option<String>, CodecError> {
        loop {
            let Some(pos) = self.buffer.iter().position(is_terminator) else {
                if self.discarding {
                    self.buffer.clear();
                } else if self.buffer.len() > self.max_line {
                    self.buffer.clear();
                    self.discarding = true;
                    return Err(CodecError::LineTooLong(self.max_line));
                }
                return Ok(None);
            };

            let line = self.buffer.split_to(pos);
            self.buffer.advance(1);

            if self.discarding {
                self.discarding = false;
                continue;
            }
            if line.len() > self.max_line {
                return Err(CodecError::LineTooLong(self.max_line));
            }

            let text = std::str::from_utf8(&line).map_err(|_| CodecError::InvalidUtf8)?;
            if text.trim().is_empty() {
                continue;
            }
            return Ok(Some(text.to_string()));
        }
    }

    /// Bytes buffered but not yet returned as a line
    pub fn buffer_len(&self) -> usize {
        self.buffer.len()
    }
}
