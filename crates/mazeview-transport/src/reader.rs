use std::io::{ErrorKind, Read};

use bytes::{Buf, BytesMut};

use crate::error::{Result, TransportError};
use crate::traits::{LineEvent, LineSource};

const INITIAL_BUFFER_CAPACITY: usize = 1024;
const READ_CHUNK_SIZE: usize = 512;

/// Longest line kept in the buffer before it is flushed without a newline.
pub const DEFAULT_MAX_LINE_LENGTH: usize = 64 * 1024;

/// Result of a single read from the inner stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Fill {
    Data(usize),
    Pending,
    Eof,
}

/// Splits any `Read` stream into decoded text lines.
///
/// Lines end at `\n`; a stray `\r` on either side is trimmed away together
/// with other surrounding whitespace. Invalid UTF-8 is dropped, not replaced.
pub struct LineReader<T> {
    inner: T,
    buf: BytesMut,
    eof: bool,
    max_line_length: usize,
}

impl<T: Read> LineReader<T> {
    pub fn new(inner: T) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
            eof: false,
            max_line_length: DEFAULT_MAX_LINE_LENGTH,
        }
    }

    /// Override the longest line kept before a forced flush.
    pub fn with_max_line_length(mut self, max_line_length: usize) -> Self {
        self.max_line_length = max_line_length.max(1);
        self
    }

    /// Pop the next complete line already sitting in the buffer.
    pub fn next_buffered_line(&mut self) -> Option<String> {
        if let Some(pos) = self.buf.iter().position(|&b| b == b'\n') {
            let line = self.buf.split_to(pos);
            self.buf.advance(1);
            return Some(decode_line(&line));
        }

        if self.buf.len() >= self.max_line_length {
            tracing::warn!(
                len = self.buf.len(),
                max = self.max_line_length,
                "line exceeds maximum length, flushing without newline"
            );
            let line = self.buf.split_to(self.max_line_length);
            return Some(decode_line(&line));
        }

        None
    }

    /// Perform one read from the inner stream into the buffer.
    pub(crate) fn fill(&mut self) -> Result<Fill> {
        let mut chunk = [0u8; READ_CHUNK_SIZE];
        loop {
            return match self.inner.read(&mut chunk) {
                Ok(0) => Ok(Fill::Eof),
                Ok(n) => {
                    self.buf.extend_from_slice(&chunk[..n]);
                    Ok(Fill::Data(n))
                }
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err)
                    if err.kind() == ErrorKind::TimedOut || err.kind() == ErrorKind::WouldBlock =>
                {
                    Ok(Fill::Pending)
                }
                Err(err) => Err(TransportError::Io(err)),
            };
        }
    }

    /// Number of bytes buffered but not yet returned as a line.
    pub fn buffered_len(&self) -> usize {
        self.buf.len()
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the reader and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }
}

impl<T: Read> LineSource for LineReader<T> {
    /// Reads until a full line is available, the stream would block, or EOF.
    ///
    /// At EOF an unterminated trailing line is returned before `Closed`.
    fn poll_line(&mut self) -> Result<LineEvent> {
        loop {
            if let Some(line) = self.next_buffered_line() {
                return Ok(LineEvent::Line(line));
            }

            if self.eof {
                if self.buf.is_empty() {
                    return Ok(LineEvent::Closed);
                }
                let rest = self.buf.split();
                return Ok(LineEvent::Line(decode_line(&rest)));
            }

            match self.fill()? {
                Fill::Data(_) => continue,
                Fill::Pending => return Ok(LineEvent::Idle),
                Fill::Eof => self.eof = true,
            }
        }
    }
}

fn decode_line(bytes: &[u8]) -> String {
    let text: String = bytes.utf8_chunks().map(|chunk| chunk.valid()).collect();
    text.trim().to_string()
}
