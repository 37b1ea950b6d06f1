//! Newline-delimited line codec.
//!
//! Wire format:
//! ```text
//! ┌──────────────────────────┬────────────┐
//! │ ASCII text (≤ 63 bytes)  │ '\n' / '\r'│
//! └──────────────────────────┴────────────┘
//! ```
//!
//! The reader accumulates incoming bytes and yields complete lines.
//! A single `LinkPort::read` call may return part of a line or several
//! lines concatenated.  There is no framing, checksum or acknowledgment:
//! a line longer than the buffer is dropped whole, and the reader
//! resynchronises on the next terminator.

use core::fmt::{self, Write as _};

use heapless::String;
use log::warn;

use crate::error::LinkError;

/// Longest accepted line, excluding the terminator.
pub const MAX_LINE_LEN: usize = 64;

/// A complete, trimmed, non-empty line.
pub type Line = String<MAX_LINE_LEN>;

enum ReaderState {
    /// Collecting bytes of the current line.
    Collecting,
    /// Current line overflowed; skip to the next terminator.
    Discarding,
}

/// Streaming line reader.
pub struct LineReader {
    state: ReaderState,
    buf: heapless::Vec<u8, MAX_LINE_LEN>,
    dropped: u32,
}

impl LineReader {
    pub const fn new() -> Self {
        Self {
            state: ReaderState::Collecting,
            buf: heapless::Vec::new(),
            dropped: 0,
        }
    }

    /// Feed one byte.  Returns a line when a terminator completes one.
    ///
    /// Leading and trailing whitespace is trimmed; empty lines,
    /// oversized lines and lines that are not valid UTF-8 yield nothing.
    pub fn feed(&mut self, byte: u8) -> Option<Line> {
        let terminator = byte == b'\n' || byte == b'\r';

        match self.state {
            ReaderState::Discarding => {
                if terminator {
                    self.state = ReaderState::Collecting;
                }
                None
            }
            ReaderState::Collecting if terminator => {
                let line = Self::finish(&self.buf);
                if line.is_none() && !self.buf.is_empty() {
                    self.dropped = self.dropped.wrapping_add(1);
                }
                self.buf.clear();
                line.filter(|l| !l.is_empty())
            }
            ReaderState::Collecting => {
                if self.buf.push(byte).is_err() {
                    warn!("LINK: line exceeds {} bytes, discarded", MAX_LINE_LEN);
                    self.buf.clear();
                    self.dropped = self.dropped.wrapping_add(1);
                    self.state = ReaderState::Discarding;
                }
                None
            }
        }
    }

    fn finish(raw: &[u8]) -> Option<Line> {
        let Ok(text) = core::str::from_utf8(raw) else {
            warn!("LINK: non-UTF-8 line ({} bytes) discarded", raw.len());
            return None;
        };
        let mut line = Line::new();
        // Cannot fail: the trimmed text is no longer than the buffer.
        line.push_str(text.trim()).ok()?;
        Some(line)
    }

    /// Lines discarded for overflow or bad encoding (wraps).
    pub fn dropped(&self) -> u32 {
        self.dropped
    }

    /// Forget any partial line (e.g. after a link reset).
    pub fn reset(&mut self) {
        self.buf.clear();
        self.state = ReaderState::Collecting;
    }
}

impl Default for LineReader {
    fn default() -> Self {
        Self::new()
    }
}

/// Render `msg` followed by `'\n'` into a fixed buffer.
pub fn encode_line(msg: &impl fmt::Display) -> Result<Line, LinkError> {
    let mut out = Line::new();
    write!(out, "{msg}").map_err(|_| LinkError::LineTooLong)?;
    out.push('\n').map_err(|()| LinkError::LineTooLong)?;
    Ok(out)
}
