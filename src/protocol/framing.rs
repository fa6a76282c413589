//! Line framer for the text telemetry protocol
//!
//! Accumulates bytes until a line terminator (`\n` or `\r`) is received.
//! One framer exists per transport so partial lines never cross links.

use crate::config::protocol::LINE_CAPACITY;
use heapless::{Deque, Vec};

/// A complete line with its terminator stripped.
pub type Line = Vec<u8, LINE_CAPACITY>;

/// Returns true for bytes that end a line.
pub fn is_terminator(byte: u8) -> bool {
    byte == b'\n' || byte == b'\r'
}

/// Accumulates incoming bytes and extracts complete lines.
///
/// The buffer is a sliding window: once it holds `LINE_CAPACITY` bytes,
/// each new byte evicts the oldest one. An overlong line therefore loses
/// its beginning, never its end.
pub struct LineFramer {
    buffer: Deque<u8, LINE_CAPACITY>,
}

impl LineFramer {
    /// Create a new empty line framer.
    pub fn new() -> Self {
        Self {
            buffer: Deque::new(),
        }
    }

    /// Push a byte into the framer.
    ///
    /// Returns `Some(line)` when a terminator closes a non-empty line.
    /// Returns `None` if more bytes are needed or the line was empty.
    pub fn push(&mut self, byte: u8) -> Option<Line> {
        if is_terminator(byte) {
            if self.buffer.is_empty() {
                // Blank line or second half of "\r\n", ignore
                return None;
            }

            let line: Line = self.buffer.iter().copied().collect();
            self.buffer.clear();
            return Some(line);
        }

        if self.buffer.is_full() {
            self.buffer.pop_front();
        }
        // Cannot fail: a slot was freed above if needed
        let _ = self.buffer.push_back(byte);

        None
    }

    /// Feed a chunk of bytes, yielding complete lines lazily.
    ///
    /// Bytes past the last yielded line are only buffered once the iterator
    /// has been driven to the end, so callers should exhaust it.
    pub fn feed<'a>(&'a mut self, bytes: &'a [u8]) -> Lines<'a> {
        Lines {
            framer: self,
            bytes: bytes.iter(),
        }
    }

    /// Returns true if no partial line is in progress.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Returns the current number of buffered bytes.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }
}

impl Default for LineFramer {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over the lines completed by one [`LineFramer::feed`] call.
pub struct Lines<'a> {
    framer: &'a mut LineFramer,
    bytes: core::slice::Iter<'a, u8>,
}

impl Iterator for Lines<'_> {
    type Item = Line;

    fn next(&mut self) -> Option<Line> {
        for &byte in self.bytes.by_ref() {
            if let Some(line) = self.framer.push(byte) {
                return Some(line);
            }
        }
        None
    }
}
