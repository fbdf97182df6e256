//! Byte automaton that finds the boot executable's directory record.
//!
//! An ISO 9660 directory record for the boot executable ends with the bytes
//! `01 0D`, then the file identifier `SLUS_203.12`, then the version suffix
//! `;1`. The scanner walks raw image bytes once, never backtracks, and
//! discards all progress on any mismatch.

use crate::identifier::{Candidate, DOT_INDEX, ID_LEN, IdSource, SEPARATOR_INDEX, decode_lossy};

/// Directory-record bytes that precede the file identifier.
pub const ANCHOR: [u8; 2] = [0x01, 0x0D];

/// ISO 9660 version suffix (`;1`) that follows the file identifier.
pub const TERMINATOR: [u8; 2] = [0x3B, 0x31];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Matching the anchor; holds the number of anchor bytes matched.
    Anchor(usize),
    Group1,
    Separator1,
    Group2,
    Separator2,
    Group3,
    /// Matching the terminator; holds the number of terminator bytes matched.
    Terminator(usize),
    Accepted,
}

/// Incremental scanner state. Feed it chunks in file order.
#[derive(Debug, Clone)]
pub struct StreamScanner {
    state: State,
    buf: [u8; ID_LEN],
    len: usize,
}

impl Default for StreamScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl StreamScanner {
    pub fn new() -> Self {
        Self {
            state: State::Anchor(0),
            buf: [0u8; ID_LEN],
            len: 0,
        }
    }

    /// Returns true once a full identifier has been matched.
    pub fn is_accepted(&self) -> bool {
        self.state == State::Accepted
    }

    /// Advance the automaton by one byte. Returns true on acceptance.
    pub fn feed(&mut self, byte: u8) -> bool {
        let current = self.state;
        self.state = match current {
            State::Anchor(matched) => {
                if byte == ANCHOR[matched] {
                    if matched + 1 == ANCHOR.len() {
                        self.len = 0;
                        State::Group1
                    } else {
                        State::Anchor(matched + 1)
                    }
                } else {
                    // No overlap retry: a mismatching 0x01 does not restart the anchor.
                    self.reset()
                }
            }
            State::Group1 => self.capture(byte, SEPARATOR_INDEX, State::Separator1),
            State::Separator1 => self.separator(byte, b'_', State::Group2),
            State::Group2 => self.capture(byte, DOT_INDEX, State::Separator2),
            State::Separator2 => self.separator(byte, b'.', State::Group3),
            State::Group3 => self.capture(byte, ID_LEN, State::Terminator(0)),
            State::Terminator(matched) => {
                if byte == TERMINATOR[matched] {
                    if matched + 1 == TERMINATOR.len() {
                        State::Accepted
                    } else {
                        State::Terminator(matched + 1)
                    }
                } else {
                    self.reset()
                }
            }
            State::Accepted => State::Accepted,
        };
        self.is_accepted()
    }

    /// Feed a chunk. Returns the number of bytes consumed up to and
    /// including the accepting byte, or `None` if the chunk ended first.
    pub fn scan(&mut self, chunk: &[u8]) -> Option<usize> {
        if self.is_accepted() {
            return Some(0);
        }
        chunk
            .iter()
            .position(|&b| self.feed(b))
            .map(|pos| pos + 1)
    }

    /// The matched identifier, once accepted.
    pub fn candidate(&self) -> Option<Candidate> {
        if !self.is_accepted() {
            return None;
        }
        Some(Candidate::new(
            decode_lossy(&self.buf[..self.len]),
            IdSource::Stream,
            true,
        ))
    }

    fn capture(&mut self, byte: u8, group_end: usize, next: State) -> State {
        self.buf[self.len] = byte;
        self.len += 1;
        if self.len == group_end {
            next
        } else {
            self.state
        }
    }

    fn separator(&mut self, byte: u8, expected: u8, next: State) -> State {
        if byte == expected {
            self.buf[self.len] = byte;
            self.len += 1;
            next
        } else {
            self.reset()
        }
    }

    fn reset(&mut self) -> State {
        self.len = 0;
        State::Anchor(0)
    }
}

/// Scan a complete buffer for an embedded identifier.
pub fn scan_stream(data: &[u8]) -> Option<Candidate> {
    let mut scanner = StreamScanner::new();
    scanner.scan(data)?;
    scanner.candidate()
}

#[cfg(test)]
#[path = "tests/stream_tests.rs"]
mod tests;
