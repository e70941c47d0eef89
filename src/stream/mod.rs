//! Reassembly of child output into lines.
//!
//! Each channel has a bounded [`LineBuffer`]. A line is complete when the
//! last byte appended is `\r` or `\n`, or when the buffer reaches
//! `capacity - 1` bytes without one (a forced flush). The terminator stays on
//! the line so templates see the child's output unchanged.

use std::fmt;
use tracing::debug;

/// Default per-channel capacity in bytes.
pub const DEFAULT_CAPACITY: usize = 1024;

/// Which child stream a line came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    /// Child stdout, read from the pseudoterminal.
    Stdout,
    /// Child stderr, read from a pipe.
    Stderr,
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Channel::Stdout => write!(f, "stdout"),
            Channel::Stderr => write!(f, "stderr"),
        }
    }
}

/// A complete line of child output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedLine {
    pub channel: Channel,
    /// Raw bytes, including the terminator if there was one.
    pub bytes: Vec<u8>,
}

/// Bounded byte accumulator for one channel.
#[derive(Debug)]
pub struct LineBuffer {
    bytes: Vec<u8>,
    capacity: usize,
}

impl LineBuffer {
    /// Create a buffer that flushes at `capacity - 1` bytes.
    ///
    /// Capacities below 2 are raised to 2 so every line holds at least one byte.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(2);
        Self {
            bytes: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Append one byte.
    pub fn append(&mut self, byte: u8) {
        debug_assert!(!self.is_full(), "take_line must run before the buffer overflows");
        self.bytes.push(byte);
    }

    /// True if the most recent byte ends a line.
    pub fn has_line_terminator(&self) -> bool {
        matches!(self.bytes.last(), Some(b'\r' | b'\n'))
    }

    /// True once the buffer must be flushed without a terminator.
    pub fn is_full(&self) -> bool {
        self.bytes.len() >= self.capacity - 1
    }

    /// True if nothing is buffered.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Number of buffered bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Remove and return the buffered bytes, leaving the buffer empty.
    pub fn take_line(&mut self) -> Vec<u8> {
        std::mem::replace(&mut self.bytes, Vec::with_capacity(self.capacity))
    }
}

impl Default for LineBuffer {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

/// Line buffers for both child channels.
#[derive(Debug, Default)]
pub struct Reassembler {
    stdout: LineBuffer,
    stderr: LineBuffer,
}

impl Reassembler {
    /// Create a reassembler whose buffers have the given capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            stdout: LineBuffer::with_capacity(capacity),
            stderr: LineBuffer::with_capacity(capacity),
        }
    }

    fn buffer(&mut self, channel: Channel) -> &mut LineBuffer {
        match channel {
            Channel::Stdout => &mut self.stdout,
            Channel::Stderr => &mut self.stderr,
        }
    }

    /// Feed bytes read from `channel`, returning every line they complete.
    pub fn feed(&mut self, channel: Channel, bytes: &[u8]) -> Vec<CompletedLine> {
        let buffer = self.buffer(channel);
        let mut lines = Vec::new();

        for &byte in bytes {
            buffer.append(byte);
            let terminated = buffer.has_line_terminator();
            if terminated || buffer.is_full() {
                if !terminated {
                    debug!(%channel, len = buffer.len(), "forced flush of unterminated line");
                }
                lines.push(CompletedLine {
                    channel,
                    bytes: buffer.take_line(),
                });
            }
        }

        lines
    }

    /// Flush whatever is left on `channel` once it has closed.
    pub fn finish(&mut self, channel: Channel) -> Option<CompletedLine> {
        let buffer = self.buffer(channel);
        if buffer.is_empty() {
            return None;
        }
        Some(CompletedLine {
            channel,
            bytes: buffer.take_line(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(lines: &[CompletedLine]) -> Vec<&[u8]> {
        lines.iter().map(|l| l.bytes.as_slice()).collect()
    }

    #[test]
    fn line_buffer_operations() {
        let mut buffer = LineBuffer::with_capacity(8);
        assert!(buffer.is_empty());
        buffer.append(b'a');
        assert!(!buffer.has_line_terminator());
        buffer.append(b'\r');
        assert!(buffer.has_line_terminator());
        assert_eq!(buffer.len(), 2);
        assert_eq!(buffer.take_line(), b"a\r");
        assert!(buffer.is_empty());
    }

    #[test]
    fn line_buffer_is_full_at_capacity_minus_one() {
        let mut buffer = LineBuffer::with_capacity(4);
        buffer.append(b'a');
        buffer.append(b'b');
        assert!(!buffer.is_full());
        buffer.append(b'c');
        assert!(buffer.is_full());
    }

    #[test]
    fn splits_on_newline_and_carriage_return() {
        let mut reassembler = Reassembler::default();
        let lines = reassembler.feed(Channel::Stdout, b"one\ntwo\rthree");
        assert_eq!(texts(&lines), [&b"one\n"[..], b"two\r"]);
        assert!(lines.iter().all(|l| l.channel == Channel::Stdout));

        let rest = reassembler.finish(Channel::Stdout).unwrap();
        assert_eq!(rest.bytes, b"three");
        assert!(reassembler.finish(Channel::Stdout).is_none());
    }

    #[test]
    fn crlf_produces_a_separate_bare_newline() {
        let mut reassembler = Reassembler::default();
        let lines = reassembler.feed(Channel::Stdout, b"hello\r\n");
        assert_eq!(texts(&lines), [&b"hello\r"[..], b"\n"]);
    }

    #[test]
    fn n_terminators_yield_n_lines_plus_final_flush() {
        let mut reassembler = Reassembler::default();
        let input = b"a\nbb\rccc\ndddd\n\nremainder";
        let mut lines = Vec::new();
        // One byte per call, as the supervisor reads.
        for byte in input {
            lines.extend(reassembler.feed(Channel::Stderr, std::slice::from_ref(byte)));
        }
        assert_eq!(lines.len(), 5);
        let last = reassembler.finish(Channel::Stderr).unwrap();
        assert_eq!(last.bytes, b"remainder");
    }

    #[test]
    fn forced_flush_at_capacity_minus_one() {
        let mut reassembler = Reassembler::with_capacity(16);
        let input = vec![b'x'; 40];
        let lines = reassembler.feed(Channel::Stdout, &input);
        assert_eq!(lines.len(), 2);
        assert!(lines.iter().all(|l| l.bytes.len() == 15));
        assert_eq!(reassembler.finish(Channel::Stdout).unwrap().bytes.len(), 10);
    }

    #[test]
    fn default_capacity_flushes_at_1023_bytes() {
        let mut reassembler = Reassembler::default();
        let lines = reassembler.feed(Channel::Stdout, &vec![b'y'; DEFAULT_CAPACITY]);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].bytes.len(), DEFAULT_CAPACITY - 1);
    }

    #[test]
    fn channels_are_buffered_independently() {
        let mut reassembler = Reassembler::default();
        assert!(reassembler.feed(Channel::Stdout, b"out-").is_empty());
        assert!(reassembler.feed(Channel::Stderr, b"err-").is_empty());

        let out = reassembler.feed(Channel::Stdout, b"line\n");
        assert_eq!(out[0].bytes, b"out-line\n");

        let err = reassembler.finish(Channel::Stderr).unwrap();
        assert_eq!(err.channel, Channel::Stderr);
        assert_eq!(err.bytes, b"err-");
    }
}
