//! Cursor over a fixed-size output buffer
//!
//! ```text
//! ┌──────────────── capacity ────────────────┐
//! │ written text │ free space      │ reserved │
//! └──────────────┴─────────────────┴──────────┘
//!                ^ cursor
//! ```
//!
//! With [`Reserve::Terminator`] the last byte is never handed out, so a write
//! whose total length reaches the capacity fails. That is the `snprintf`
//! contract (`length >= capacity` is truncation) the signaling wire builders
//! are tested against.

use std::fmt;

use crate::{CapacityError, Result};

/// How many trailing bytes of the buffer are kept out of reach
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Reserve {
    /// The whole buffer may be filled
    #[default]
    None,
    /// One slot is kept back, as if for a NUL terminator
    Terminator,
}

impl Reserve {
    fn bytes(self) -> usize {
        match self {
            Reserve::None => 0,
            Reserve::Terminator => 1,
        }
    }
}

/// Appends text to a borrowed byte buffer, failing instead of truncating
///
/// Once a write has overflowed the writer is poisoned: every later write
/// fails too, and the content written so far must not be used.
#[derive(Debug)]
pub struct BoundedWriter<'a> {
    buf: &'a mut [u8],
    len: usize,
    reserve: Reserve,
    overflowed: bool,
}

impl<'a> BoundedWriter<'a> {
    /// Create a writer that may fill `buf` completely
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self::with_reserve(buf, Reserve::None)
    }

    /// Create a writer with `snprintf` semantics (one slot reserved)
    pub fn with_terminator(buf: &'a mut [u8]) -> Self {
        Self::with_reserve(buf, Reserve::Terminator)
    }

    pub fn with_reserve(buf: &'a mut [u8], reserve: Reserve) -> Self {
        Self {
            buf,
            len: 0,
            reserve,
            overflowed: false,
        }
    }

    /// Size of the underlying buffer
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Bytes written so far
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Bytes that can still be written
    pub fn remaining(&self) -> usize {
        self.buf
            .len()
            .saturating_sub(self.len + self.reserve.bytes())
    }

    /// Append a string slice
    pub fn put_str(&mut self, s: &str) -> Result<()> {
        let mut sink = Sink::new(self);
        fmt::Write::write_str(&mut sink, s).ok();
        sink.finish()
    }

    /// Append formatted text, e.g. `w.put_fmt(format_args!("v={}", 0))`
    pub fn put_fmt(&mut self, args: fmt::Arguments<'_>) -> Result<()> {
        let mut sink = Sink::new(self);
        fmt::Write::write_fmt(&mut sink, args).ok();
        sink.finish()
    }

    /// The text written so far
    pub fn as_str(&self) -> &str {
        // Only whole `&str` pieces are ever copied in, so the prefix is UTF-8.
        std::str::from_utf8(&self.buf[..self.len]).unwrap_or_default()
    }

    /// Consume the writer and return the number of bytes written
    pub fn finish(self) -> usize {
        self.len
    }

    fn error(&self, needed: usize) -> CapacityError {
        CapacityError {
            needed: needed + self.reserve.bytes(),
            capacity: self.buf.len(),
        }
    }
}

/// `fmt::Write` adapter that keeps counting after an overflow so the error
/// can report the full size the write needed.
struct Sink<'w, 'a> {
    writer: &'w mut BoundedWriter<'a>,
    needed: usize,
}

impl<'w, 'a> Sink<'w, 'a> {
    fn new(writer: &'w mut BoundedWriter<'a>) -> Self {
        let needed = writer.len;
        Self { writer, needed }
    }

    fn finish(self) -> Result<()> {
        if self.writer.overflowed {
            return Err(self.writer.error(self.needed));
        }
        Ok(())
    }
}

impl fmt::Write for Sink<'_, '_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.needed += s.len();
        if self.writer.overflowed {
            return Ok(());
        }

        let end = self.writer.len + s.len();
        if end + self.writer.reserve.bytes() > self.writer.buf.len() {
            self.writer.overflowed = true;
            return Ok(());
        }

        self.writer.buf[self.writer.len..end].copy_from_slice(s.as_bytes());
        self.writer.len = end;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_fit_without_reserve() {
        let mut buf = [0u8; 5];
        let mut w = BoundedWriter::new(&mut buf);
        w.put_str("v=0\r\n").unwrap();
        assert_eq!(w.remaining(), 0);
        assert_eq!(w.finish(), 5);
        assert_eq!(&buf, b"v=0\r\n");
    }

    #[test]
    fn test_terminator_rejects_exact_fit() {
        let mut buf = [0u8; 5];
        let mut w = BoundedWriter::with_terminator(&mut buf);
        let err = w.put_str("hello").unwrap_err();
        assert_eq!(err.needed, 6);
        assert_eq!(err.capacity, 5);

        let mut buf = [0u8; 6];
        let mut w = BoundedWriter::with_terminator(&mut buf);
        w.put_str("hello").unwrap();
        assert_eq!(w.as_str(), "hello");
    }

    #[test]
    fn test_fmt_reports_full_needed_length() {
        let mut buf = [0u8; 8];
        let mut w = BoundedWriter::new(&mut buf);
        w.put_str("t=").unwrap();
        let err = w
            .put_fmt(format_args!("{} {}\r\n", 3_034_423_619u64, 0))
            .unwrap_err();
        assert_eq!(err.needed, 2 + 10 + 1 + 1 + 2);
    }

    #[test]
    fn test_poisoned_after_overflow() {
        let mut buf = [0u8; 4];
        let mut w = BoundedWriter::new(&mut buf);
        assert!(w.put_str("too long").is_err());
        assert!(w.put_str("ok").is_err());
    }
}
