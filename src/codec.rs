//! Big-endian wire framing primitives.
//!
//! Every multi-byte integer on the wire is big-endian; this module is the
//! only place that does endian conversion. Reads used by the receive path
//! spin until the requested byte count is satisfied, matching the "blocking,
//! spin-until-complete" contract of the original implementation rather than
//! a single `read()` call.

use std::io::{self, Read, Write};

use crate::error::{Result, VncError};

/// Reads exactly `buf.len()` bytes, retrying short reads, and distinguishing
/// a clean EOF (returns `Ok(bytes_read)` less than requested) from a
/// transport error.
///
/// Unlike `std::io::Read::read_exact`, a short read caused by peer close is
/// reported as [`VncError::Disconnected`] rather than panicking the
/// distinction away — the receive loop needs to tell "closed cleanly between
/// messages" apart from "I/O failure".
pub fn read_full<R: Read + ?Sized>(reader: &mut R, buf: &mut [u8]) -> Result<()> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => return Err(VncError::Disconnected),
            Ok(n) => filled += n,
            Err(ref e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(VncError::Io(e)),
        }
    }
    Ok(())
}

/// Writes the entire buffer as a single logical block; a partial write is
/// treated as a transport error.
pub fn write_full<W: Write + ?Sized>(writer: &mut W, buf: &[u8]) -> Result<()> {
    writer.write_all(buf).map_err(VncError::Io)
}

/// A growable scratch buffer for staging variable-length reads.
///
/// Exclusively owned by the receive side. `assure` grows the buffer in
/// place and never shrinks it within a connection's lifetime; contents are
/// not required to survive a grow, since every caller immediately
/// overwrites what it reads into.
pub struct StagingBuffer {
    data: Vec<u8>,
}

const INITIAL_CAPACITY: usize = 64;

impl StagingBuffer {
    pub fn new() -> Self {
        StagingBuffer {
            data: vec![0; INITIAL_CAPACITY],
        }
    }

    /// Ensures the buffer holds at least `n` bytes, growing in place.
    ///
    /// Takes `&mut self`: a known bug in the lineage this crate is modeled
    /// on resizes a by-value copy of the buffer, so the staging buffer never
    /// actually grows. Mutating the owning buffer directly fixes that.
    pub fn assure(&mut self, n: usize) {
        if n > self.data.len() {
            self.data.resize(n, 0);
        }
    }

    pub fn as_mut_slice(&mut self, n: usize) -> &mut [u8] {
        self.assure(n);
        &mut self.data[..n]
    }
}

impl Default for StagingBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn staging_buffer_grows_in_place() {
        let mut buf = StagingBuffer::new();
        assert_eq!(buf.as_mut_slice(8).len(), 8);
        buf.assure(256);
        assert_eq!(buf.as_mut_slice(256).len(), 256);
    }

    #[test]
    fn read_full_reports_clean_disconnect() {
        let mut cursor = Cursor::new(vec![1u8, 2, 3]);
        let mut buf = [0u8; 8];
        let err = read_full(&mut cursor, &mut buf).unwrap_err();
        assert!(matches!(err, VncError::Disconnected));
    }

    #[test]
    fn read_full_succeeds_on_exact_bytes() {
        let mut cursor = Cursor::new(vec![1u8, 2, 3, 4]);
        let mut buf = [0u8; 4];
        read_full(&mut cursor, &mut buf).unwrap();
        assert_eq!(buf, [1, 2, 3, 4]);
    }
}
