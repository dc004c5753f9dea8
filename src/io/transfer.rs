//! Block-transfer primitives required from the underlying resource.
//!
//! Every [`std::io::Read`] is a [`BlockRead`] and every [`std::io::Write`] is
//! a [`BlockWrite`]; resources with extra abilities (such as taking bytes
//! back) implement the traits directly.

use std::io::{
    ErrorKind,
    Read,
    Write,
};
use tracing::debug;

/// Readable side of a resource
pub trait BlockRead {
    /// Fill as much of `buf` as possible and return the number of bytes
    /// read.
    ///
    /// Returning fewer than `buf.len()` bytes means the resource has no
    /// more data. An error is returned only when nothing was read; an error
    /// after partial progress is reported as a short count.
    fn read_block(&mut self, buf: &mut [u8]) -> std::io::Result<usize>;

    /// Return bytes that were read but never consumed.
    ///
    /// `bytes` are the most recently read bytes, in order. Returns `false`
    /// when the resource cannot take them back.
    fn unread(&mut self, bytes: &[u8]) -> bool {
        let _ = bytes;
        false
    }
}

/// Writable side of a resource
pub trait BlockWrite {
    /// Write as much of `buf` as possible and return the number of bytes
    /// accepted. Anything less than `buf.len()` is a failure.
    fn write_block(&mut self, buf: &[u8]) -> std::io::Result<usize>;

    /// Push accepted bytes through to their final destination
    fn flush_resource(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<R: Read + ?Sized> BlockRead for R {
    fn read_block(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let mut filled = 0;

        while filled < buf.len() {
            match self.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) if filled == 0 => return Err(e),
                Err(e) => {
                    debug!(
                        "Read failed after {} bytes, ending block: {}",
                        filled, e
                    );
                    break;
                }
            }
        }

        Ok(filled)
    }
}

impl<W: Write + ?Sized> BlockWrite for W {
    fn write_block(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let mut written = 0;

        while written < buf.len() {
            match self.write(&buf[written..]) {
                Ok(0) => break,
                Ok(n) => written += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) if written == 0 => return Err(e),
                Err(_) => break,
            }
        }

        Ok(written)
    }

    fn flush_resource(&mut self) -> std::io::Result<()> {
        self.flush()
    }
}
