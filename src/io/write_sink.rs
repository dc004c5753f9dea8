//! Block-buffered byte sink over a borrowed writable resource.
//!
//! Bytes are staged in an `N`-byte buffer and written to the resource when
//! the buffer fills, when [`BlockWriteSink::flush_now`] is called and when the
//! sink is dropped. A flush that is not fully accepted sets a sticky failure
//! flag; callers check [`BlockWriteSink::is_failed`] once their copy loop is
//! done.

use super::transfer::BlockWrite;
use crate::{
    options::DEFAULT_BLOCK_SIZE,
    Error,
    Result,
};
use std::fmt;
use tracing::{
    trace,
    warn,
};

/// Output sink writing bytes to `W` in blocks of `N`
pub struct BlockWriteSink<
    'a,
    W: BlockWrite + ?Sized,
    const N: usize = DEFAULT_BLOCK_SIZE,
> {
    buffer: [u8; N],
    used: usize,
    resource: Option<&'a mut W>,
    failed: bool,
}

impl<'a, W: BlockWrite + ?Sized> BlockWriteSink<'a, W> {
    /// Create a sink with the default block size
    pub fn new(resource: &'a mut W) -> Self {
        Self::from_resource(resource)
    }
}

impl<'a, W: BlockWrite + ?Sized, const N: usize> BlockWriteSink<'a, W, N> {
    const NON_EMPTY_BLOCK: () = assert!(N > 0, "block size must be positive");

    pub fn from_resource(resource: &'a mut W) -> Self {
        Self::with_parts(Some(resource), false)
    }

    /// Create a sink without a resource. Every assigned byte marks it failed.
    pub fn detached() -> Self {
        Self::with_parts(None, false)
    }

    fn with_parts(resource: Option<&'a mut W>, failed: bool) -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::NON_EMPTY_BLOCK;

        Self { buffer: [0; N], used: 0, resource, failed }
    }

    /// Stage a byte, flushing the block once it is full
    pub fn put(&mut self, byte: u8) {
        self.buffer[self.used] = byte;
        self.used += 1;

        if self.used == N {
            // Failure is recorded in the sticky flag
            let _ = self.flush_now();
        }
    }

    /// Stage a byte unless the sink is detached or has already failed
    pub fn assign(&mut self, byte: u8) {
        if self.resource.is_none() || self.failed {
            self.failed = true;
            return;
        }
        self.put(byte);
    }

    pub fn is_failed(&self) -> bool {
        self.failed
    }

    /// Number of bytes staged but not yet written
    pub fn staged(&self) -> usize {
        self.used
    }

    pub fn capacity(&self) -> usize {
        N
    }

    /// Write every staged byte to the resource now.
    ///
    /// The buffer is cleared whether or not the write succeeds. A failed
    /// write sets the sticky failure flag and returns the reason.
    pub fn flush_now(&mut self) -> Result<()> {
        if self.used == 0 {
            return Ok(());
        }

        let staged = self.used;
        self.used = 0;

        let Some(resource) = self.resource.as_deref_mut() else {
            self.failed = true;
            warn!("Dropping {} staged bytes: sink has no resource", staged);
            return Err(Error::Detached);
        };

        match resource.write_block(&self.buffer[..staged]) {
            Ok(accepted) if accepted == staged => {
                trace!("Flushed block of {} bytes (capacity {})", staged, N);
                Ok(())
            }
            Ok(accepted) => {
                self.failed = true;
                warn!(
                    "Short block write: {} of {} bytes accepted",
                    accepted, staged
                );
                Err(Error::ShortWrite { staged, accepted })
            }
            Err(e) => {
                self.failed = true;
                warn!("Block write of {} bytes failed: {}", staged, e);
                Err(Error::Io(e))
            }
        }
    }

    /// Flush this sink and hand out a second sink on the same resource.
    ///
    /// The new sink starts empty and inherits the failure flag. This sink
    /// cannot be used until the new one is dropped, so at most one buffer
    /// holds unflushed bytes for the resource.
    pub fn reborrow(&mut self) -> BlockWriteSink<'_, W, N> {
        let _ = self.flush_now();
        BlockWriteSink::with_parts(self.resource.as_deref_mut(), self.failed)
    }
}

impl<W: BlockWrite + ?Sized, const N: usize> Drop for BlockWriteSink<'_, W, N> {
    fn drop(&mut self) {
        // Best effort, failures are logged by flush_now
        let _ = self.flush_now();
    }
}

impl<W: BlockWrite + ?Sized, const N: usize> Extend<u8>
    for BlockWriteSink<'_, W, N>
{
    fn extend<I: IntoIterator<Item = u8>>(&mut self, iter: I) {
        for byte in iter {
            self.assign(byte);
        }
    }
}

impl<'b, W: BlockWrite + ?Sized, const N: usize> Extend<&'b u8>
    for BlockWriteSink<'_, W, N>
{
    fn extend<I: IntoIterator<Item = &'b u8>>(&mut self, iter: I) {
        for &byte in iter {
            self.assign(byte);
        }
    }
}

impl<W: BlockWrite + ?Sized, const N: usize> std::io::Write
    for BlockWriteSink<'_, W, N>
{
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        if self.resource.is_none() {
            self.failed = true;
            return Err(Error::Detached.into());
        }
        if self.failed {
            return Err(Error::SinkFailed.into());
        }

        // Stop at the byte whose flush failed; nothing after it is staged
        for (index, &byte) in buf.iter().enumerate() {
            self.put(byte);
            if self.failed {
                return Ok(index + 1);
            }
        }

        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flush_now()?;
        if let Some(resource) = self.resource.as_deref_mut() {
            resource.flush_resource()?;
        }
        Ok(())
    }
}

impl<W: BlockWrite + ?Sized, const N: usize> fmt::Debug
    for BlockWriteSink<'_, W, N>
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlockWriteSink")
            .field("capacity", &N)
            .field("used", &self.used)
            .field("attached", &self.resource.is_some())
            .field("failed", &self.failed)
            .finish()
    }
}
