//! Block-buffered byte cursor over a borrowed readable resource.
//!
//! The cursor pulls `N` bytes at a time into an internal buffer and hands
//! them out one by one. A block read that returns fewer than `N` bytes marks
//! the final block; once that block is consumed the cursor is exhausted and
//! compares equal to [`EndMarker`] and to any other exhausted cursor.
//!
//! A short read caused by an I/O error ends the sequence the same way a
//! natural end of data does. The error is kept and can be inspected with
//! [`BlockReadCursor::take_error`].

use super::transfer::BlockRead;
use crate::options::{
    CursorOptions,
    DEFAULT_BLOCK_SIZE,
};
use std::fmt;
use std::iter::FusedIterator;
use tracing::{
    debug,
    trace,
};

/// Sentinel compared against a cursor to detect the end of data
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct EndMarker;

/// Byte captured by [`BlockReadCursor::advance_and_capture`] before the
/// cursor moved on.
///
/// Advancing may refill the buffer and overwrite the slot the byte came
/// from, so the capture holds its own copy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CapturedValue {
    value: u8,
    block_offset: usize,
    stream_offset: u64,
}

impl CapturedValue {
    /// The byte that was current before the cursor advanced
    pub fn value(&self) -> u8 {
        self.value
    }

    /// Offset of the byte inside the block it was read with
    pub fn block_offset(&self) -> usize {
        self.block_offset
    }

    /// Offset of the byte from the first byte the cursor delivered
    pub fn stream_offset(&self) -> u64 {
        self.stream_offset
    }
}

impl std::ops::Deref for CapturedValue {
    type Target = u8;

    fn deref(&self) -> &u8 {
        &self.value
    }
}

impl From<CapturedValue> for u8 {
    fn from(captured: CapturedValue) -> Self {
        captured.value
    }
}

/// Input cursor reading bytes from `R` in blocks of `N`
pub struct BlockReadCursor<
    'a,
    R: BlockRead + ?Sized,
    const N: usize = DEFAULT_BLOCK_SIZE,
> {
    buffer: [u8; N],
    fill_len: usize,
    pos: usize,
    /// `None` once exhausted
    resource: Option<&'a mut R>,
    /// The block in `buffer` is the last one the resource will produce
    final_block: bool,
    consumed: u64,
    options: CursorOptions,
    error: Option<std::io::Error>,
}

impl<'a, R: BlockRead + ?Sized> BlockReadCursor<'a, R> {
    /// Create a cursor with the default block size and read the first block
    pub fn new(resource: &'a mut R) -> Self {
        Self::from_resource(resource)
    }
}

impl<'a, R: BlockRead + ?Sized, const N: usize> BlockReadCursor<'a, R, N> {
    const NON_EMPTY_BLOCK: () = assert!(N > 0, "block size must be positive");

    /// Create a cursor and read the first block
    pub fn from_resource(resource: &'a mut R) -> Self {
        Self::with_options(resource, CursorOptions::default())
    }

    pub fn with_options(resource: &'a mut R, options: CursorOptions) -> Self {
        let mut cursor = Self::detached(options);
        cursor.resource = Some(resource);
        cursor.refill();
        cursor
    }

    /// Create an exhausted cursor, usable as the end of any sequence
    pub fn end() -> Self {
        Self::detached(CursorOptions::default())
    }

    fn detached(options: CursorOptions) -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::NON_EMPTY_BLOCK;

        Self {
            buffer: [0; N],
            fill_len: 0,
            pos: 0,
            resource: None,
            final_block: false,
            consumed: 0,
            options,
            error: None,
        }
    }

    /// Byte at the current position, `None` once exhausted
    pub fn current(&self) -> Option<u8> {
        self.resource.as_ref().map(|_| self.buffer[self.pos])
    }

    /// Step to the next byte, reading a new block when the buffer runs out.
    /// Does nothing once exhausted.
    pub fn advance(&mut self) -> &mut Self {
        if self.resource.is_some() {
            self.pos += 1;
            self.consumed += 1;

            if self.pos >= self.fill_len {
                self.refill();
            }
        }
        self
    }

    /// Capture the current byte, then advance
    pub fn advance_and_capture(&mut self) -> Option<CapturedValue> {
        let value = self.current()?;
        let captured = CapturedValue {
            value,
            block_offset: self.pos,
            stream_offset: self.consumed,
        };
        self.advance();
        Some(captured)
    }

    pub fn is_end(&self) -> bool {
        self.resource.is_none()
    }

    /// Number of bytes delivered so far
    pub fn position(&self) -> u64 {
        self.consumed
    }

    /// Bytes read from the resource but not yet delivered
    pub fn buffered(&self) -> usize {
        self.fill_len - self.pos
    }

    /// Block capacity
    pub fn capacity(&self) -> usize {
        N
    }

    /// Take the I/O error that ended the sequence, if there was one.
    ///
    /// Only errors from a block read that produced no bytes are kept. An
    /// error after part of a block was read shows up as a short final
    /// block, the same as end of data.
    pub fn take_error(&mut self) -> Option<std::io::Error> {
        self.error.take()
    }

    fn refill(&mut self) {
        self.pos = 0;
        self.fill_len = 0;

        if self.final_block {
            self.finish();
            return;
        }

        let Some(resource) = self.resource.as_deref_mut() else {
            return;
        };

        match resource.read_block(&mut self.buffer) {
            Ok(n) => self.fill_len = n.min(N),
            Err(e) => {
                debug!("Block read failed, treating as end of data: {}", e);
                self.error = Some(e);
            }
        }

        trace!("Read block of {} bytes (capacity {})", self.fill_len, N);

        if self.fill_len < N {
            self.final_block = true;
        }
        if self.fill_len == 0 {
            self.finish();
        }
    }

    fn finish(&mut self) {
        self.resource = None;
        self.final_block = true;
        debug!("Cursor exhausted after {} bytes", self.consumed);
    }
}

impl<R: BlockRead + ?Sized, const N: usize> Default
    for BlockReadCursor<'_, R, N>
{
    fn default() -> Self {
        Self::end()
    }
}

impl<R: BlockRead + ?Sized, const N: usize> Drop for BlockReadCursor<'_, R, N> {
    fn drop(&mut self) {
        if !self.options.push_back {
            return;
        }
        let Some(resource) = self.resource.as_deref_mut() else {
            return;
        };

        let pending = &self.buffer[self.pos..self.fill_len];
        if pending.is_empty() {
            return;
        }

        if resource.unread(pending) {
            debug!("Returned {} unread bytes to resource", pending.len());
        } else {
            debug!(
                "Resource cannot take back {} unread bytes, dropping them",
                pending.len()
            );
        }
    }
}

impl<R: BlockRead + ?Sized, const N: usize> Iterator
    for BlockReadCursor<'_, R, N>
{
    type Item = u8;

    fn next(&mut self) -> Option<u8> {
        let value = self.current()?;
        self.advance();
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.is_end() {
            (0, Some(0))
        } else if self.final_block {
            (self.buffered(), Some(self.buffered()))
        } else {
            (self.buffered(), None)
        }
    }
}

impl<R: BlockRead + ?Sized, const N: usize> FusedIterator
    for BlockReadCursor<'_, R, N>
{
}

impl<'b, R: BlockRead + ?Sized, const N: usize>
    PartialEq<BlockReadCursor<'b, R, N>> for BlockReadCursor<'_, R, N>
{
    fn eq(&self, other: &BlockReadCursor<'b, R, N>) -> bool {
        self.is_end() == other.is_end()
    }
}

impl<R: BlockRead + ?Sized, const N: usize> PartialEq<EndMarker>
    for BlockReadCursor<'_, R, N>
{
    fn eq(&self, _other: &EndMarker) -> bool {
        self.is_end()
    }
}

impl<R: BlockRead + ?Sized, const N: usize>
    PartialEq<BlockReadCursor<'_, R, N>> for EndMarker
{
    fn eq(&self, other: &BlockReadCursor<'_, R, N>) -> bool {
        other.is_end()
    }
}

impl<R: BlockRead + ?Sized, const N: usize> fmt::Debug
    for BlockReadCursor<'_, R, N>
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlockReadCursor")
            .field("capacity", &N)
            .field("fill_len", &self.fill_len)
            .field("pos", &self.pos)
            .field("live", &self.resource.is_some())
            .field("final_block", &self.final_block)
            .field("consumed", &self.consumed)
            .finish()
    }
}
