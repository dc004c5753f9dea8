//! Runtime options for block cursors.
//!
//! The block capacity itself is a const generic on
//! [`BlockReadCursor`](crate::io::BlockReadCursor) and
//! [`BlockWriteSink`](crate::io::BlockWriteSink); everything that can change
//! per instance lives here.

/// Default block capacity, sized to one cache line.
pub const DEFAULT_BLOCK_SIZE: usize = 64;

/// Options for a [`BlockReadCursor`](crate::io::BlockReadCursor)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CursorOptions {
    /// Hand unconsumed buffered bytes back to the resource when a live
    /// cursor is dropped.
    pub push_back: bool,
}

impl Default for CursorOptions {
    fn default() -> Self {
        Self { push_back: true }
    }
}

impl CursorOptions {
    /// Enable or disable returning unread bytes on drop
    pub fn with_push_back(mut self, enabled: bool) -> Self {
        self.push_back = enabled;
        self
    }
}
