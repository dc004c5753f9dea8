//! I/O module for block-buffered byte transfer.
//!
//! Provides `BlockReadCursor` and `BlockWriteSink`, which move single bytes
//! between generic iterator code and a borrowed resource while talking to
//! the resource one block at a time.

/// In-memory resource that supports push-back.
pub mod memory_stream;
pub mod read_cursor;
/// Block-transfer traits implemented by resources.
pub mod transfer;
pub mod write_sink;

pub use memory_stream::MemoryStream;
pub use read_cursor::{
    BlockReadCursor,
    CapturedValue,
    EndMarker,
};
pub use transfer::{
    BlockRead,
    BlockWrite,
};
pub use write_sink::BlockWriteSink;
