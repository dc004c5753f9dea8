pub mod error;
pub mod io;
pub mod options;

pub use error::{
    Error,
    Result,
};
pub use io::{
    BlockRead,
    BlockReadCursor,
    BlockWrite,
    BlockWriteSink,
    CapturedValue,
    EndMarker,
    MemoryStream,
};
pub use options::{
    CursorOptions,
    DEFAULT_BLOCK_SIZE,
};
