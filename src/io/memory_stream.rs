//! In-memory resource with independent read and write ends.
//!
//! Writes append to the stored bytes, reads consume them from the front.
//! Unlike a plain [`std::io::Cursor`], a `MemoryStream` accepts unread bytes
//! back, so a dropped [`BlockReadCursor`](crate::io::BlockReadCursor) leaves
//! the read position exactly where the consumer stopped.

use super::transfer::{
    BlockRead,
    BlockWrite,
};
use bytes::{
    BufMut,
    Bytes,
    BytesMut,
};

#[derive(Debug, Default, Clone)]
pub struct MemoryStream {
    data: BytesMut,
    read_pos: usize,
    limit: Option<usize>,
}

impl MemoryStream {
    /// Create an empty, unbounded stream
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty stream that accepts at most `limit` bytes in total.
    /// Writes past the limit are short.
    pub fn bounded(limit: usize) -> Self {
        Self {
            data: BytesMut::with_capacity(limit),
            read_pos: 0,
            limit: Some(limit),
        }
    }

    /// Current read position
    pub fn position(&self) -> usize {
        self.read_pos
    }

    /// Total number of bytes stored, read or not
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Bytes not yet read
    pub fn remaining(&self) -> usize {
        self.data.len() - self.read_pos
    }

    /// Everything stored so far, including bytes already read
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Unread bytes
    pub fn unread_bytes(&self) -> &[u8] {
        &self.data[self.read_pos..]
    }

    /// Move the read position back to the start
    pub fn rewind(&mut self) {
        self.read_pos = 0;
    }

    pub fn into_bytes(self) -> Bytes {
        self.data.freeze()
    }
}

impl From<&[u8]> for MemoryStream {
    fn from(value: &[u8]) -> Self {
        Self { data: BytesMut::from(value), read_pos: 0, limit: None }
    }
}

impl From<&str> for MemoryStream {
    fn from(value: &str) -> Self {
        Self::from(value.as_bytes())
    }
}

impl From<Vec<u8>> for MemoryStream {
    fn from(value: Vec<u8>) -> Self {
        Self::from(&value[..])
    }
}

impl BlockRead for MemoryStream {
    fn read_block(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let n = buf.len().min(self.remaining());
        buf[..n].copy_from_slice(&self.data[self.read_pos..self.read_pos + n]);
        self.read_pos += n;
        Ok(n)
    }

    fn unread(&mut self, bytes: &[u8]) -> bool {
        if bytes.len() > self.read_pos {
            return false;
        }

        let start = self.read_pos - bytes.len();
        if &self.data[start..self.read_pos] != bytes {
            return false;
        }

        self.read_pos = start;
        true
    }
}

impl BlockWrite for MemoryStream {
    fn write_block(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let room = match self.limit {
            Some(limit) => limit.saturating_sub(self.data.len()),
            None => buf.len(),
        };
        let n = buf.len().min(room);
        self.data.put_slice(&buf[..n]);
        Ok(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_consumes_from_front() {
        let mut stream = MemoryStream::from("abcdef");
        let mut buf = [0u8; 4];

        assert_eq!(stream.read_block(&mut buf).unwrap(), 4);
        assert_eq!(&buf, b"abcd");
        assert_eq!(stream.position(), 4);
        assert_eq!(stream.remaining(), 2);

        assert_eq!(stream.read_block(&mut buf).unwrap(), 2);
        assert_eq!(&buf[..2], b"ef");
        assert_eq!(stream.read_block(&mut buf).unwrap(), 0);
    }

    #[test]
    fn test_unread_restores_position() {
        let mut stream = MemoryStream::from("abcdef");
        let mut buf = [0u8; 6];
        stream.read_block(&mut buf).unwrap();

        assert!(stream.unread(b"def"));
        assert_eq!(stream.position(), 3);
        assert_eq!(stream.unread_bytes(), b"def");
    }

    #[test]
    fn test_unread_rejects_foreign_bytes() {
        let mut stream = MemoryStream::from("abcdef");
        let mut buf = [0u8; 3];
        stream.read_block(&mut buf).unwrap();

        assert!(!stream.unread(b"xyz"));
        assert!(!stream.unread(b"zabc"));
        assert_eq!(stream.position(), 3);
    }

    #[test]
    fn test_write_appends_after_unread_data() {
        let mut stream = MemoryStream::from("ab");
        stream.write_block(b"cd").unwrap();
        assert_eq!(stream.as_bytes(), b"abcd");
        assert_eq!(stream.len(), 4);
        assert_eq!(stream.into_bytes(), Bytes::from_static(b"abcd"));
    }

    #[test]
    fn test_bounded_stream_short_write() {
        let mut stream = MemoryStream::bounded(5);
        assert_eq!(stream.write_block(b"abc").unwrap(), 3);
        assert_eq!(stream.write_block(b"defg").unwrap(), 2);
        assert_eq!(stream.write_block(b"h").unwrap(), 0);
        assert_eq!(stream.as_bytes(), b"abcde");
    }

    #[test]
    fn test_rewind() {
        let mut stream = MemoryStream::from(vec![1u8, 2, 3]);
        let mut buf = [0u8; 3];
        stream.read_block(&mut buf).unwrap();
        stream.rewind();
        assert_eq!(stream.remaining(), 3);
        assert!(!stream.is_empty());
    }
}
