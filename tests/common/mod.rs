#![allow(dead_code)]
/// Common test helpers for integration tests
use std::io::{
    Read,
    Write,
};

/// The 21-byte fixture used by the stream copy tests
pub const FIXTURE: &[u8] = b"012345674444234567890";

/// `len` bytes cycling through 0..10
pub fn digits(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 10) as u8).collect()
}

/// Reader that returns at most `chunk` bytes per `read` call, like a socket
pub struct ChunkedReader {
    data: Vec<u8>,
    pos: usize,
    chunk: usize,
    pub reads: usize,
}

impl ChunkedReader {
    pub fn new(data: Vec<u8>, chunk: usize) -> Self {
        Self { data, pos: 0, chunk, reads: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }
}

impl Read for ChunkedReader {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.reads += 1;
        let n = buf.len().min(self.chunk).min(self.data.len() - self.pos);
        buf[..n].copy_from_slice(&self.data[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }
}

/// Writer whose first `write` call fails; every later call succeeds
#[derive(Default)]
pub struct FlakyWriter {
    pub written: Vec<u8>,
    tripped: bool,
}

impl Write for FlakyWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        if !self.tripped {
            self.tripped = true;
            return Err(std::io::Error::new(
                std::io::ErrorKind::Other,
                "transient failure",
            ));
        }
        self.written.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// Reader that yields `data` and then fails every call
pub struct BrokenAfter {
    data: Vec<u8>,
    pos: usize,
}

impl BrokenAfter {
    pub fn new(data: Vec<u8>) -> Self {
        Self { data, pos: 0 }
    }
}

impl Read for BrokenAfter {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        if self.pos == self.data.len() {
            return Err(std::io::Error::new(
                std::io::ErrorKind::ConnectionReset,
                "peer reset",
            ));
        }
        let n = buf.len().min(self.data.len() - self.pos);
        buf[..n].copy_from_slice(&self.data[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }
}

/// Writer that accepts `budget` bytes and then fails every call
pub struct FailingWriter {
    pub written: Vec<u8>,
    budget: usize,
    pub flushes: usize,
}

impl FailingWriter {
    pub fn new(budget: usize) -> Self {
        Self { written: Vec::new(), budget, flushes: 0 }
    }
}

impl Write for FailingWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        if self.budget == 0 {
            return Err(std::io::Error::new(
                std::io::ErrorKind::Other,
                "no space left",
            ));
        }
        let n = buf.len().min(self.budget);
        self.written.extend_from_slice(&buf[..n]);
        self.budget -= n;
        Ok(n)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flushes += 1;
        Ok(())
    }
}
