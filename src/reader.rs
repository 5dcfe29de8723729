//! Bounded readers.
//!
//! The loader never maps or buffers a whole object file itself. Everything it
//! needs is fetched through [`BoundedRead`], one exact byte range at a time.

use std::io::{self, Read, Seek, SeekFrom};

/// A source that can fill a buffer from an exact byte range of a file.
pub trait BoundedRead {
    /// Fills all of `buf` with the bytes starting at `offset`.
    ///
    /// Fails if the range `[offset, offset + buf.len())` cannot be satisfied.
    /// On failure the contents of `buf` are unspecified.
    fn read_at(&mut self, buf: &mut [u8], offset: u64) -> io::Result<()>;
}

impl<R: BoundedRead + ?Sized> BoundedRead for &mut R {
    fn read_at(&mut self, buf: &mut [u8], offset: u64) -> io::Result<()> {
        (**self).read_at(buf, offset)
    }
}

/// Reads from bytes already in memory: a slice, a `Vec<u8>` or a `memmap2::Mmap`.
#[derive(Debug, Clone)]
pub struct MemoryReader<T> {
    data: T,
}

impl<T: AsRef<[u8]>> MemoryReader<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }

    /// Length of the underlying bytes, usable as the session's file length.
    pub fn len(&self) -> u64 {
        self.data.as_ref().len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.data.as_ref().is_empty()
    }

    pub fn into_inner(self) -> T {
        self.data
    }
}

impl<T: AsRef<[u8]>> BoundedRead for MemoryReader<T> {
    fn read_at(&mut self, buf: &mut [u8], offset: u64) -> io::Result<()> {
        let data = self.data.as_ref();
        let range = usize::try_from(offset)
            .ok()
            .and_then(|start| Some(start..start.checked_add(buf.len())?))
            .filter(|range| range.end <= data.len())
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    format!("range {:#x}+{:#x} outside {:#x} bytes", offset, buf.len(), data.len()),
                )
            })?;
        buf.copy_from_slice(&data[range]);
        Ok(())
    }
}

/// Reads from any seekable stream, such as a `std::fs::File`.
#[derive(Debug)]
pub struct SeekReader<R> {
    inner: R,
}

impl<R: Read + Seek> SeekReader<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read + Seek> BoundedRead for SeekReader<R> {
    fn read_at(&mut self, buf: &mut [u8], offset: u64) -> io::Result<()> {
        self.inner.seek(SeekFrom::Start(offset))?;
        self.inner.read_exact(buf)
    }
}
