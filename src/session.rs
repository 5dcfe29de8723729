//! Load sessions.
//!
//! A [`LoadSession`] holds everything one module load needs while it walks the
//! section header table: the reader, the file length, the decoded file header,
//! the section header array once it is loaded, and the working buffer that
//! section names are staged in.

use std::num::NonZeroUsize;

use crate::config::BufferConfig;
use crate::elf::{self, FileHeader, SectionHeader};
use crate::error::{Error, ReadTarget, Result};
use crate::reader::BoundedRead;

/// Resizable scratch storage for bytes read from the file.
///
/// The whole capacity is addressable; callers track how much of it they
/// filled. It only ever grows.
#[derive(Debug)]
pub struct WorkingBuffer {
    data: Vec<u8>,
}

impl WorkingBuffer {
    pub fn with_size(size: NonZeroUsize) -> Result<Self> {
        let mut buffer = Self { data: Vec::new() };
        buffer.grow(size)?;
        Ok(buffer)
    }

    /// Current capacity in bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Extends the capacity by `increment` bytes, keeping the current contents.
    pub fn grow(&mut self, increment: NonZeroUsize) -> Result<()> {
        let new_len = self
            .data
            .len()
            .checked_add(increment.get())
            .ok_or(Error::AllocationFailed { size: usize::MAX })?;
        self.data
            .try_reserve_exact(increment.get())
            .map_err(|_| Error::AllocationFailed { size: new_len })?;
        self.data.resize(new_len, 0);
        Ok(())
    }
}

/// State for loading one module.
pub struct LoadSession<R> {
    pub(crate) reader: R,
    pub(crate) file_len: u64,
    pub(crate) header: FileHeader,
    pub(crate) section_headers: Option<Vec<SectionHeader>>,
    pub(crate) buffer: WorkingBuffer,
    pub(crate) buffers: BufferConfig,
}

impl<R: BoundedRead> LoadSession<R> {
    /// Reads and verifies the file header, then sets up a session for it.
    pub fn open(mut reader: R, file_len: u64, buffers: BufferConfig) -> Result<Self> {
        let mut ident = [0u8; elf::IDENT_SIZE];
        read_header_bytes(&mut reader, file_len, &mut ident)?;
        let (class, _) = elf::parse_ident(&ident)?;

        let mut raw = vec![0u8; class.file_header_size()];
        read_header_bytes(&mut reader, file_len, &mut raw)?;
        let header = FileHeader::parse(&raw)?;
        tracing::debug!(
            class = ?header.class,
            endian = ?header.endian,
            sections = header.section_header_count,
            "read file header"
        );

        Self::with_header(reader, file_len, header, buffers)
    }

    /// Sets up a session for a file header that was already read.
    pub fn with_header(
        reader: R,
        file_len: u64,
        header: FileHeader,
        buffers: BufferConfig,
    ) -> Result<Self> {
        Ok(Self {
            reader,
            file_len,
            header,
            section_headers: None,
            buffer: WorkingBuffer::with_size(buffers.initial_size)?,
            buffers,
        })
    }
}

impl<R> LoadSession<R> {
    pub fn header(&self) -> &FileHeader {
        &self.header
    }

    pub fn file_len(&self) -> u64 {
        self.file_len
    }

    /// The loaded section header array.
    pub fn section_headers(&self) -> Result<&[SectionHeader]> {
        self.section_headers.as_deref().ok_or(Error::NotLoaded)
    }

    /// The working buffer as left by the last operation that used it.
    pub fn working_buffer(&self) -> &[u8] {
        self.buffer.as_slice()
    }

    pub fn reader(&self) -> &R {
        &self.reader
    }

    pub fn into_reader(self) -> R {
        self.reader
    }
}

fn read_header_bytes<R: BoundedRead>(reader: &mut R, file_len: u64, buf: &mut [u8]) -> Result<()> {
    if (buf.len() as u64) > file_len {
        return Err(Error::UnexpectedEof {
            target: ReadTarget::FileHeader,
            offset: 0,
            file_len,
        });
    }
    reader.read_at(buf, 0).map_err(|source| Error::ReadFailed {
        target: ReadTarget::FileHeader,
        offset: 0,
        len: buf.len(),
        source,
    })
}
