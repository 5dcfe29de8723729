//! Section name resolution.
//!
//! Names live in the section name string table, which can be any length. Only
//! the working buffer is held in memory, so a name is read in bounded chunks:
//! fill the free part of the buffer, look for the terminator in what just
//! arrived, and grow the buffer if it is not there yet.

use crate::elf::SectionHeader;
use crate::error::{Error, ReadTarget, Result};
use crate::reader::BoundedRead;
use crate::session::LoadSession;

impl<R: BoundedRead> LoadSession<R> {
    /// Reads the name of `section` into the working buffer.
    ///
    /// On success the buffer holds the NUL-terminated name starting at offset
    /// 0, and the returned slice is the name without its terminator. A name
    /// that reaches the end of the file without a NUL is an error.
    pub fn resolve_name(&mut self, section: &SectionHeader) -> Result<&[u8]> {
        let strtab = self.string_table_header()?;

        let mut offset = strtab
            .data_offset
            .checked_add(u64::from(section.name_offset))
            .ok_or(Error::UnexpectedEof {
                target: ReadTarget::SectionName,
                offset: u64::MAX,
                file_len: self.file_len,
            })?;
        let mut filled = 0usize;

        loop {
            // Offsets stay in u64; the clipped length is below the free
            // capacity, so narrowing it back to usize is lossless.
            if offset >= self.file_len {
                tracing::warn!(
                    offset,
                    file_len = self.file_len,
                    "section name runs past end of file"
                );
                return Err(Error::UnexpectedEof {
                    target: ReadTarget::SectionName,
                    offset,
                    file_len: self.file_len,
                });
            }
            let mut read_len = self.buffer.len() - filled;
            let remaining = self.file_len - offset;
            if read_len as u64 > remaining {
                read_len = remaining as usize;
            }

            let chunk = &mut self.buffer.as_mut_slice()[filled..filled + read_len];
            self.reader.read_at(chunk, offset).map_err(|source| {
                tracing::warn!(offset, read_len, %source, "failed to read section name");
                Error::ReadFailed {
                    target: ReadTarget::SectionName,
                    offset,
                    len: read_len,
                    source,
                }
            })?;
            let terminator = chunk.iter().position(|&b| b == 0);

            if let Some(pos) = terminator {
                let name_len = filled + pos;
                return Ok(&self.buffer.as_slice()[..name_len]);
            }
            filled += read_len;
            offset += read_len as u64;

            tracing::trace!(filled, "section name longer than working buffer, growing");
            self.buffer.grow(self.buffers.increment)?;
        }
    }

    /// Resolves the name of the section at `index` as a lossily decoded string.
    pub fn section_name(&mut self, index: usize) -> Result<String> {
        let headers = self.section_headers()?;
        let section = *headers.get(index).ok_or(Error::SectionIndexOutOfRange {
            index,
            count: headers.len(),
        })?;
        let name = self
            .resolve_name(&section)
            .map_err(|err| err.in_section(index))?;
        Ok(String::from_utf8_lossy(name).into_owned())
    }

    fn string_table_header(&self) -> Result<SectionHeader> {
        if !self.header.has_string_table() {
            tracing::warn!("no section header string table");
            return Err(Error::NoStringTable);
        }
        let headers = self.section_headers()?;
        let index = self.header.string_table_index;
        headers
            .get(usize::from(index))
            .copied()
            .ok_or(Error::BadStringTableIndex {
                index,
                count: headers.len(),
            })
    }
}
