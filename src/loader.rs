//! Section header table loading.

use crate::elf::SectionHeader;
use crate::error::{Error, ReadTarget, Result};
use crate::reader::BoundedRead;
use crate::session::LoadSession;

impl<R: BoundedRead> LoadSession<R> {
    /// Reads the whole section header table into memory.
    ///
    /// The table's extent is checked against the file length before anything
    /// is read. Offsets are computed in `u64`: the entry size and count are
    /// 16-bit so their product cannot overflow, and an offset sum that does not
    /// fit is reported as truncation. On error the session is left without a
    /// table.
    pub fn load_section_headers(&mut self) -> Result<()> {
        self.section_headers = None;
        let header = self.header;
        let count = usize::from(header.section_header_count);
        if count < 1 {
            tracing::warn!("no sections");
            return Err(Error::NoSections);
        }

        let entry_size = u64::from(header.section_header_entry_size);
        let table_size = entry_size * count as u64;
        let offset = header.section_header_offset;
        if offset
            .checked_add(table_size)
            .map_or(true, |end| end > self.file_len)
        {
            tracing::warn!(
                offset,
                table_size,
                file_len = self.file_len,
                "section header table past end of file"
            );
            return Err(Error::TruncatedFile {
                offset,
                size: table_size,
                file_len: self.file_len,
            });
        }

        let record_size = header.class.section_header_size();
        if usize::from(header.section_header_entry_size) < record_size {
            return Err(Error::InvalidHeader("section header entry size too small"));
        }

        let table_len = table_size as usize;
        let mut raw = Vec::new();
        raw.try_reserve_exact(table_len)
            .map_err(|_| Error::AllocationFailed { size: table_len })?;
        raw.resize(table_len, 0);
        self.reader
            .read_at(&mut raw, offset)
            .map_err(|source| {
                tracing::warn!(offset, table_size, %source, "failed to read section header table");
                Error::ReadFailed {
                    target: ReadTarget::SectionHeaders,
                    offset,
                    len: table_len,
                    source,
                }
            })?;

        let mut headers = Vec::new();
        headers
            .try_reserve_exact(count)
            .map_err(|_| Error::AllocationFailed {
                size: count * std::mem::size_of::<SectionHeader>(),
            })?;
        for entry in raw.chunks_exact(usize::from(header.section_header_entry_size)) {
            headers.push(SectionHeader::parse(header.class, header.endian, entry)?);
        }

        tracing::debug!(count, offset, "loaded section headers");
        self.section_headers = Some(headers);
        Ok(())
    }
}
