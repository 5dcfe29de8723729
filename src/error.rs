//! Error types.
//!
//! Every failure aborts the current load operation. The variants carry enough
//! context (offsets, lengths, what was being read) to be logged by the caller,
//! and [`Error::kind`] gives a plain tag to match on.

use std::io;

/// What the loader was reading when a [`BoundedRead`](crate::reader::BoundedRead)
/// call failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadTarget {
    FileHeader,
    SectionHeaders,
    SectionName,
}

impl std::fmt::Display for ReadTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            ReadTarget::FileHeader => "file header",
            ReadTarget::SectionHeaders => "section header table",
            ReadTarget::SectionName => "section name",
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The file header declares no sections.
    #[error("no sections in object file")]
    NoSections,

    /// The section header table extends past the end of the file.
    #[error("section header table {offset:#x}+{size:#x} exceeds file length {file_len:#x}")]
    TruncatedFile { offset: u64, size: u64, file_len: u64 },

    /// The underlying reader could not satisfy a range.
    #[error("failed to read {target} ({len} bytes at {offset:#x})")]
    ReadFailed {
        target: ReadTarget,
        offset: u64,
        len: usize,
        #[source]
        source: io::Error,
    },

    /// The file has no section name string table.
    #[error("no section header string table")]
    NoStringTable,

    /// The string table index points past the section header table.
    #[error("string table index {index} out of range ({count} sections)")]
    BadStringTableIndex { index: u16, count: usize },

    /// A name (or the file header) runs into the end of the file.
    #[error("unexpected end of file reading {target} at {offset:#x} (file is {file_len:#x} bytes)")]
    UnexpectedEof {
        target: ReadTarget,
        offset: u64,
        file_len: u64,
    },

    /// No section carries the requested name.
    #[error("section not found: {name}")]
    NotFound { name: String },

    /// A buffer could not be allocated.
    #[error("failed to allocate {size} bytes")]
    AllocationFailed { size: usize },

    /// The file header is not a supported relocatable object.
    #[error("invalid object header: {0}")]
    InvalidHeader(&'static str),

    /// The section header table has not been loaded yet.
    #[error("section header table not loaded")]
    NotLoaded,

    /// A section index beyond the loaded table.
    #[error("section index {index} out of range ({count} sections)")]
    SectionIndexOutOfRange { index: usize, count: usize },

    /// The name of the section at `index` could not be resolved.
    #[error("failed to resolve name of section {index}")]
    SectionName {
        index: usize,
        #[source]
        source: Box<Error>,
    },
}

/// The kind of an [`Error`], without its context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NoSections,
    TruncatedFile,
    ReadFailed,
    NoStringTable,
    BadStringTableIndex,
    UnexpectedEof,
    NotFound,
    AllocationFailed,
    InvalidHeader,
    NotLoaded,
    SectionIndexOutOfRange,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::NoSections => ErrorKind::NoSections,
            Error::TruncatedFile { .. } => ErrorKind::TruncatedFile,
            Error::ReadFailed { .. } => ErrorKind::ReadFailed,
            Error::NoStringTable => ErrorKind::NoStringTable,
            Error::BadStringTableIndex { .. } => ErrorKind::BadStringTableIndex,
            Error::UnexpectedEof { .. } => ErrorKind::UnexpectedEof,
            Error::NotFound { .. } => ErrorKind::NotFound,
            Error::AllocationFailed { .. } => ErrorKind::AllocationFailed,
            Error::InvalidHeader(_) => ErrorKind::InvalidHeader,
            Error::NotLoaded => ErrorKind::NotLoaded,
            Error::SectionIndexOutOfRange { .. } => ErrorKind::SectionIndexOutOfRange,
            Error::SectionName { source, .. } => source.kind(),
        }
    }

    /// Index of the section whose name failed to resolve, if any.
    pub fn section_index(&self) -> Option<usize> {
        match self {
            Error::SectionName { index, .. } => Some(*index),
            _ => None,
        }
    }

    pub(crate) fn in_section(self, index: usize) -> Self {
        Error::SectionName {
            index,
            source: Box::new(self),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
