//! ELF record decoding.
//!
//! This module turns raw file bytes into the two records the loader works with:
//! the file header and the section header. Both ELF classes and both byte
//! orders are supported. The on-disk layouts come from `object::elf`, so the
//! decoding is bit-exact with the format definition.

use object::elf;
use object::pod;
use object::Endianness;

use crate::error::{Error, Result};

/// Size of `e_ident`, the class-independent start of every ELF file.
pub const IDENT_SIZE: usize = 16;

const EI_CLASS: usize = 4;
const EI_DATA: usize = 5;

/// 32-bit or 64-bit ELF.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElfClass {
    Elf32,
    Elf64,
}

impl ElfClass {
    /// Size of the file header for this class.
    pub fn file_header_size(self) -> usize {
        match self {
            ElfClass::Elf32 => std::mem::size_of::<elf::FileHeader32<Endianness>>(),
            ElfClass::Elf64 => std::mem::size_of::<elf::FileHeader64<Endianness>>(),
        }
    }

    /// Size of one section header record for this class.
    pub fn section_header_size(self) -> usize {
        match self {
            ElfClass::Elf32 => std::mem::size_of::<elf::SectionHeader32<Endianness>>(),
            ElfClass::Elf64 => std::mem::size_of::<elf::SectionHeader64<Endianness>>(),
        }
    }
}

/// The fields of the ELF file header the loader cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileHeader {
    pub class: ElfClass,
    pub endian: Endianness,
    /// `e_type`; only `ET_REL` objects are accepted by [`FileHeader::parse`].
    pub kind: u16,
    pub machine: u16,
    pub section_header_offset: u64,
    pub section_header_entry_size: u16,
    pub section_header_count: u16,
    /// Index of the section name string table, `SHN_UNDEF` if there is none.
    pub string_table_index: u16,
}

/// Validates `e_ident` and returns the class and byte order it declares.
pub fn parse_ident(ident: &[u8]) -> Result<(ElfClass, Endianness)> {
    if ident.len() < IDENT_SIZE {
        return Err(Error::InvalidHeader("truncated identification"));
    }
    if ident[..elf::ELFMAG.len()] != elf::ELFMAG {
        return Err(Error::InvalidHeader("bad magic"));
    }
    let class = match ident[EI_CLASS] {
        elf::ELFCLASS32 => ElfClass::Elf32,
        elf::ELFCLASS64 => ElfClass::Elf64,
        _ => return Err(Error::InvalidHeader("unsupported class")),
    };
    let endian = match ident[EI_DATA] {
        elf::ELFDATA2LSB => Endianness::Little,
        elf::ELFDATA2MSB => Endianness::Big,
        _ => return Err(Error::InvalidHeader("unsupported data encoding")),
    };
    Ok((class, endian))
}

impl FileHeader {
    /// Decodes and verifies a complete file header.
    ///
    /// `data` must hold at least [`ElfClass::file_header_size`] bytes for the
    /// class named in its identification.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let (class, endian) = parse_ident(data)?;
        let header = match class {
            ElfClass::Elf32 => {
                let (raw, _) = pod::from_bytes::<elf::FileHeader32<Endianness>>(data)
                    .map_err(|()| Error::InvalidHeader("truncated file header"))?;
                FileHeader {
                    class,
                    endian,
                    kind: raw.e_type.get(endian),
                    machine: raw.e_machine.get(endian),
                    section_header_offset: u64::from(raw.e_shoff.get(endian)),
                    section_header_entry_size: raw.e_shentsize.get(endian),
                    section_header_count: raw.e_shnum.get(endian),
                    string_table_index: raw.e_shstrndx.get(endian),
                }
            }
            ElfClass::Elf64 => {
                let (raw, _) = pod::from_bytes::<elf::FileHeader64<Endianness>>(data)
                    .map_err(|()| Error::InvalidHeader("truncated file header"))?;
                FileHeader {
                    class,
                    endian,
                    kind: raw.e_type.get(endian),
                    machine: raw.e_machine.get(endian),
                    section_header_offset: raw.e_shoff.get(endian),
                    section_header_entry_size: raw.e_shentsize.get(endian),
                    section_header_count: raw.e_shnum.get(endian),
                    string_table_index: raw.e_shstrndx.get(endian),
                }
            }
        };
        if header.kind != elf::ET_REL {
            return Err(Error::InvalidHeader("not a relocatable object"));
        }
        Ok(header)
    }

    /// Whether the file names a section header string table at all.
    pub fn has_string_table(&self) -> bool {
        self.string_table_index != elf::SHN_UNDEF
    }
}

/// One entry of the section header table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SectionHeader {
    /// Offset of the name inside the section name string table.
    pub name_offset: u32,
    pub kind: u32,
    pub flags: u64,
    pub address: u64,
    /// File offset of the section's bytes.
    pub data_offset: u64,
    pub size: u64,
    pub link: u32,
    pub info: u32,
    pub align: u64,
    pub entry_size: u64,
}

impl SectionHeader {
    /// Decodes one record from the start of `data`.
    pub fn parse(class: ElfClass, endian: Endianness, data: &[u8]) -> Result<Self> {
        let truncated = |()| Error::InvalidHeader("truncated section header");
        Ok(match class {
            ElfClass::Elf32 => {
                let (raw, _) =
                    pod::from_bytes::<elf::SectionHeader32<Endianness>>(data).map_err(truncated)?;
                SectionHeader {
                    name_offset: raw.sh_name.get(endian),
                    kind: raw.sh_type.get(endian),
                    flags: u64::from(raw.sh_flags.get(endian)),
                    address: u64::from(raw.sh_addr.get(endian)),
                    data_offset: u64::from(raw.sh_offset.get(endian)),
                    size: u64::from(raw.sh_size.get(endian)),
                    link: raw.sh_link.get(endian),
                    info: raw.sh_info.get(endian),
                    align: u64::from(raw.sh_addralign.get(endian)),
                    entry_size: u64::from(raw.sh_entsize.get(endian)),
                }
            }
            ElfClass::Elf64 => {
                let (raw, _) =
                    pod::from_bytes::<elf::SectionHeader64<Endianness>>(data).map_err(truncated)?;
                SectionHeader {
                    name_offset: raw.sh_name.get(endian),
                    kind: raw.sh_type.get(endian),
                    flags: raw.sh_flags.get(endian),
                    address: raw.sh_addr.get(endian),
                    data_offset: raw.sh_offset.get(endian),
                    size: raw.sh_size.get(endian),
                    link: raw.sh_link.get(endian),
                    info: raw.sh_info.get(endian),
                    align: raw.sh_addralign.get(endian),
                    entry_size: raw.sh_entsize.get(endian),
                }
            }
        })
    }
}
