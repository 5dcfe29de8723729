//! Relocatable object images for tests.
//!
//! Layout of a built image: file header, section header table, then the
//! section name string table, so the string table's last byte is the file's
//! last byte. Section 0 is always the null section, named by offset 0.

#![allow(dead_code)]

use std::io;

use modsect::BoundedRead;
use object::endian::{U16, U32, U64};
use object::pod::bytes_of;
use object::Endianness;

pub struct ImageBuilder {
    is_64: bool,
    endian: Endianness,
    e_type: u16,
    name_offsets: Vec<u32>,
    strtab: Vec<u8>,
    string_table_index: u16,
    section_count: Option<u16>,
    section_header_offset: Option<u64>,
    entry_padding: usize,
}

impl ImageBuilder {
    pub fn elf64() -> Self {
        Self {
            is_64: true,
            endian: Endianness::Little,
            e_type: object::elf::ET_REL,
            name_offsets: vec![0],
            strtab: vec![0],
            string_table_index: object::elf::SHN_UNDEF,
            section_count: None,
            section_header_offset: None,
            entry_padding: 0,
        }
    }

    pub fn elf32() -> Self {
        Self { is_64: false, ..Self::elf64() }
    }

    /// Drops the leading null section, so the first added section is index 0.
    pub fn without_null_section(mut self) -> Self {
        self.name_offsets.clear();
        self
    }

    pub fn big_endian(mut self) -> Self {
        self.endian = Endianness::Big;
        self
    }

    pub fn file_type(mut self, e_type: u16) -> Self {
        self.e_type = e_type;
        self
    }

    /// Adds a section whose name is appended to the string table.
    pub fn section(mut self, name: &str) -> Self {
        let offset = self.strtab.len() as u32;
        self.strtab.extend_from_slice(name.as_bytes());
        self.strtab.push(0);
        self.name_offsets.push(offset);
        self
    }

    /// Adds the section name string table itself, named `name`.
    pub fn string_table(mut self, name: &str) -> Self {
        self.string_table_index = self.name_offsets.len() as u16;
        self.section(name)
    }

    /// Adds a section whose name offset is given directly.
    pub fn section_at(mut self, name_offset: u32) -> Self {
        self.name_offsets.push(name_offset);
        self
    }

    /// Appends raw bytes to the string table.
    pub fn strtab_bytes(mut self, bytes: &[u8]) -> Self {
        self.strtab.extend_from_slice(bytes);
        self
    }

    /// Offset the next `strtab_bytes` call will write at.
    pub fn strtab_len(&self) -> u32 {
        self.strtab.len() as u32
    }

    pub fn string_table_index(mut self, index: u16) -> Self {
        self.string_table_index = index;
        self
    }

    /// Overrides `e_shnum` without changing the records written.
    pub fn section_count(mut self, count: u16) -> Self {
        self.section_count = Some(count);
        self
    }

    /// Overrides `e_shoff` without moving the table.
    pub fn section_header_offset(mut self, offset: u64) -> Self {
        self.section_header_offset = Some(offset);
        self
    }

    /// Pads every section header record by `padding` bytes.
    pub fn entry_padding(mut self, padding: usize) -> Self {
        self.entry_padding = padding;
        self
    }

    pub fn build(self) -> Vec<u8> {
        let e = self.endian;
        let ehsize: usize = if self.is_64 { 64 } else { 52 };
        let record_size: usize = if self.is_64 { 64 } else { 40 };
        let entsize = record_size + self.entry_padding;
        let shoff = ehsize;
        let strtab_offset = shoff + entsize * self.name_offsets.len();
        let shnum = self.section_count.unwrap_or(self.name_offsets.len() as u16);
        let e_shoff = self.section_header_offset.unwrap_or(shoff as u64);

        let ident = object::elf::Ident {
            magic: object::elf::ELFMAG,
            class: if self.is_64 { object::elf::ELFCLASS64 } else { object::elf::ELFCLASS32 },
            data: match e {
                Endianness::Little => object::elf::ELFDATA2LSB,
                Endianness::Big => object::elf::ELFDATA2MSB,
            },
            version: object::elf::EV_CURRENT,
            os_abi: object::elf::ELFOSABI_SYSV,
            abi_version: 0,
            padding: [0; 7],
        };

        let mut buffer = Vec::new();
        if self.is_64 {
            let file_header = object::elf::FileHeader64::<Endianness> {
                e_ident: ident,
                e_type: U16::new(e, self.e_type),
                e_machine: U16::new(e, object::elf::EM_X86_64),
                e_version: U32::new(e, object::elf::EV_CURRENT as u32),
                e_entry: U64::new(e, 0),
                e_phoff: U64::new(e, 0),
                e_shoff: U64::new(e, e_shoff),
                e_flags: U32::new(e, 0),
                e_ehsize: U16::new(e, ehsize as u16),
                e_phentsize: U16::new(e, 0),
                e_phnum: U16::new(e, 0),
                e_shentsize: U16::new(e, entsize as u16),
                e_shnum: U16::new(e, shnum),
                e_shstrndx: U16::new(e, self.string_table_index),
            };
            buffer.extend_from_slice(bytes_of(&file_header));
        } else {
            let file_header = object::elf::FileHeader32::<Endianness> {
                e_ident: ident,
                e_type: U16::new(e, self.e_type),
                e_machine: U16::new(e, object::elf::EM_ARM),
                e_version: U32::new(e, object::elf::EV_CURRENT as u32),
                e_entry: U32::new(e, 0),
                e_phoff: U32::new(e, 0),
                e_shoff: U32::new(e, e_shoff as u32),
                e_flags: U32::new(e, 0),
                e_ehsize: U16::new(e, ehsize as u16),
                e_phentsize: U16::new(e, 0),
                e_phnum: U16::new(e, 0),
                e_shentsize: U16::new(e, entsize as u16),
                e_shnum: U16::new(e, shnum),
                e_shstrndx: U16::new(e, self.string_table_index),
            };
            buffer.extend_from_slice(bytes_of(&file_header));
        }

        for (index, &name_offset) in self.name_offsets.iter().enumerate() {
            let is_strtab = index == usize::from(self.string_table_index)
                && self.string_table_index != object::elf::SHN_UNDEF;
            let (sh_type, sh_offset, sh_size) = if is_strtab {
                (object::elf::SHT_STRTAB, strtab_offset as u64, self.strtab.len() as u64)
            } else if index == 0 {
                (object::elf::SHT_NULL, 0, 0)
            } else {
                (object::elf::SHT_PROGBITS, 0, 0)
            };
            if self.is_64 {
                let section = object::elf::SectionHeader64::<Endianness> {
                    sh_name: U32::new(e, name_offset),
                    sh_type: U32::new(e, sh_type),
                    sh_flags: U64::new(e, 0),
                    sh_addr: U64::new(e, 0),
                    sh_offset: U64::new(e, sh_offset),
                    sh_size: U64::new(e, sh_size),
                    sh_link: U32::new(e, 0),
                    sh_info: U32::new(e, 0),
                    sh_addralign: U64::new(e, 1),
                    sh_entsize: U64::new(e, 0),
                };
                buffer.extend_from_slice(bytes_of(&section));
            } else {
                let section = object::elf::SectionHeader32::<Endianness> {
                    sh_name: U32::new(e, name_offset),
                    sh_type: U32::new(e, sh_type),
                    sh_flags: U32::new(e, 0),
                    sh_addr: U32::new(e, 0),
                    sh_offset: U32::new(e, sh_offset as u32),
                    sh_size: U32::new(e, sh_size as u32),
                    sh_link: U32::new(e, 0),
                    sh_info: U32::new(e, 0),
                    sh_addralign: U32::new(e, 1),
                    sh_entsize: U32::new(e, 0),
                };
                buffer.extend_from_slice(bytes_of(&section));
            }
            buffer.resize(buffer.len() + self.entry_padding, 0xee);
        }

        assert_eq!(buffer.len(), strtab_offset);
        buffer.extend_from_slice(&self.strtab);
        buffer
    }
}

/// Records every range requested from the inner reader.
pub struct RecordingReader<R> {
    pub inner: R,
    pub reads: Vec<(u64, usize)>,
}

impl<R> RecordingReader<R> {
    pub fn new(inner: R) -> Self {
        Self { inner, reads: Vec::new() }
    }
}

impl<R: BoundedRead> BoundedRead for RecordingReader<R> {
    fn read_at(&mut self, buf: &mut [u8], offset: u64) -> io::Result<()> {
        self.reads.push((offset, buf.len()));
        self.inner.read_at(buf, offset)
    }
}

/// Fails every read once `remaining` successful reads have been used up.
pub struct FailingReader<R> {
    pub inner: R,
    pub remaining: usize,
}

impl<R: BoundedRead> BoundedRead for FailingReader<R> {
    fn read_at(&mut self, buf: &mut [u8], offset: u64) -> io::Result<()> {
        if self.remaining == 0 {
            return Err(io::Error::new(io::ErrorKind::Other, "device error"));
        }
        self.remaining -= 1;
        self.inner.read_at(buf, offset)
    }
}
