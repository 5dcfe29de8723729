//! Entry point for the modsect tool.
//!
//! This file handles high-level application flow:
//! 1. Parse command-line arguments using `clap`.
//! 2. Open the object file, either for positioned reads or as a memory map.
//! 3. Read the file header and load the section header table.
//! 4. List sections and/or look up the requested names.
//!
//! Error handling is done via `anyhow`.

use anyhow::{Context, Result};
use clap::Parser;
use memmap2::Mmap;
use std::fs::File;
use tracing_subscriber::EnvFilter;

use modsect::config::{BufferConfig, Config};
use modsect::{BoundedRead, ErrorKind, LoadSession, MemoryReader, SeekReader};

fn main() -> Result<()> {
    let config = Config::parse();

    let filter = EnvFilter::try_new(&config.log_level)
        .with_context(|| format!("invalid log level {:?}", config.log_level))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let path = &config.input;
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let buffers = BufferConfig::from(&config);

    if config.mmap {
        let mmap = unsafe { Mmap::map(&file)? };
        let reader = MemoryReader::new(mmap);
        let file_len = reader.len();
        let session = LoadSession::open(reader, file_len, buffers)
            .with_context(|| format!("failed to read header of {}", path.display()))?;
        inspect(&config, session)
    } else {
        let file_len = file.metadata()?.len();
        let session = LoadSession::open(SeekReader::new(file), file_len, buffers)
            .with_context(|| format!("failed to read header of {}", path.display()))?;
        inspect(&config, session)
    }
}

fn inspect<R: BoundedRead>(config: &Config, mut session: LoadSession<R>) -> Result<()> {
    session
        .load_section_headers()
        .context("failed to load section headers")?;

    let header = session.header();
    println!(
        "{}: {:?} {:?}, {} sections, string table at index {}",
        config.input.display(),
        header.class,
        header.endian,
        header.section_header_count,
        header.string_table_index
    );

    if config.list {
        let count = session.section_headers()?.len();
        for index in 0..count {
            let section = session.section_headers()?[index];
            let name = session.section_name(index).context("failed to list sections")?;
            println!(
                "  [{:>3}] {:<24} offset 0x{:08x} size 0x{:x}",
                index, name, section.data_offset, section.size
            );
        }
    }

    for name in &config.find {
        match session.find_section(name) {
            Ok(index) => println!("{}: {}", name, index),
            Err(err) if err.kind() == ErrorKind::NotFound => println!("{}: not found", name),
            Err(err) => return Err(err).with_context(|| format!("failed to look up {}", name)),
        }
    }

    Ok(())
}
