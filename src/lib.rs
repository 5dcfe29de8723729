//! Section table resolver for a relocatable module loader.
//!
//! This library reads the section header table of an ELF relocatable object
//! through bounded reads and maps section names to table indices.
//! It is organized into several modules:
//! - `config`: CLI configuration and working-buffer sizing.
//! - `reader`: The `BoundedRead` seam and its in-memory and stream readers.
//! - `elf`: File header and section header decoding.
//! - `session`: Per-load state, including the working buffer.
//! - `loader`: Loading the section header table.
//! - `resolver`: Resolving section names through the string table.
//! - `finder`: Looking up a section index by name.

pub mod config;
pub mod elf;
pub mod error;
pub mod finder;
pub mod loader;
pub mod reader;
pub mod resolver;
pub mod session;

pub use config::BufferConfig;
pub use error::{Error, ErrorKind, Result};
pub use reader::{BoundedRead, MemoryReader, SeekReader};
pub use session::LoadSession;
