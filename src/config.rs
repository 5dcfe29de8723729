//! Configuration module.
//!
//! This module defines the command-line interface (CLI) for the `modsect` tool using `clap`,
//! and the working-buffer settings the library takes from it.

use clap::Parser;
use std::num::NonZeroUsize;
use std::path::PathBuf;

/// Initial size of the working buffer used to stage section names.
pub const DEFAULT_BUFFER_SIZE: NonZeroUsize = non_zero(32);

/// Amount the working buffer grows by when a name does not fit.
pub const DEFAULT_BUFFER_INCREMENT: NonZeroUsize = non_zero(32);

const fn non_zero(n: usize) -> NonZeroUsize {
    match NonZeroUsize::new(n) {
        Some(n) => n,
        None => panic!("zero buffer size"),
    }
}

/// Inspect the section header table of a relocatable ELF module.
///
/// Section names are resolved with bounded reads through a small working
/// buffer, the same way the module loader does it.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Relocatable object file to inspect
    pub input: PathBuf,

    /// Section names to look up (may be repeated)
    #[arg(short, long = "find", value_name = "NAME")]
    pub find: Vec<String>,

    /// List every section with its resolved name
    #[arg(short, long)]
    pub list: bool,

    /// Initial working buffer size in bytes
    #[arg(long, default_value_t = DEFAULT_BUFFER_SIZE)]
    pub buffer_size: NonZeroUsize,

    /// Working buffer growth increment in bytes
    #[arg(long, default_value_t = DEFAULT_BUFFER_INCREMENT)]
    pub buffer_increment: NonZeroUsize,

    /// Map the file into memory instead of issuing positioned reads
    #[arg(long)]
    pub mmap: bool,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info", help = "Set the logging level")]
    pub log_level: String,
}

/// Sizing of a session's working buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferConfig {
    pub initial_size: NonZeroUsize,
    pub increment: NonZeroUsize,
}

impl Default for BufferConfig {
    fn default() -> Self {
        Self {
            initial_size: DEFAULT_BUFFER_SIZE,
            increment: DEFAULT_BUFFER_INCREMENT,
        }
    }
}

impl From<&Config> for BufferConfig {
    fn from(config: &Config) -> Self {
        Self {
            initial_size: config.buffer_size,
            increment: config.buffer_increment,
        }
    }
}
