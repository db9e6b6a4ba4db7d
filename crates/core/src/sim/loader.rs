//! Program loading.
//!
//! Places guest programs into the memory image:
//! 1. **ELF:** Every `PT_LOAD` segment lands at its physical address and the
//!    entry point seeds the program counter.
//! 2. **Flat binary:** Raw bytes copied to a caller-chosen address.

use std::path::{Path, PathBuf};

use object::read::elf::ElfFile64;
use object::{Endianness, Object, ObjectSegment};
use thiserror::Error;

use crate::mem::Memory;

/// A failure while reading or placing a guest program.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The file could not be read from disk.
    #[error("failed to read '{path}': {source}")]
    Io {
        /// Path of the unreadable file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// The object parser rejected the file.
    #[error("malformed ELF image: {0}")]
    Object(#[from] object::read::Error),
    /// A segment does not fit in the configured memory image.
    #[error("segment at {addr:#x} ({len} bytes) falls outside the memory image")]
    OutOfRange {
        /// Target address of the segment.
        addr: u64,
        /// Size of the segment in bytes.
        len: u64,
    },
}

/// Copies a flat binary into memory at `addr`.
///
/// # Errors
///
/// [`LoadError::OutOfRange`] if the bytes do not fit in the image.
pub fn load_flat(mem: &mut Memory, data: &[u8], addr: u64) -> Result<(), LoadError> {
    if !mem.load_binary_at(data, addr) {
        return Err(LoadError::OutOfRange {
            addr,
            len: data.len() as u64,
        });
    }
    tracing::debug!(addr = format_args!("{addr:#x}"), len = data.len(), "flat image loaded");
    Ok(())
}

/// Loads an ELF64 executable into memory and returns its entry point.
///
/// Segments are placed at their physical addresses; any `memsz` tail beyond
/// `filesz` is zero-filled.
///
/// # Errors
///
/// Parse failures and segments that fall outside the memory image.
pub fn load_elf(mem: &mut Memory, data: &[u8]) -> Result<u64, LoadError> {
    let file = ElfFile64::<Endianness>::parse(data)?;
    for segment in file.segments() {
        let addr = segment.address();
        let bytes = segment.data()?;
        if !mem.load_binary_at(bytes, addr) {
            return Err(LoadError::OutOfRange {
                addr,
                len: bytes.len() as u64,
            });
        }
        let memsz = segment.size();
        let filesz = bytes.len() as u64;
        if memsz > filesz {
            let zeroes = vec![0_u8; (memsz - filesz) as usize];
            if !mem.load_binary_at(&zeroes, addr + filesz) {
                return Err(LoadError::OutOfRange {
                    addr: addr + filesz,
                    len: memsz - filesz,
                });
            }
        }
        tracing::debug!(
            addr = format_args!("{addr:#x}"),
            filesz,
            memsz,
            "segment loaded"
        );
    }
    Ok(file.entry())
}

/// Reads a file from disk into a byte vector.
///
/// # Errors
///
/// [`LoadError::Io`] with the offending path.
pub fn read_image(path: &Path) -> Result<Vec<u8>, LoadError> {
    std::fs::read(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}
