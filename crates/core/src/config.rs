//! Configuration system for the simulator.
//!
//! This module defines the configuration structures used to parameterize a
//! machine instance. It provides:
//! 1. **Defaults:** Baseline hardware constants (memory layout, vector base).
//! 2. **Structures:** Hierarchical config for general, machine, and memory groups.
//! 3. **Enums:** Byte-order selection.
//!
//! Configuration is supplied as JSON via [`Config::from_json`] or use
//! `Config::default()` for an out-of-the-box big-endian machine.

use serde::Deserialize;

use crate::common::constants::DEFAULT_VECTOR_BASE;

/// Default configuration constants.
mod defaults {
    /// Base physical address of the memory image.
    pub const MEM_BASE: u64 = 0;

    /// Size of the memory image in bytes (16 MiB).
    ///
    /// Large enough for every bare-metal test program this engine is used
    /// with; accesses beyond the image raise an address error.
    pub const MEM_SIZE: usize = 16 * 1024 * 1024;

    /// Initial program counter after reset.
    pub const START_PC: u64 = 0;
}

/// Byte order of the simulated machine.
///
/// Selected once per machine instance; individual accesses may additionally
/// be endian-reversed by the Status.RE mode bit (user-mode only).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum Endianness {
    /// Most significant byte at the lowest address.
    #[default]
    Big,
    /// Least significant byte at the lowest address.
    Little,
}

impl Endianness {
    /// Returns the opposite byte order, used for Status.RE reversed accesses.
    #[inline]
    pub fn flipped(self) -> Self {
        match self {
            Self::Big => Self::Little,
            Self::Little => Self::Big,
        }
    }
}

/// General simulation parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Initial program counter.
    pub start_pc: u64,
    /// Enable per-instruction trace logging.
    pub trace: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            start_pc: defaults::START_PC,
            trace: false,
        }
    }
}

/// Machine-level architectural parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MachineConfig {
    /// Byte order of the machine.
    pub endianness: Endianness,
    /// 32-bit FPR mode (Status.FR = 0): doubles occupy even/odd register
    /// pairs and naming an odd register for a double raises
    /// reserved-instruction.
    pub fpr32: bool,
    /// Base address of the exception vector region.
    pub vector_base: u64,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            endianness: Endianness::Big,
            fpr32: false,
            vector_base: DEFAULT_VECTOR_BASE,
        }
    }
}

/// Memory image parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MemoryConfig {
    /// Base physical address of the image.
    pub base: u64,
    /// Size of the image in bytes.
    pub size: usize,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            base: defaults::MEM_BASE,
            size: defaults::MEM_SIZE,
        }
    }
}

/// Root configuration type.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General simulation parameters.
    pub general: GeneralConfig,
    /// Machine-level architectural parameters.
    pub machine: MachineConfig,
    /// Memory image parameters.
    pub memory: MemoryConfig,
}

impl Config {
    /// Deserializes a configuration from a JSON document.
    ///
    /// Missing fields take their defaults, so `{}` is a valid document.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error if the document is malformed.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::constants::GENERAL_VECTOR_OFFSET;

    #[test]
    fn default_general_vector_lands_inside_the_default_image() {
        let config = Config::default();
        let vector = config.machine.vector_base + GENERAL_VECTOR_OFFSET;
        assert!(vector >= config.memory.base);
        assert!(vector < config.memory.base + config.memory.size as u64);
    }

    #[test]
    fn empty_document_deserializes_to_defaults() {
        let config = Config::from_json("{}").unwrap();
        assert_eq!(config.machine.endianness, Endianness::Big);
        assert_eq!(config.memory.size, 16 * 1024 * 1024);
    }
}
