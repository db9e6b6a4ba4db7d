//! Physical memory image.
//!
//! A flat, byte-addressable image owned by the machine. The load/store unit
//! is the only component that performs raw byte reads and writes here; every
//! other subsystem goes through the LSU's positioned load/store interface.

use crate::common::PhysAddr;

/// Flat physical memory image.
pub struct Memory {
    base: u64,
    bytes: Vec<u8>,
}

impl std::fmt::Debug for Memory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Memory")
            .field("base", &self.base)
            .field("size", &self.bytes.len())
            .finish()
    }
}

impl Memory {
    /// Creates a zero-filled image of `size` bytes starting at physical
    /// address `base`.
    pub fn new(base: u64, size: usize) -> Self {
        Self {
            base,
            bytes: vec![0; size],
        }
    }

    /// Base physical address of the image.
    #[inline]
    pub fn base(&self) -> u64 {
        self.base
    }

    /// Size of the image in bytes.
    #[inline]
    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    /// Returns true if the `len`-byte range starting at `paddr` lies fully
    /// inside the image.
    #[inline]
    pub fn contains(&self, paddr: PhysAddr, len: u64) -> bool {
        let Some(off) = paddr.val().checked_sub(self.base) else {
            return false;
        };
        let Some(end) = off.checked_add(len) else {
            return false;
        };
        end <= self.bytes.len() as u64
    }

    /// Raw byte read. Callers must have range-checked with [`contains`].
    ///
    /// [`contains`]: Memory::contains
    #[inline(always)]
    pub(crate) fn read_byte(&self, paddr: PhysAddr) -> u8 {
        self.bytes[(paddr.val() - self.base) as usize]
    }

    /// Raw byte write. Callers must have range-checked with [`contains`].
    ///
    /// [`contains`]: Memory::contains
    #[inline(always)]
    pub(crate) fn write_byte(&mut self, paddr: PhysAddr, value: u8) {
        self.bytes[(paddr.val() - self.base) as usize] = value;
    }

    /// Copies `data` into the image at physical address `paddr`.
    ///
    /// Used by the loader; returns false (and copies nothing) if the
    /// destination range falls outside the image.
    pub fn load_binary_at(&mut self, data: &[u8], paddr: u64) -> bool {
        let dst = PhysAddr(paddr);
        if !self.contains(dst, data.len() as u64) {
            return false;
        }
        let off = (paddr - self.base) as usize;
        self.bytes[off..off + data.len()].copy_from_slice(data);
        true
    }
}
