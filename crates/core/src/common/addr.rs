//! Physical and virtual address types.
//!
//! Strong types for the two address spaces so that instruction semantics can
//! never hand an untranslated address to the memory image by accident. The
//! baseline model translates identically (no TLB), but the type distinction
//! keeps the translation step explicit at every load/store site.

/// A virtual address as computed by instruction semantics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct VirtAddr(pub u64);

/// A physical address within the memory image.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct PhysAddr(pub u64);

impl VirtAddr {
    /// Creates a new virtual address from a raw 64-bit value.
    #[inline(always)]
    pub fn new(addr: u64) -> Self {
        Self(addr)
    }

    /// Returns the raw 64-bit address value.
    #[inline(always)]
    pub fn val(&self) -> u64 {
        self.0
    }

    /// Identity translation to a physical address.
    ///
    /// The baseline machine model has no TLB; every virtual address maps to
    /// the physical address with the same value. Range checking is performed
    /// by the memory image itself.
    #[inline(always)]
    pub fn translate(&self) -> PhysAddr {
        PhysAddr(self.0)
    }
}

impl PhysAddr {
    /// Creates a new physical address from a raw 64-bit value.
    #[inline(always)]
    pub fn new(addr: u64) -> Self {
        Self(addr)
    }

    /// Returns the raw 64-bit address value.
    #[inline(always)]
    pub fn val(&self) -> u64 {
        self.0
    }
}
