//! Load/store unit.
//!
//! The only component that touches the memory image's raw bytes. Each
//! access:
//! 1. **Checks alignment** against the access length's rule and raises an
//!    address error on violation, before any byte moves.
//! 2. **Translates** the virtual address (identity in the baseline model).
//! 3. **Positions byte lanes** per the machine byte order, optionally
//!    reversed per access by the mode bit.
//!
//! Stores touch only the bytes within the requested length. Ordinary stores
//! also clear the load-linked reservation, conservatively ignoring the
//! address.

use crate::common::{Exception, VirtAddr};
use crate::config::Endianness;
use crate::mem::Memory;

/// Load-linked reservation state.
pub mod atomic;

/// Access lengths and byte-lane math.
pub mod endian;

pub use atomic::Reservation;
pub use endian::AccessLength;

/// Largest single-value transfer in bytes; quad accesses move two of these.
const HALF_QUAD: u64 = 8;

/// The load/store unit.
#[derive(Debug)]
pub struct Lsu {
    endianness: Endianness,
    /// Load-linked reservation, owned here so every store path sees it.
    pub reservation: Reservation,
}

impl Lsu {
    /// Creates a unit with the machine byte order.
    pub fn new(endianness: Endianness) -> Self {
        Self {
            endianness,
            reservation: Reservation::default(),
        }
    }

    /// Machine byte order, honoring the per-access reversal bit.
    #[inline]
    pub fn effective_endianness(&self, reversed: bool) -> Endianness {
        if reversed {
            self.endianness.flipped()
        } else {
            self.endianness
        }
    }

    /// Alignment and range screening shared by loads and stores.
    fn check(
        mem: &Memory,
        addr: VirtAddr,
        len: AccessLength,
        is_store: bool,
    ) -> Result<(), Exception> {
        let fault = || {
            if is_store {
                Exception::AddressErrorStore(addr.val())
            } else {
                Exception::AddressErrorLoad(addr.val())
            }
        };
        if !len.is_legal_at(addr.val()) {
            return Err(fault());
        }
        if !mem.contains(addr.translate(), len.bytes()) {
            return Err(fault());
        }
        Ok(())
    }

    /// Loads up to eight bytes, returned zero-extended at the low end.
    ///
    /// `reversed` applies the endian-reversal mode bit to this access.
    ///
    /// # Errors
    ///
    /// Address error on misalignment or an access outside the image.
    pub fn load(
        &self,
        mem: &Memory,
        addr: VirtAddr,
        len: AccessLength,
        reversed: bool,
    ) -> Result<u64, Exception> {
        debug_assert!(len != AccessLength::Quad, "quad loads use load_quad");
        Self::check(mem, addr, len, false)?;
        let endianness = self.effective_endianness(reversed);
        let paddr = addr.translate();
        let mut bytes = [0_u8; 8];
        let n = len.bytes() as usize;
        for (i, slot) in bytes.iter_mut().enumerate().take(n) {
            *slot = mem.read_byte(crate::common::PhysAddr::new(paddr.val() + i as u64));
        }
        Ok(endian::assemble(&bytes[..n], endianness))
    }

    /// Stores up to eight bytes; bytes outside the length are untouched.
    ///
    /// Clears the load-linked reservation.
    ///
    /// # Errors
    ///
    /// Address error on misalignment or an access outside the image.
    pub fn store(
        &mut self,
        mem: &mut Memory,
        addr: VirtAddr,
        len: AccessLength,
        value: u64,
        reversed: bool,
    ) -> Result<(), Exception> {
        debug_assert!(len != AccessLength::Quad, "quad stores use store_quad");
        Self::check(mem, addr, len, true)?;
        self.reservation.clear();
        let endianness = self.effective_endianness(reversed);
        let paddr = addr.translate();
        let n = len.bytes();
        let mut bytes = [0_u8; 8];
        endian::disperse(value, n, endianness, &mut bytes);
        for (i, &b) in bytes.iter().enumerate().take(n as usize) {
            mem.write_byte(crate::common::PhysAddr::new(paddr.val() + i as u64), b);
        }
        Ok(())
    }

    /// Sixteen-byte load as (low doubleword, high doubleword) in address
    /// order under the effective byte order.
    ///
    /// # Errors
    ///
    /// Address error on misalignment or an access outside the image.
    pub fn load_quad(
        &self,
        mem: &Memory,
        addr: VirtAddr,
        reversed: bool,
    ) -> Result<(u64, u64), Exception> {
        Self::check(mem, addr, AccessLength::Quad, false)?;
        let first = self.load(mem, addr, AccessLength::Double, reversed)?;
        let second = self.load(
            mem,
            VirtAddr::new(addr.val() + HALF_QUAD),
            AccessLength::Double,
            reversed,
        )?;
        match self.effective_endianness(reversed) {
            Endianness::Big => Ok((second, first)),
            Endianness::Little => Ok((first, second)),
        }
    }

    /// Sixteen-byte store, the inverse of [`load_quad`](Self::load_quad).
    ///
    /// # Errors
    ///
    /// Address error on misalignment or an access outside the image.
    pub fn store_quad(
        &mut self,
        mem: &mut Memory,
        addr: VirtAddr,
        lo: u64,
        hi: u64,
        reversed: bool,
    ) -> Result<(), Exception> {
        Self::check(mem, addr, AccessLength::Quad, true)?;
        let (first, second) = match self.effective_endianness(reversed) {
            Endianness::Big => (hi, lo),
            Endianness::Little => (lo, hi),
        };
        self.store(mem, addr, AccessLength::Double, first, reversed)?;
        self.store(
            mem,
            VirtAddr::new(addr.val() + HALF_QUAD),
            AccessLength::Double,
            second,
            reversed,
        )
    }

    /// Linked load: an ordinary load that also arms the reservation.
    ///
    /// # Errors
    ///
    /// Address error on misalignment or an access outside the image.
    pub fn load_linked(
        &mut self,
        mem: &Memory,
        addr: VirtAddr,
        len: AccessLength,
        reversed: bool,
    ) -> Result<u64, Exception> {
        let value = self.load(mem, addr, len, reversed)?;
        self.reservation.link(addr);
        Ok(value)
    }

    /// Conditional store: performs the store only while the reservation is
    /// still armed. Returns whether the store happened.
    ///
    /// # Errors
    ///
    /// Address error on misalignment or an access outside the image, checked
    /// whether or not the reservation is armed.
    pub fn store_conditional(
        &mut self,
        mem: &mut Memory,
        addr: VirtAddr,
        len: AccessLength,
        value: u64,
        reversed: bool,
    ) -> Result<bool, Exception> {
        Self::check(mem, addr, len, true)?;
        if !self.reservation.take() {
            return Ok(false);
        }
        self.store(mem, addr, len, value, reversed)?;
        Ok(true)
    }
}
