//! Load-linked / store-conditional reservation tracking.

use crate::common::VirtAddr;

/// The single global reservation.
///
/// A linked load arms it; a conditional store consumes it and succeeds only
/// if it is still armed. Any ordinary store, and any exception return,
/// clears it regardless of address: clearing is conservative on ambiguity,
/// never optimistic.
#[derive(Debug, Clone, Copy, Default)]
pub struct Reservation {
    linked: bool,
    addr: u64,
}

impl Reservation {
    /// Arms the reservation at `addr`.
    pub fn link(&mut self, addr: VirtAddr) {
        self.linked = true;
        self.addr = addr.val();
    }

    /// Consumes the reservation for a conditional store; returns whether the
    /// store may proceed.
    pub fn take(&mut self) -> bool {
        let armed = self.linked;
        self.linked = false;
        armed
    }

    /// Clears the reservation unconditionally.
    pub fn clear(&mut self) {
        self.linked = false;
    }

    /// True while a linked load's reservation is outstanding.
    pub fn is_linked(&self) -> bool {
        self.linked
    }

    /// Address of the outstanding reservation.
    pub fn addr(&self) -> u64 {
        self.addr
    }
}
