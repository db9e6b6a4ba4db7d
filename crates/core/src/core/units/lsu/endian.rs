//! Access lengths, alignment rules, and byte-lane positioning.
//!
//! Every memory access names one of the fixed lengths below. Power-of-two
//! lengths must be naturally aligned; the partial lengths (3, 5, 6, 7) come
//! from the left/right merge loads and may start anywhere inside their
//! containing word as long as they do not cross its boundary.

use crate::config::Endianness;

/// Byte length of a memory access.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessLength {
    /// One byte.
    Byte,
    /// Two bytes.
    Half,
    /// Three bytes (partial word).
    Triple,
    /// Four bytes.
    Word,
    /// Five bytes (partial doubleword).
    Five,
    /// Six bytes (partial doubleword).
    Six,
    /// Seven bytes (partial doubleword).
    Seven,
    /// Eight bytes.
    Double,
    /// Sixteen bytes (register pair).
    Quad,
}

impl AccessLength {
    /// Number of bytes transferred.
    #[inline]
    pub fn bytes(self) -> u64 {
        match self {
            Self::Byte => 1,
            Self::Half => 2,
            Self::Triple => 3,
            Self::Word => 4,
            Self::Five => 5,
            Self::Six => 6,
            Self::Seven => 7,
            Self::Double => 8,
            Self::Quad => 16,
        }
    }

    /// Natural alignment boundary containing the access: the smallest
    /// power of two not less than the length.
    #[inline]
    pub fn boundary(self) -> u64 {
        self.bytes().next_power_of_two()
    }

    /// True for the partial lengths generated by merge loads, which are
    /// allowed to start inside their boundary.
    #[inline]
    pub fn is_partial(self) -> bool {
        matches!(self, Self::Triple | Self::Five | Self::Six | Self::Seven)
    }

    /// Maps a byte count back to a length.
    pub fn from_bytes(n: u64) -> Option<Self> {
        Some(match n {
            1 => Self::Byte,
            2 => Self::Half,
            3 => Self::Triple,
            4 => Self::Word,
            5 => Self::Five,
            6 => Self::Six,
            7 => Self::Seven,
            8 => Self::Double,
            16 => Self::Quad,
            _ => return None,
        })
    }

    /// Alignment check for the access at `addr`.
    ///
    /// Power-of-two lengths require natural alignment; partial lengths only
    /// require that the access stays inside its boundary.
    pub fn is_legal_at(self, addr: u64) -> bool {
        let len = self.bytes();
        if self.is_partial() {
            let boundary = self.boundary();
            (addr % boundary) + len <= boundary
        } else {
            addr % len == 0
        }
    }
}

/// Assembles bytes read in ascending address order into a host value.
pub fn assemble(bytes: &[u8], endianness: Endianness) -> u64 {
    let mut value = 0_u64;
    match endianness {
        Endianness::Big => {
            for &b in bytes {
                value = (value << 8) | u64::from(b);
            }
        }
        Endianness::Little => {
            for (i, &b) in bytes.iter().enumerate() {
                value |= u64::from(b) << (8 * i);
            }
        }
    }
    value
}

/// Spreads a host value into bytes in ascending address order.
pub fn disperse(value: u64, len: u64, endianness: Endianness, out: &mut [u8]) {
    debug_assert!(out.len() as u64 >= len);
    for i in 0..len {
        let byte_index = match endianness {
            Endianness::Big => len - 1 - i,
            Endianness::Little => i,
        };
        out[i as usize] = (value >> (8 * byte_index)) as u8;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn power_of_two_lengths_require_natural_alignment() {
        assert!(AccessLength::Word.is_legal_at(0x1000));
        assert!(!AccessLength::Word.is_legal_at(0x1002));
        assert!(AccessLength::Double.is_legal_at(0x1008));
        assert!(!AccessLength::Double.is_legal_at(0x1004));
        assert!(AccessLength::Byte.is_legal_at(0x1003));
    }

    #[test]
    fn partial_lengths_must_stay_inside_their_boundary() {
        assert!(AccessLength::Triple.is_legal_at(0x1001));
        assert!(!AccessLength::Triple.is_legal_at(0x1002));
        assert!(AccessLength::Seven.is_legal_at(0x1001));
        assert!(!AccessLength::Seven.is_legal_at(0x1002));
    }

    #[test]
    fn assemble_disperse_round_trip() {
        let bytes = [0x12, 0x34, 0x56, 0x78];
        assert_eq!(assemble(&bytes, Endianness::Big), 0x1234_5678);
        assert_eq!(assemble(&bytes, Endianness::Little), 0x7856_3412);
        let mut out = [0_u8; 4];
        disperse(0x1234_5678, 4, Endianness::Big, &mut out);
        assert_eq!(out, bytes);
        disperse(0x7856_3412, 4, Endianness::Little, &mut out);
        assert_eq!(out, bytes);
    }
}
