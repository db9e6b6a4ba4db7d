//! Lane-wise vector operations.
//!
//! Element-wise arithmetic over the two lane configurations. All narrow
//! saturating arithmetic clamps to the lane type's range rather than
//! wrapping. Compares produce one condition bit per lane (lane 0 in bit 0);
//! pick consumes those bits to select lanes from either source.

/// Fixed cross-lane shuffle patterns.
///
/// Each pattern is a static permutation over the concatenation of the two
/// source vectors; there is no data-dependent routing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shuffle {
    /// Interleave the upper halves of both sources, a below b.
    MixHigh,
    /// Interleave the lower halves of both sources, a below b.
    MixLow,
    /// Concatenate the upper halves, b's in the low lanes.
    PackHigh,
    /// Concatenate the lower halves, b's in the low lanes.
    PackLow,
    /// Broadcast the even lanes of a over lane pairs.
    RepeatA,
    /// Broadcast the odd lanes of a over lane pairs.
    RepeatB,
}

/// Generates the per-lane arithmetic shared by both formats.
macro_rules! lanewise {
    ($a:expr, $b:expr, $f:expr) => {{
        let (a, b) = ($a, $b);
        let mut out = a;
        let mut i = 0;
        while i < a.len() {
            out[i] = $f(a[i], b[i]);
            i += 1;
        }
        out
    }};
}

/// Compare two vectors into a per-lane condition mask.
macro_rules! compare_mask {
    ($a:expr, $b:expr, $f:expr) => {{
        let (a, b) = ($a, $b);
        let mut mask = 0_u8;
        let mut i = 0;
        while i < a.len() {
            if $f(a[i], b[i]) {
                mask |= 1 << i;
            }
            i += 1;
        }
        mask
    }};
}

/// Select lanes by condition bit: set picks from `a`, clear from `b`.
macro_rules! pick_lanes {
    ($mask:expr, $a:expr, $b:expr) => {{
        let (mask, a, b) = ($mask, $a, $b);
        let mut out = a;
        let mut i = 0;
        while i < a.len() {
            out[i] = if mask & (1 << i) != 0 { a[i] } else { b[i] };
            i += 1;
        }
        out
    }};
}

/// Applies a fixed shuffle over two lane arrays.
///
/// Expressed over lane indices of the concatenation [a, b]; the per-format
/// tables below instantiate it for 8 and 4 lanes.
fn permute<T: Copy, const N: usize>(a: [T; N], b: [T; N], table: [usize; N]) -> [T; N] {
    let mut out = a;
    for (i, &src) in table.iter().enumerate() {
        out[i] = if src < N { a[src] } else { b[src - N] };
    }
    out
}

/// Operations over eight unsigned 8-bit lanes.
pub mod ob {
    use super::{permute, Shuffle};

    /// Saturating lane-wise addition.
    pub fn add_sat(a: [u8; 8], b: [u8; 8]) -> [u8; 8] {
        lanewise!(a, b, |x: u8, y: u8| x.saturating_add(y))
    }

    /// Saturating lane-wise subtraction (clamps at zero).
    pub fn sub_sat(a: [u8; 8], b: [u8; 8]) -> [u8; 8] {
        lanewise!(a, b, |x: u8, y: u8| x.saturating_sub(y))
    }

    /// Saturating lane-wise multiplication (clamps at 255).
    pub fn mul_sat(a: [u8; 8], b: [u8; 8]) -> [u8; 8] {
        lanewise!(a, b, |x: u8, y: u8| {
            let p = u16::from(x) * u16::from(y);
            if p > 255 { 255 } else { p as u8 }
        })
    }

    /// Lane-wise minimum.
    pub fn min(a: [u8; 8], b: [u8; 8]) -> [u8; 8] {
        lanewise!(a, b, |x: u8, y: u8| x.min(y))
    }

    /// Lane-wise maximum.
    pub fn max(a: [u8; 8], b: [u8; 8]) -> [u8; 8] {
        lanewise!(a, b, |x: u8, y: u8| x.max(y))
    }

    /// Lane-wise AND.
    pub fn and(a: [u8; 8], b: [u8; 8]) -> [u8; 8] {
        lanewise!(a, b, |x: u8, y: u8| x & y)
    }

    /// Lane-wise OR.
    pub fn or(a: [u8; 8], b: [u8; 8]) -> [u8; 8] {
        lanewise!(a, b, |x: u8, y: u8| x | y)
    }

    /// Lane-wise XOR.
    pub fn xor(a: [u8; 8], b: [u8; 8]) -> [u8; 8] {
        lanewise!(a, b, |x: u8, y: u8| x ^ y)
    }

    /// Lane-wise NOR.
    pub fn nor(a: [u8; 8], b: [u8; 8]) -> [u8; 8] {
        lanewise!(a, b, |x: u8, y: u8| !(x | y))
    }

    /// Logical left shift; counts are taken per lane, modulo 8.
    pub fn sll(a: [u8; 8], b: [u8; 8]) -> [u8; 8] {
        lanewise!(a, b, |x: u8, y: u8| x << (y & 7))
    }

    /// Logical right shift; counts are taken per lane, modulo 8.
    pub fn srl(a: [u8; 8], b: [u8; 8]) -> [u8; 8] {
        lanewise!(a, b, |x: u8, y: u8| x >> (y & 7))
    }

    /// Rounding average: `(a + b + 1) >> 1` at full precision.
    pub fn avg(a: [u8; 8], b: [u8; 8]) -> [u8; 8] {
        lanewise!(a, b, |x: u8, y: u8| {
            ((u16::from(x) + u16::from(y) + 1) >> 1) as u8
        })
    }

    /// Saturating absolute difference.
    pub fn abs_diff(a: [u8; 8], b: [u8; 8]) -> [u8; 8] {
        lanewise!(a, b, |x: u8, y: u8| x.abs_diff(y))
    }

    /// Lane equality mask.
    pub fn cmp_eq(a: [u8; 8], b: [u8; 8]) -> u8 {
        compare_mask!(a, b, |x, y| x == y)
    }

    /// Lane less-than mask.
    pub fn cmp_lt(a: [u8; 8], b: [u8; 8]) -> u8 {
        compare_mask!(a, b, |x, y| x < y)
    }

    /// Lane less-or-equal mask.
    pub fn cmp_le(a: [u8; 8], b: [u8; 8]) -> u8 {
        compare_mask!(a, b, |x, y| x <= y)
    }

    /// Condition-directed lane select: set bits take `a`, clear take `b`.
    pub fn pick(mask: u8, a: [u8; 8], b: [u8; 8]) -> [u8; 8] {
        pick_lanes!(mask, a, b)
    }

    /// Fixed cross-lane shuffle.
    pub fn shuffle(pattern: Shuffle, a: [u8; 8], b: [u8; 8]) -> [u8; 8] {
        let table = match pattern {
            Shuffle::MixHigh => [4, 12, 5, 13, 6, 14, 7, 15],
            Shuffle::MixLow => [0, 8, 1, 9, 2, 10, 3, 11],
            Shuffle::PackHigh => [12, 13, 14, 15, 4, 5, 6, 7],
            Shuffle::PackLow => [8, 9, 10, 11, 0, 1, 2, 3],
            Shuffle::RepeatA => [0, 0, 2, 2, 4, 4, 6, 6],
            Shuffle::RepeatB => [1, 1, 3, 3, 5, 5, 7, 7],
        };
        permute(a, b, table)
    }
}

/// Operations over four signed 16-bit lanes.
pub mod qh {
    use super::{permute, Shuffle};

    /// Saturating lane-wise addition.
    pub fn add_sat(a: [i16; 4], b: [i16; 4]) -> [i16; 4] {
        lanewise!(a, b, |x: i16, y: i16| x.saturating_add(y))
    }

    /// Saturating lane-wise subtraction.
    pub fn sub_sat(a: [i16; 4], b: [i16; 4]) -> [i16; 4] {
        lanewise!(a, b, |x: i16, y: i16| x.saturating_sub(y))
    }

    /// Saturating lane-wise multiplication.
    pub fn mul_sat(a: [i16; 4], b: [i16; 4]) -> [i16; 4] {
        lanewise!(a, b, |x: i16, y: i16| {
            let p = i32::from(x) * i32::from(y);
            p.clamp(i32::from(i16::MIN), i32::from(i16::MAX)) as i16
        })
    }

    /// Lane-wise minimum.
    pub fn min(a: [i16; 4], b: [i16; 4]) -> [i16; 4] {
        lanewise!(a, b, |x: i16, y: i16| x.min(y))
    }

    /// Lane-wise maximum.
    pub fn max(a: [i16; 4], b: [i16; 4]) -> [i16; 4] {
        lanewise!(a, b, |x: i16, y: i16| x.max(y))
    }

    /// Lane-wise AND.
    pub fn and(a: [i16; 4], b: [i16; 4]) -> [i16; 4] {
        lanewise!(a, b, |x: i16, y: i16| x & y)
    }

    /// Lane-wise OR.
    pub fn or(a: [i16; 4], b: [i16; 4]) -> [i16; 4] {
        lanewise!(a, b, |x: i16, y: i16| x | y)
    }

    /// Lane-wise XOR.
    pub fn xor(a: [i16; 4], b: [i16; 4]) -> [i16; 4] {
        lanewise!(a, b, |x: i16, y: i16| x ^ y)
    }

    /// Lane-wise NOR.
    pub fn nor(a: [i16; 4], b: [i16; 4]) -> [i16; 4] {
        lanewise!(a, b, |x: i16, y: i16| !(x | y))
    }

    /// Logical left shift; counts per lane, modulo 16.
    pub fn sll(a: [i16; 4], b: [i16; 4]) -> [i16; 4] {
        lanewise!(a, b, |x: i16, y: i16| {
            ((x as u16) << (y as u16 & 15)) as i16
        })
    }

    /// Logical right shift; counts per lane, modulo 16.
    pub fn srl(a: [i16; 4], b: [i16; 4]) -> [i16; 4] {
        lanewise!(a, b, |x: i16, y: i16| ((x as u16) >> (y as u16 & 15)) as i16)
    }

    /// Arithmetic right shift; counts per lane, modulo 16.
    pub fn sra(a: [i16; 4], b: [i16; 4]) -> [i16; 4] {
        lanewise!(a, b, |x: i16, y: i16| x >> (y as u16 & 15))
    }

    /// Sign/magnitude select: the magnitude of `a` carries the sign of `b`,
    /// and a zero in `b` zeroes the lane. Saturates at the minimum.
    pub fn sign_select(a: [i16; 4], b: [i16; 4]) -> [i16; 4] {
        lanewise!(a, b, |x: i16, y: i16| {
            if y > 0 {
                x
            } else if y < 0 {
                x.checked_neg().unwrap_or(i16::MAX)
            } else {
                0
            }
        })
    }

    /// Lane equality mask (bits 0-3).
    pub fn cmp_eq(a: [i16; 4], b: [i16; 4]) -> u8 {
        compare_mask!(a, b, |x, y| x == y)
    }

    /// Lane less-than mask (bits 0-3).
    pub fn cmp_lt(a: [i16; 4], b: [i16; 4]) -> u8 {
        compare_mask!(a, b, |x, y| x < y)
    }

    /// Lane less-or-equal mask (bits 0-3).
    pub fn cmp_le(a: [i16; 4], b: [i16; 4]) -> u8 {
        compare_mask!(a, b, |x, y| x <= y)
    }

    /// Condition-directed lane select: set bits take `a`, clear take `b`.
    pub fn pick(mask: u8, a: [i16; 4], b: [i16; 4]) -> [i16; 4] {
        pick_lanes!(mask, a, b)
    }

    /// Fixed cross-lane shuffle.
    pub fn shuffle(pattern: Shuffle, a: [i16; 4], b: [i16; 4]) -> [i16; 4] {
        let table = match pattern {
            Shuffle::MixHigh => [2, 6, 3, 7],
            Shuffle::MixLow => [0, 4, 1, 5],
            Shuffle::PackHigh => [6, 7, 2, 3],
            Shuffle::PackLow => [4, 5, 0, 1],
            Shuffle::RepeatA => [0, 0, 2, 2],
            Shuffle::RepeatB => [1, 1, 3, 3],
        };
        permute(a, b, table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ob_saturating_add_clamps_at_255() {
        let a = [255, 254, 0, 1, 100, 200, 128, 127];
        let b = [1, 1, 0, 255, 200, 100, 128, 1];
        assert_eq!(ob::add_sat(a, b), [255, 255, 0, 255, 255, 255, 255, 128]);
    }

    #[test]
    fn qh_saturating_add_clamps_at_extremes() {
        let a = [32767, -32768, 1000, -1000];
        let b = [1, -1, 1000, -1000];
        assert_eq!(qh::add_sat(a, b), [32767, -32768, 2000, -2000]);
    }

    #[test]
    fn ob_abs_diff_and_avg() {
        assert_eq!(
            ob::abs_diff([10, 3, 0, 255, 1, 1, 1, 1], [3, 10, 0, 0, 1, 2, 0, 1]),
            [7, 7, 0, 255, 0, 1, 1, 0]
        );
        assert_eq!(
            ob::avg([0, 1, 255, 254, 0, 0, 0, 0], [1, 1, 255, 255, 0, 0, 0, 0]),
            [1, 1, 255, 255, 0, 0, 0, 0]
        );
    }

    #[test]
    fn compare_then_pick_selects_lanewise() {
        let a = [1, 5, 3, 9];
        let b = [2, 4, 3, 8];
        let mask = qh::cmp_lt(a, b);
        assert_eq!(mask, 0b0001);
        assert_eq!(qh::pick(mask, a, b), [1, 4, 3, 8]);
    }

    #[test]
    fn shuffle_tables_are_fixed_permutations() {
        let a = [0, 1, 2, 3, 4, 5, 6, 7];
        let b = [10, 11, 12, 13, 14, 15, 16, 17];
        assert_eq!(ob::shuffle(Shuffle::MixLow, a, b), [0, 10, 1, 11, 2, 12, 3, 13]);
        assert_eq!(ob::shuffle(Shuffle::MixHigh, a, b), [4, 14, 5, 15, 6, 16, 7, 17]);
        assert_eq!(
            ob::shuffle(Shuffle::PackLow, a, b),
            [10, 11, 12, 13, 0, 1, 2, 3]
        );
        assert_eq!(qh::shuffle(Shuffle::RepeatA, [9, 8, 7, 6], [0; 4]), [9, 9, 7, 7]);
    }

    #[test]
    fn qh_sign_select_follows_sign_and_zero() {
        assert_eq!(
            qh::sign_select([5, 5, 5, -32768], [-1, 0, 2, -1]),
            [-5, 0, 5, 32767]
        );
    }
}
