//! Status.RE reversed byte order, observed by guest code.

use mipsim_core::core::arch::cp0::reg;

use crate::common::asm;
use crate::common::harness::{TestMachine, DATA_BASE};

#[test]
fn setting_reverse_endian_swaps_subsequent_word_loads() {
    let mut m = TestMachine::new();
    m.execute(&[
        asm::ori(1, 0, DATA_BASE as u16),
        asm::ori(2, 0, 0x1234),
        asm::sw(2, 1, 0), // big-endian bytes 00 00 12 34
        asm::mfc0(3, u32::from(reg::STATUS)),
        asm::lui(4, 0x0200), // Status.RE is bit 25
        asm::or_(3, 3, 4),
        asm::mtc0(3, u32::from(reg::STATUS)),
        asm::lw(5, 1, 0), // read back in the reversed order
        asm::break_(),
    ]);

    assert_eq!(m.gpr(5), 0x3412_0000);
}
