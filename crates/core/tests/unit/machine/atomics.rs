//! Load-linked / store-conditional sequences through whole programs.

use crate::common::asm;
use crate::common::harness::{TestMachine, DATA_BASE};

#[test]
fn undisturbed_link_lets_the_conditional_store_succeed() {
    let mut m = TestMachine::new();
    m.execute(&[
        asm::ori(4, 0, DATA_BASE as u16),
        asm::ori(2, 0, 5),
        asm::sw(2, 4, 0),
        asm::ll(5, 4, 0),
        asm::sc(5, 4, 0), // writes 5 back, r5 becomes the success flag
        asm::lw(6, 4, 0),
        asm::break_(),
    ]);

    assert_eq!(m.gpr(5), 1);
    assert_eq!(m.gpr(6), 5);
}

#[test]
fn intervening_store_fails_the_conditional_store() {
    let mut m = TestMachine::new();
    m.execute(&[
        asm::ori(4, 0, DATA_BASE as u16),
        asm::ori(2, 0, 7),
        asm::sw(2, 4, 0),
        asm::ll(5, 4, 0),
        asm::sw(2, 4, 0), // any store breaks the reservation
        asm::ori(6, 0, 9),
        asm::sc(6, 4, 0),
        asm::lw(7, 4, 0),
        asm::break_(),
    ]);

    assert_eq!(m.gpr(6), 0, "conditional store must report failure");
    assert_eq!(m.gpr(7), 7, "failed conditional store must not write");
}
