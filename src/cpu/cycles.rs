/*!
cycles.rs - Cycle timing for the 6502 CPU core.

Purpose
=======
  - `base_cycles(instr, mode)` : documented cycle count for one instruction,
                                 not including dynamic penalties.
  - `page_penalty(instr, op)`  : +1 when a read instruction's indexed
                                 effective address crossed a page.
  - `branch_penalty(..)`       : +1 for a taken branch, +1 more when the
                                 target lies on a different page.

Interrupt entry costs `INTERRUPT_CYCLES`.
*/

use crate::cpu::addressing::{AddressingMode, Operand};
use crate::cpu::table::Instruction;

/// NMI / IRQ entry sequence.
pub const INTERRUPT_CYCLES: u32 = 7;

/// Base cycle count for a decoded instruction.
pub(crate) fn base_cycles(instr: Instruction, mode: AddressingMode) -> u32 {
    use AddressingMode as M;
    use Instruction as I;

    match instr {
        I::Brk => 7,
        I::Rti | I::Rts | I::Jsr => 6,
        I::Pha | I::Php => 3,
        I::Pla | I::Plp => 4,
        I::Jmp => match mode {
            M::Indirect => 5,
            _ => 3,
        },
        _ if instr.is_branch() => 2,
        _ if instr.is_rmw() => match mode {
            M::Accumulator => 2,
            M::ZeroPage => 5,
            M::ZeroPageX | M::Absolute => 6,
            _ => 7,
        },
        // Stores always pay for the indexed address fix-up.
        I::Sta | I::Stx | I::Sty => match mode {
            M::ZeroPage => 3,
            M::ZeroPageX | M::ZeroPageY | M::Absolute => 4,
            M::AbsoluteX | M::AbsoluteY => 5,
            _ => 6,
        },
        // Loads, ALU, compares, BIT and the skip opcodes.
        _ => match mode {
            M::Implied | M::Accumulator | M::Immediate | M::Relative => 2,
            M::ZeroPage => 3,
            M::ZeroPageX | M::ZeroPageY | M::Absolute | M::AbsoluteX | M::AbsoluteY => 4,
            M::IndirectIndexed | M::Indirect => 5,
            M::IndexedIndirect => 6,
        },
    }
}

/// +1 for a read instruction whose indexed address crossed a page.
#[inline]
pub(crate) fn page_penalty(instr: Instruction, operand: Operand) -> u32 {
    u32::from(instr.reads_memory() && operand.page_crossed())
}

/// Extra cycles for a branch: 0 not taken, 1 taken, 2 taken across pages.
#[inline]
pub(crate) fn branch_penalty(taken: bool, from: u16, to: u16) -> u32 {
    match taken {
        false => 0,
        true if (from & 0xFF00) != (to & 0xFF00) => 2,
        true => 1,
    }
}
