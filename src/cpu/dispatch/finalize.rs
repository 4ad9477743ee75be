/*!
finalize.rs - Instruction cycle finalization and the unknown-opcode exit.

Overview
========
- `total_cycles`: documented base cycles, +1 when a read instruction's
  indexed address crossed a page, plus the family's own additions (taken
  branches). The returned count is what the driver uses to advance the
  video unit.
- `unknown_opcode`: logs the byte and builds the step error. PC has already
  moved past the opcode; nothing else is touched.
*/

use crate::cpu::addressing::{AddressingMode, Operand};
use crate::cpu::cycles::{base_cycles, page_penalty};
use crate::cpu::table::Instruction;
use crate::error::StepError;

pub(crate) fn total_cycles(
    instr: Instruction,
    mode: AddressingMode,
    operand: Operand,
    extra: u32,
) -> u32 {
    base_cycles(instr, mode) + page_penalty(instr, operand) + extra
}

pub(crate) fn unknown_opcode(opcode: u8, pc: u16) -> StepError {
    log::warn!("unknown opcode ${opcode:02X} at ${pc:04X}");
    StepError::UnknownOpcode { opcode, pc }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adds_penalties_on_top_of_base() {
        let crossed = Operand::Memory {
            addr: 0x0300,
            page_crossed: true,
        };
        assert_eq!(
            total_cycles(Instruction::Lda, AddressingMode::IndirectIndexed, crossed, 0),
            6
        );
        assert_eq!(
            total_cycles(Instruction::Bne, AddressingMode::Relative, crossed, 2),
            4
        );
    }

    #[test]
    fn unknown_opcode_carries_byte_and_address() {
        assert_eq!(
            unknown_opcode(0xFF, 0x1234),
            StepError::UnknownOpcode {
                opcode: 0xFF,
                pc: 0x1234
            }
        );
    }
}
