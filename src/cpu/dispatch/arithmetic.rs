/*!
arithmetic.rs - ADC / SBC opcode family handler

Operand comes from any of the eight ALU addressing modes. Page-cross
penalties for absolute-X/Y and (zp),Y are applied during finalization.
Binary arithmetic only; the decimal flag is ignored.
*/

use crate::bus::Bus;
use crate::cpu::addressing::Operand;
use crate::cpu::execute::{adc, sbc};
use crate::cpu::regs::CpuRegs;
use crate::cpu::table::Instruction;

use super::operand_value;

pub(super) fn handle<C: CpuRegs>(
    instr: Instruction,
    cpu: &mut C,
    bus: &mut Bus,
    operand: Operand,
    _cycles: &mut u32,
) -> bool {
    let op: fn(&mut C, u8) = match instr {
        Instruction::Adc => adc,
        Instruction::Sbc => sbc,
        _ => return false,
    };
    let v = operand_value(cpu, bus, operand);
    op(cpu, v);
    true
}
