/*!
compare.rs - CMP / CPX / CPY opcode family handler

result = register - operand (8-bit wrap); Z/N from the result and
C = register >= operand (unsigned). No register changes.
*/

use crate::bus::Bus;
use crate::cpu::addressing::Operand;
use crate::cpu::execute::compare;
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
    let reg = match instr {
        Instruction::Cmp => cpu.a(),
        Instruction::Cpx => cpu.x(),
        Instruction::Cpy => cpu.y(),
        _ => return false,
    };
    let v = operand_value(cpu, bus, operand);
    compare(cpu, reg, v);
    true
}
