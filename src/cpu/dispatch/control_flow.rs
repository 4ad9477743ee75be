/*!
control_flow.rs - JMP / JSR / RTS / RTI / BRK handler

Overview
========
JMP abs / JMP (ind):
  PC = effective address (the indirect form already carries the page-wrap
  quirk from addressing resolution).

JSR abs:
  Push (PC - 1), the address of the last byte of the JSR, high byte first.
  PC = target.

RTS:
  Pull word, PC = value + 1.

RTI:
  Pull status (bit 4 cleared, bit 5 forced), then pull PC. No +1.

BRK:
  Push PC (the byte after the opcode), push P with bit 4 set, set B and I in
  the register, then PC = word at $FFFE/$FFFF.

All timing is fixed by the base cycle table.
*/

use crate::bus::Bus;
use crate::cpu::addressing::Operand;
use crate::cpu::execute::{plp, pop_word, push_status, push_word, set_flag};
use crate::cpu::regs::CpuRegs;
use crate::cpu::state::{BREAK, IRQ_DISABLE, IRQ_VECTOR};
use crate::cpu::table::Instruction;

pub(super) fn handle<C: CpuRegs>(
    instr: Instruction,
    cpu: &mut C,
    bus: &mut Bus,
    operand: Operand,
    _cycles: &mut u32,
) -> bool {
    match instr {
        Instruction::Jmp => {
            let Some(target) = operand.address() else {
                return false;
            };
            cpu.set_pc(target);
        }
        Instruction::Jsr => {
            let Some(target) = operand.address() else {
                return false;
            };
            let ret = cpu.pc().wrapping_sub(1);
            push_word(cpu, bus, ret);
            cpu.set_pc(target);
        }
        Instruction::Rts => {
            let ret = pop_word(cpu, bus);
            cpu.set_pc(ret.wrapping_add(1));
        }
        Instruction::Rti => {
            plp(cpu, bus);
            let pc = pop_word(cpu, bus);
            cpu.set_pc(pc);
        }
        Instruction::Brk => {
            let pc = cpu.pc();
            push_word(cpu, bus, pc);
            push_status(cpu, bus, true);
            set_flag(cpu, BREAK, true);
            set_flag(cpu, IRQ_DISABLE, true);
            let target = bus.read_word(IRQ_VECTOR);
            cpu.set_pc(target);
        }
        _ => return false,
    }
    true
}
