/*!
logical.rs - AND / ORA / EOR / BIT opcode family handler

AND, ORA, EOR combine the operand into A and update Z/N.
BIT leaves A alone: Z from A & M, N and V from bits 7 and 6 of M.
*/

use crate::bus::Bus;
use crate::cpu::addressing::Operand;
use crate::cpu::execute::{and, bit, eor, ora};
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
        Instruction::And => and,
        Instruction::Ora => ora,
        Instruction::Eor => eor,
        Instruction::Bit => bit,
        _ => return false,
    };
    let v = operand_value(cpu, bus, operand);
    op(cpu, v);
    true
}

#[cfg(test)]
mod tests {
    use crate::cpu::state::{NEGATIVE, OVERFLOW, ZERO};
    use crate::test_utils::{run_steps, setup_cpu};

    #[test]
    fn and_ora_eor_chain() {
        // LDA #$F0; AND #$3C; ORA #$01; EOR #$FF
        let (mut cpu, mut bus) = setup_cpu(&[0xA9, 0xF0, 0x29, 0x3C, 0x09, 0x01, 0x49, 0xFF]);
        run_steps(&mut cpu, &mut bus, 2);
        assert_eq!(cpu.a(), 0x30);
        run_steps(&mut cpu, &mut bus, 1);
        assert_eq!(cpu.a(), 0x31);
        run_steps(&mut cpu, &mut bus, 1);
        assert_eq!(cpu.a(), 0xCE);
        assert!(cpu.get_flag(NEGATIVE));
    }

    #[test]
    fn bit_copies_high_bits_and_keeps_a() {
        // LDA #$01; BIT $10
        let (mut cpu, mut bus) = setup_cpu(&[0xA9, 0x01, 0x24, 0x10]);
        bus.poke(0x0010, 0xC0);
        let cycles = run_steps(&mut cpu, &mut bus, 2);
        assert_eq!(cycles, 2 + 3);
        assert_eq!(cpu.a(), 0x01);
        assert!(cpu.get_flag(ZERO));
        assert!(cpu.get_flag(NEGATIVE));
        assert!(cpu.get_flag(OVERFLOW));
    }
}
