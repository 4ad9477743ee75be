/*!
branches.rs - Relative branch opcode handler (BPL/BMI/BVC/BVS/BCC/BCS/BNE/BEQ)

The relative operand resolves to the address of the signed displacement
byte; PC already points past it. When the condition holds, PC moves by the
displacement.

Cycle Rules
===========
Base cost: 2 cycles.
Taken: +1.
Taken and the target is on a different page than the next instruction: +2.
*/

use crate::bus::Bus;
use crate::cpu::addressing::Operand;
use crate::cpu::cycles::branch_penalty;
use crate::cpu::execute::{branch_target, get_flag};
use crate::cpu::regs::CpuRegs;
use crate::cpu::state::{CARRY, NEGATIVE, OVERFLOW, ZERO};
use crate::cpu::table::Instruction;

use super::operand_value;

pub(super) fn handle<C: CpuRegs>(
    instr: Instruction,
    cpu: &mut C,
    bus: &mut Bus,
    operand: Operand,
    cycles: &mut u32,
) -> bool {
    let take = match instr {
        Instruction::Bpl => !get_flag(cpu, NEGATIVE),
        Instruction::Bmi => get_flag(cpu, NEGATIVE),
        Instruction::Bvc => !get_flag(cpu, OVERFLOW),
        Instruction::Bvs => get_flag(cpu, OVERFLOW),
        Instruction::Bcc => !get_flag(cpu, CARRY),
        Instruction::Bcs => get_flag(cpu, CARRY),
        Instruction::Bne => !get_flag(cpu, ZERO),
        Instruction::Beq => get_flag(cpu, ZERO),
        _ => return false,
    };
    let offset = operand_value(cpu, bus, operand);
    if take {
        let from = cpu.pc();
        let to = branch_target(from, offset);
        cpu.set_pc(to);
        *cycles += branch_penalty(true, from, to);
    }
    true
}

#[cfg(test)]
mod tests {
    use crate::test_utils::{run_steps, setup_cpu};

    #[test]
    fn not_taken_costs_two() {
        // LDA #$01; BEQ +4
        let (mut cpu, mut bus) = setup_cpu(&[0xA9, 0x01, 0xF0, 0x04]);
        run_steps(&mut cpu, &mut bus, 1);
        assert_eq!(run_steps(&mut cpu, &mut bus, 1), 2);
        assert_eq!(cpu.pc(), 0x8004);
    }

    #[test]
    fn taken_same_page_costs_three() {
        // LDA #$01; BNE +2; (skipped 2 bytes); LDX #$07
        let (mut cpu, mut bus) = setup_cpu(&[0xA9, 0x01, 0xD0, 0x02, 0xEA, 0xEA, 0xA2, 0x07]);
        run_steps(&mut cpu, &mut bus, 1);
        assert_eq!(run_steps(&mut cpu, &mut bus, 1), 3);
        assert_eq!(cpu.pc(), 0x8006);
        run_steps(&mut cpu, &mut bus, 1);
        assert_eq!(cpu.x(), 0x07);
    }

    #[test]
    fn taken_backwards_across_page_costs_four() {
        // At $8000: BCC -3 -> $8002 - 3 = $7FFF
        let (mut cpu, mut bus) = setup_cpu(&[0x90, 0xFD]);
        assert_eq!(run_steps(&mut cpu, &mut bus, 1), 4);
        assert_eq!(cpu.pc(), 0x7FFF);
    }
}
