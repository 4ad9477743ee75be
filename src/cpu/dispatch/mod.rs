/*!
dispatch - Orchestrator for a single 6502 instruction step.

Overview
========
1. Fetch the opcode at PC; advance PC by 1.
2. Decode through the opcode table. Unknown bytes return
   `StepError::UnknownOpcode` with nothing mutated beyond the fetch.
3. Resolve the addressing mode into an `Operand` (consumes operand bytes).
4. Hand `(instruction, operand)` down the family chain; exactly one family
   claims each decoded instruction.
5. Finalize: base cycles + page-cross penalty + whatever the family added
   (branches).

Interrupt entry (`service_interrupt`) lives here too; the `Cpu` facade
decides when it runs.

Families
========
```text
    load_store   LDA LDX LDY STA STX STY
    arithmetic   ADC SBC
    logical      AND ORA EOR BIT
    compare      CMP CPX CPY
    rmw          ASL LSR ROL ROR INC DEC
    branches     BCC BCS BEQ BMI BNE BPL BVC BVS
    control_flow JMP JSR RTS RTI BRK
    misc         transfers, stack, flags, INX/INY/DEX/DEY, NOP and skips
```

Return Contract (families)
==========================
`handle` returns true when the instruction belongs to the family and has been
executed (cycles possibly increased), false otherwise.
*/

use crate::bus::Bus;
use crate::cpu::addressing::{Operand, resolve};
use crate::cpu::cycles::INTERRUPT_CYCLES;
use crate::cpu::execute::{push_status, push_word, set_flag};
use crate::cpu::regs::CpuRegs;
use crate::cpu::state::{IRQ_DISABLE, IRQ_VECTOR, NMI_VECTOR};
use crate::cpu::table::{Instruction, decode};
use crate::error::StepError;

pub(crate) mod arithmetic;
pub(crate) mod branches;
pub(crate) mod compare;
pub(crate) mod control_flow;
pub(crate) mod finalize;
pub(crate) mod load_store;
pub(crate) mod logical;
pub(crate) mod misc;
pub(crate) mod rmw;

/// Hardware interrupt sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interrupt {
    Nmi,
    Irq,
}

impl Interrupt {
    pub const fn vector(self) -> u16 {
        match self {
            Interrupt::Nmi => NMI_VECTOR,
            Interrupt::Irq => IRQ_VECTOR,
        }
    }
}

/// Fetch, decode and execute one instruction. Returns cycles consumed.
pub(crate) fn step<C: CpuRegs>(cpu: &mut C, bus: &mut Bus) -> Result<u32, StepError> {
    let pc = cpu.pc();
    let opcode = bus.read(pc);
    cpu.advance_pc(1);

    let Some((instr, mode)) = decode(opcode) else {
        return Err(finalize::unknown_opcode(opcode, pc));
    };

    let operand = resolve(mode, cpu, bus);
    let mut extra = 0;
    if !execute(instr, cpu, bus, operand, &mut extra) {
        return Err(finalize::unknown_opcode(opcode, pc));
    }
    Ok(finalize::total_cycles(instr, mode, operand, extra))
}

/// Run the family chain for an already-resolved operand.
fn execute<C: CpuRegs>(
    instr: Instruction,
    cpu: &mut C,
    bus: &mut Bus,
    operand: Operand,
    cycles: &mut u32,
) -> bool {
    load_store::handle(instr, cpu, bus, operand, cycles)
        || arithmetic::handle(instr, cpu, bus, operand, cycles)
        || logical::handle(instr, cpu, bus, operand, cycles)
        || compare::handle(instr, cpu, bus, operand, cycles)
        || rmw::handle(instr, cpu, bus, operand, cycles)
        || branches::handle(instr, cpu, bus, operand, cycles)
        || control_flow::handle(instr, cpu, bus, operand, cycles)
        || misc::handle(instr, cpu, bus, operand, cycles)
}

/// Interrupt entry: push PC, push P with B clear, set I, jump through the
/// vector. Returns the cycles consumed.
pub(crate) fn service_interrupt<C: CpuRegs>(cpu: &mut C, bus: &mut Bus, kind: Interrupt) -> u32 {
    let pc = cpu.pc();
    push_word(cpu, bus, pc);
    push_status(cpu, bus, false);
    set_flag(cpu, IRQ_DISABLE, true);
    let target = bus.read_word(kind.vector());
    cpu.set_pc(target);
    log::debug!("{kind:?} taken at ${pc:04X} -> ${target:04X}");
    INTERRUPT_CYCLES
}

/// Value of an operand: A for accumulator mode, the byte at the effective
/// address otherwise.
#[inline]
pub(super) fn operand_value<C: CpuRegs>(cpu: &C, bus: &mut Bus, operand: Operand) -> u8 {
    match operand {
        Operand::Memory { addr, .. } => bus.read(addr),
        Operand::Accumulator => cpu.a(),
        Operand::Implied => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cpu::state::{BREAK, CpuState, UNUSED};
    use crate::test_utils::setup_cpu;

    #[test]
    fn unknown_opcode_only_consumes_fetch() {
        let (mut cpu, mut bus) = setup_cpu(&[0x02, 0xEA]);
        let before = *cpu.state();
        let err = step(cpu.state_mut(), &mut bus).unwrap_err();
        assert_eq!(
            err,
            StepError::UnknownOpcode {
                opcode: 0x02,
                pc: 0x8000
            }
        );
        let after = *cpu.state();
        assert_eq!(after.pc, 0x8001);
        assert_eq!(CpuState { pc: before.pc, ..after }, before);

        // The session continues with the next byte
        assert_eq!(step(cpu.state_mut(), &mut bus), Ok(2));
    }

    #[test]
    fn nmi_entry_pushes_return_state() {
        let (mut cpu, mut bus) = setup_cpu(&[0xEA]);
        bus.poke(0xFFFA, 0x00);
        bus.poke(0xFFFB, 0x90);
        cpu.set_status(UNUSED);
        let cycles = service_interrupt(cpu.state_mut(), &mut bus, Interrupt::Nmi);
        assert_eq!(cycles, 7);
        assert_eq!(cpu.pc(), 0x9000);
        assert_eq!(cpu.sp(), 0xFA);
        // Stack: PCH, PCL, P (B clear, bit 5 set)
        assert_eq!(bus.peek(0x01FD), 0x80);
        assert_eq!(bus.peek(0x01FC), 0x00);
        assert_eq!(bus.peek(0x01FB) & (BREAK | UNUSED), UNUSED);
        assert!(cpu.get_flag(IRQ_DISABLE));
    }

    #[test]
    fn page_cross_penalty_only_for_reads() {
        // LDX #$01; LDA $12FF,X; STA $12FF,X
        let (mut cpu, mut bus) = setup_cpu(&[0xA2, 0x01, 0xBD, 0xFF, 0x12, 0x9D, 0xFF, 0x12]);
        assert_eq!(step(cpu.state_mut(), &mut bus), Ok(2));
        assert_eq!(step(cpu.state_mut(), &mut bus), Ok(5));
        assert_eq!(step(cpu.state_mut(), &mut bus), Ok(5));
    }
}
