/*!
misc.rs - Transfers / Stack / Flags / Register inc-dec / NOP family handler

Transfers:
  TAX, TAY, TXA, TYA, TSX (update Z/N), TXS (no flags)

Stack:
  PHA, PLA, PHP (bit 4 set in the pushed copy), PLP (bit 4 cleared, bit 5 forced)

Flag operations:
  CLC SEC CLI SEI CLD SED CLV

Register increment / decrement:
  INX INY DEX DEY

No-ops:
  NOP and the undocumented single-byte NOPs; SKB/SKW whose operand bytes were
  consumed during addressing resolution and are otherwise ignored.

Fixed timing; this handler never alters the cycle count.
*/

use crate::bus::Bus;
use crate::cpu::addressing::Operand;
use crate::cpu::execute::{lda, ldx, ldy, pha, php, pla, plp, set_flag};
use crate::cpu::regs::CpuRegs;
use crate::cpu::state::{CARRY, DECIMAL, IRQ_DISABLE, OVERFLOW};
use crate::cpu::table::Instruction;

pub(super) fn handle<C: CpuRegs>(
    instr: Instruction,
    cpu: &mut C,
    bus: &mut Bus,
    _operand: Operand,
    _cycles: &mut u32,
) -> bool {
    match instr {
        // Transfers
        Instruction::Tax => {
            let v = cpu.a();
            ldx(cpu, v);
        }
        Instruction::Tay => {
            let v = cpu.a();
            ldy(cpu, v);
        }
        Instruction::Txa => {
            let v = cpu.x();
            lda(cpu, v);
        }
        Instruction::Tya => {
            let v = cpu.y();
            lda(cpu, v);
        }
        Instruction::Tsx => {
            let v = cpu.sp();
            ldx(cpu, v);
        }
        Instruction::Txs => {
            let v = cpu.x();
            cpu.set_sp(v);
        }

        // Stack
        Instruction::Pha => pha(cpu, bus),
        Instruction::Pla => pla(cpu, bus),
        Instruction::Php => php(cpu, bus),
        Instruction::Plp => plp(cpu, bus),

        // Flags
        Instruction::Clc => set_flag(cpu, CARRY, false),
        Instruction::Sec => set_flag(cpu, CARRY, true),
        Instruction::Cli => set_flag(cpu, IRQ_DISABLE, false),
        Instruction::Sei => set_flag(cpu, IRQ_DISABLE, true),
        Instruction::Cld => set_flag(cpu, DECIMAL, false),
        Instruction::Sed => set_flag(cpu, DECIMAL, true),
        Instruction::Clv => set_flag(cpu, OVERFLOW, false),

        // Register inc / dec
        Instruction::Inx => {
            let v = cpu.x().wrapping_add(1);
            ldx(cpu, v);
        }
        Instruction::Iny => {
            let v = cpu.y().wrapping_add(1);
            ldy(cpu, v);
        }
        Instruction::Dex => {
            let v = cpu.x().wrapping_sub(1);
            ldx(cpu, v);
        }
        Instruction::Dey => {
            let v = cpu.y().wrapping_sub(1);
            ldy(cpu, v);
        }

        Instruction::Nop | Instruction::Skb | Instruction::Skw => {}

        _ => return false,
    }
    true
}
