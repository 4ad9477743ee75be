/*!
load_store.rs - Load / Store opcode family handler

Loads:  LDA, LDX, LDY (update Z/N)
Stores: STA, STX, STY (no flag changes)

Stores write through the bus so hooked registers (PPU ports) see them.
Indexed loads pay the page-cross cycle during finalization; stores never do.
*/

use crate::bus::Bus;
use crate::cpu::addressing::Operand;
use crate::cpu::execute::{lda, ldx, ldy};
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
    match instr {
        Instruction::Lda => {
            let v = operand_value(cpu, bus, operand);
            lda(cpu, v);
        }
        Instruction::Ldx => {
            let v = operand_value(cpu, bus, operand);
            ldx(cpu, v);
        }
        Instruction::Ldy => {
            let v = operand_value(cpu, bus, operand);
            ldy(cpu, v);
        }
        Instruction::Sta => store(bus, operand, cpu.a()),
        Instruction::Stx => store(bus, operand, cpu.x()),
        Instruction::Sty => store(bus, operand, cpu.y()),
        _ => return false,
    }
    true
}

#[inline]
fn store(bus: &mut Bus, operand: Operand, value: u8) {
    if let Some(addr) = operand.address() {
        bus.write(addr, value);
    }
}

#[cfg(test)]
mod tests {
    use crate::cpu::state::{NEGATIVE, ZERO};
    use crate::test_utils::{run_steps, setup_cpu};

    #[test]
    fn lda_immediate_sets_flags() {
        // LDA #$00; LDA #$80
        let (mut cpu, mut bus) = setup_cpu(&[0xA9, 0x00, 0xA9, 0x80]);
        run_steps(&mut cpu, &mut bus, 1);
        assert!(cpu.get_flag(ZERO));
        run_steps(&mut cpu, &mut bus, 1);
        assert_eq!(cpu.a(), 0x80);
        assert!(cpu.get_flag(NEGATIVE));
        assert!(!cpu.get_flag(ZERO));
    }

    #[test]
    fn stx_zero_page_y_wraps() {
        // LDX #$5A; LDY #$10; STX $F8,Y -> $08
        let (mut cpu, mut bus) = setup_cpu(&[0xA2, 0x5A, 0xA0, 0x10, 0x96, 0xF8]);
        let cycles = run_steps(&mut cpu, &mut bus, 3);
        assert_eq!(bus.peek(0x0008), 0x5A);
        assert_eq!(cycles, 2 + 2 + 4);
    }

    #[test]
    fn sta_indirect_indexed_stores_through_pointer() {
        // LDA #$77; LDY #$02; STA ($40),Y
        let (mut cpu, mut bus) = setup_cpu(&[0xA9, 0x77, 0xA0, 0x02, 0x91, 0x40]);
        bus.poke(0x0040, 0x00);
        bus.poke(0x0041, 0x03);
        run_steps(&mut cpu, &mut bus, 3);
        assert_eq!(bus.peek(0x0302), 0x77);
    }

    #[test]
    fn ldy_abs_x_reads_memory() {
        // LDX #$03; LDY $0200,X
        let (mut cpu, mut bus) = setup_cpu(&[0xA2, 0x03, 0xBC, 0x00, 0x02]);
        bus.poke(0x0203, 0x42);
        run_steps(&mut cpu, &mut bus, 2);
        assert_eq!(cpu.y(), 0x42);
    }
}
