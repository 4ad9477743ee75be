/*!
rmw.rs - Shift / rotate / INC / DEC opcode family handler

Accumulator mode (ASL A, LSR A, ROL A, ROR A) transforms A in place.
Memory modes run the read -> write-old -> write-new choreography from
`execute::rmw_memory`, so a hooked register sees two writes.

Carry for shifts and rotates is captured from the outgoing bit before the
shift; rotates feed the old carry into the vacated bit.
*/

use crate::bus::Bus;
use crate::cpu::addressing::Operand;
use crate::cpu::execute::{asl, lsr, rmw_memory, rol, ror};
use crate::cpu::regs::CpuRegs;
use crate::cpu::table::Instruction;

pub(super) fn handle<C: CpuRegs>(
    instr: Instruction,
    cpu: &mut C,
    bus: &mut Bus,
    operand: Operand,
    _cycles: &mut u32,
) -> bool {
    let op: fn(&mut C, u8) -> u8 = match instr {
        Instruction::Asl => asl,
        Instruction::Lsr => lsr,
        Instruction::Rol => rol,
        Instruction::Ror => ror,
        Instruction::Inc => inc,
        Instruction::Dec => dec,
        _ => return false,
    };
    match operand {
        Operand::Accumulator => {
            let a = cpu.a();
            let r = op(cpu, a);
            cpu.set_a(r);
        }
        Operand::Memory { addr, .. } => {
            rmw_memory(cpu, bus, addr, op);
        }
        Operand::Implied => return false,
    }
    true
}

fn inc<C: CpuRegs>(cpu: &mut C, v: u8) -> u8 {
    let r = v.wrapping_add(1);
    cpu.update_zn(r);
    r
}

fn dec<C: CpuRegs>(cpu: &mut C, v: u8) -> u8 {
    let r = v.wrapping_sub(1);
    cpu.update_zn(r);
    r
}

#[cfg(test)]
mod tests {
    use crate::cpu::state::{CARRY, NEGATIVE, ZERO};
    use crate::test_utils::{run_steps, setup_cpu};
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn asl_accumulator_sets_carry_from_bit7() {
        // LDA #$81; ASL A
        let (mut cpu, mut bus) = setup_cpu(&[0xA9, 0x81, 0x0A]);
        run_steps(&mut cpu, &mut bus, 2);
        assert_eq!(cpu.a(), 0x02);
        assert!(cpu.get_flag(CARRY));
    }

    #[test]
    fn ror_memory_rotates_carry_in() {
        // SEC; ROR $10
        let (mut cpu, mut bus) = setup_cpu(&[0x38, 0x66, 0x10]);
        bus.poke(0x0010, 0x01);
        let cycles = run_steps(&mut cpu, &mut bus, 2);
        assert_eq!(bus.peek(0x0010), 0x80);
        assert!(cpu.get_flag(CARRY));
        assert!(cpu.get_flag(NEGATIVE));
        assert_eq!(cycles, 2 + 5);
    }

    #[test]
    fn dec_abs_x_wraps_to_ff() {
        // LDX #$01; DEC $01FF,X
        let (mut cpu, mut bus) = setup_cpu(&[0xA2, 0x01, 0xDE, 0xFF, 0x01]);
        let cycles = run_steps(&mut cpu, &mut bus, 2);
        assert_eq!(bus.peek(0x0200), 0xFF);
        assert!(cpu.get_flag(NEGATIVE));
        // RMW never pays the page-cross penalty
        assert_eq!(cycles, 2 + 7);
    }

    #[test]
    fn inc_memory_writes_old_value_first() {
        // INC $0300
        let (mut cpu, mut bus) = setup_cpu(&[0xEE, 0x00, 0x03]);
        let writes = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&writes);
        bus.bind_write_hook(0x0300, move |v| sink.borrow_mut().push(v));
        bus.poke(0x0300, 0xFF);
        run_steps(&mut cpu, &mut bus, 1);
        assert_eq!(*writes.borrow(), vec![0xFF, 0x00]);
        assert!(cpu.get_flag(ZERO));
    }
}
