/*!
addressing.rs - 6502 addressing modes and effective-address resolution.

Overview
========
Every instruction names one of thirteen addressing modes. Resolving a mode
consumes 0, 1 or 2 operand bytes from PC onward and yields an `Operand`:

- `Operand::Implied`     - no operand (CLC, TAX, RTS, ..).
- `Operand::Accumulator` - instruction reads/writes A directly (ASL A, ..).
- `Operand::Memory`      - an effective ADDRESS, never a value. Immediate and
  relative modes point into the instruction stream itself.

The resolver reports page crossings for absolute-X, absolute-Y and
indirect-indexed so read instructions can add their +1 cycle. It never ticks
anything and never reads the effective address itself.

Quirks reproduced
=================
- Zero-page indexed modes wrap within page zero.
- Indexed-indirect and indirect-indexed pointer fetches wrap within page zero.
- JMP (indirect): when the pointer's low byte sits at $xxFF, the high byte is
  fetched from $xx00 of the SAME page.

Caller Assumptions
==================
PC points at the first operand byte (the opcode has been consumed).
*/

use crate::bus::Bus;
use crate::cpu::regs::CpuRegs;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressingMode {
    Implied,
    Accumulator,
    Immediate,
    ZeroPage,
    ZeroPageX,
    ZeroPageY,
    Relative,
    Absolute,
    AbsoluteX,
    AbsoluteY,
    Indirect,
    IndexedIndirect,
    IndirectIndexed,
}

impl AddressingMode {
    /// Operand bytes following the opcode.
    pub const fn operand_len(self) -> u16 {
        match self {
            AddressingMode::Implied | AddressingMode::Accumulator => 0,
            AddressingMode::Immediate
            | AddressingMode::ZeroPage
            | AddressingMode::ZeroPageX
            | AddressingMode::ZeroPageY
            | AddressingMode::Relative
            | AddressingMode::IndexedIndirect
            | AddressingMode::IndirectIndexed => 1,
            AddressingMode::Absolute
            | AddressingMode::AbsoluteX
            | AddressingMode::AbsoluteY
            | AddressingMode::Indirect => 2,
        }
    }
}

/// Resolved operand location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    Implied,
    Accumulator,
    Memory { addr: u16, page_crossed: bool },
}

impl Operand {
    #[inline]
    fn at(addr: u16) -> Self {
        Operand::Memory {
            addr,
            page_crossed: false,
        }
    }

    /// Effective address, if the operand lives in memory.
    #[inline]
    pub fn address(self) -> Option<u16> {
        match self {
            Operand::Memory { addr, .. } => Some(addr),
            _ => None,
        }
    }

    #[inline]
    pub fn page_crossed(self) -> bool {
        matches!(
            self,
            Operand::Memory {
                page_crossed: true,
                ..
            }
        )
    }
}

/// Resolve `mode`, consuming its operand bytes.
pub(crate) fn resolve<C: CpuRegs>(mode: AddressingMode, cpu: &mut C, bus: &mut Bus) -> Operand {
    match mode {
        AddressingMode::Implied => Operand::Implied,
        AddressingMode::Accumulator => Operand::Accumulator,
        AddressingMode::Immediate | AddressingMode::Relative => {
            let addr = cpu.pc();
            cpu.advance_pc(1);
            Operand::at(addr)
        }
        AddressingMode::ZeroPage => Operand::at(addr_zp(cpu, bus)),
        AddressingMode::ZeroPageX => Operand::at(addr_zp_x(cpu, bus)),
        AddressingMode::ZeroPageY => Operand::at(addr_zp_y(cpu, bus)),
        AddressingMode::Absolute => Operand::at(fetch_word(cpu, bus)),
        AddressingMode::AbsoluteX => {
            let x = cpu.x();
            indexed(fetch_word(cpu, bus), x)
        }
        AddressingMode::AbsoluteY => {
            let y = cpu.y();
            indexed(fetch_word(cpu, bus), y)
        }
        AddressingMode::Indirect => {
            let ptr = fetch_word(cpu, bus);
            Operand::at(read_word_indirect_bug(bus, ptr))
        }
        AddressingMode::IndexedIndirect => {
            let zp = fetch_byte(cpu, bus).wrapping_add(cpu.x());
            Operand::at(read_word_zp(bus, zp))
        }
        AddressingMode::IndirectIndexed => {
            let zp = fetch_byte(cpu, bus);
            let y = cpu.y();
            indexed(read_word_zp(bus, zp), y)
        }
    }
}

#[inline]
fn indexed(base: u16, index: u8) -> Operand {
    let addr = base.wrapping_add(index as u16);
    Operand::Memory {
        addr,
        page_crossed: (base & 0xFF00) != (addr & 0xFF00),
    }
}

// -------------------------
// Instruction stream fetch
// -------------------------

/// Fetch next byte from the instruction stream, incrementing PC.
pub(crate) fn fetch_byte<C: CpuRegs>(cpu: &mut C, bus: &mut Bus) -> u8 {
    let v = bus.read(cpu.pc());
    cpu.advance_pc(1);
    v
}

/// Fetch next little-endian word (low, then high), incrementing PC twice.
pub(crate) fn fetch_word<C: CpuRegs>(cpu: &mut C, bus: &mut Bus) -> u16 {
    let lo = fetch_byte(cpu, bus) as u16;
    let hi = fetch_byte(cpu, bus) as u16;
    (hi << 8) | lo
}

#[inline]
fn addr_zp<C: CpuRegs>(cpu: &mut C, bus: &mut Bus) -> u16 {
    fetch_byte(cpu, bus) as u16
}

#[inline]
fn addr_zp_x<C: CpuRegs>(cpu: &mut C, bus: &mut Bus) -> u16 {
    fetch_byte(cpu, bus).wrapping_add(cpu.x()) as u16
}

#[inline]
fn addr_zp_y<C: CpuRegs>(cpu: &mut C, bus: &mut Bus) -> u16 {
    fetch_byte(cpu, bus).wrapping_add(cpu.y()) as u16
}

// -------------------------
// Pointer reads
// -------------------------

/// 16-bit pointer from zero page; the high byte wraps to $00 after $FF.
#[inline]
pub(crate) fn read_word_zp(bus: &mut Bus, base: u8) -> u16 {
    let lo = bus.read(base as u16) as u16;
    let hi = bus.read(base.wrapping_add(1) as u16) as u16;
    (hi << 8) | lo
}

/// JMP (indirect) pointer read: the high byte never carries into the next page.
#[inline]
pub(crate) fn read_word_indirect_bug(bus: &mut Bus, addr: u16) -> u16 {
    let lo = bus.read(addr) as u16;
    let hi_addr = (addr & 0xFF00) | (addr.wrapping_add(1) & 0x00FF);
    let hi = bus.read(hi_addr) as u16;
    (hi << 8) | lo
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cpu::state::CpuState;

    fn at(pc: u16, bytes: &[u8]) -> (CpuState, Bus) {
        let mut bus = Bus::cpu();
        for (i, b) in bytes.iter().enumerate() {
            bus.poke(pc.wrapping_add(i as u16), *b);
        }
        let mut cpu = CpuState::new();
        cpu.set_pc(pc);
        (cpu, bus)
    }

    #[test]
    fn immediate_points_into_instruction_stream() {
        let (mut cpu, mut bus) = at(0x8001, &[0x42]);
        let op = resolve(AddressingMode::Immediate, &mut cpu, &mut bus);
        assert_eq!(op.address(), Some(0x8001));
        assert_eq!(cpu.pc(), 0x8002);
    }

    #[test]
    fn zero_page_x_wraps() {
        let (mut cpu, mut bus) = at(0x8000, &[0xF0]);
        cpu.set_x(0x20);
        let op = resolve(AddressingMode::ZeroPageX, &mut cpu, &mut bus);
        assert_eq!(op.address(), Some(0x0010));
    }

    #[test]
    fn abs_x_page_cross_detection() {
        let (mut cpu, mut bus) = at(0x8000, &[0xF5, 0x80]);
        cpu.set_x(0x10);
        let op = resolve(AddressingMode::AbsoluteX, &mut cpu, &mut bus);
        assert_eq!(
            op,
            Operand::Memory {
                addr: 0x8105,
                page_crossed: true
            }
        );
        assert_eq!(cpu.pc(), 0x8002);
    }

    #[test]
    fn indirect_indexed_wraps_pointer_in_zero_page() {
        let (mut cpu, mut bus) = at(0x8000, &[0xFF]);
        bus.poke(0x00FF, 0x00);
        bus.poke(0x0000, 0x03);
        cpu.set_y(0x05);
        let op = resolve(AddressingMode::IndirectIndexed, &mut cpu, &mut bus);
        assert_eq!(op.address(), Some(0x0305));
        assert!(!op.page_crossed());
    }

    #[test]
    fn indexed_indirect_adds_x_before_dereference() {
        let (mut cpu, mut bus) = at(0x8000, &[0x20]);
        cpu.set_x(0x04);
        bus.poke(0x0024, 0x74);
        bus.poke(0x0025, 0x20);
        let op = resolve(AddressingMode::IndexedIndirect, &mut cpu, &mut bus);
        assert_eq!(op.address(), Some(0x2074));
    }

    #[test]
    fn indirect_jmp_bug() {
        let (mut cpu, mut bus) = at(0x8000, &[0xFF, 0x10]);
        bus.poke(0x10FF, 0x34);
        bus.poke(0x1000, 0x12);
        bus.poke(0x1100, 0x99);
        let op = resolve(AddressingMode::Indirect, &mut cpu, &mut bus);
        assert_eq!(op.address(), Some(0x1234));
    }

    #[test]
    fn implied_consumes_nothing() {
        let (mut cpu, mut bus) = at(0x8000, &[]);
        assert_eq!(
            resolve(AddressingMode::Accumulator, &mut cpu, &mut bus),
            Operand::Accumulator
        );
        assert_eq!(cpu.pc(), 0x8000);
        assert_eq!(AddressingMode::Indirect.operand_len(), 2);
    }
}
