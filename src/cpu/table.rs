/*!
table.rs - Opcode decode table.

Purpose
=======
Maps each of the 256 opcode bytes to an `(Instruction, AddressingMode)` pair,
or `None` for bytes the core does not implement. The table is built at
compile time from `decode_entry` and consulted once per step.

Coverage
--------
- All 151 documented opcodes.
- Undocumented single-byte NOPs ($1A $3A $5A $7A $DA $FA) decode as `Nop`.
- Undocumented skip-byte opcodes (`Skb`) and skip-word opcodes (`Skw`) consume
  one or two operand bytes and do nothing else. Their addressing modes follow
  the silicon so cycle counts line up, but the effective address is never
  accessed.

Every other byte (the KIL/JAM family and the undocumented ALU combos) is
unknown and surfaces as a decode failure.
*/

use crate::cpu::addressing::AddressingMode;

/// Instruction semantics, independent of addressing mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Instruction {
    Adc,
    And,
    Asl,
    Bcc,
    Bcs,
    Beq,
    Bit,
    Bmi,
    Bne,
    Bpl,
    Brk,
    Bvc,
    Bvs,
    Clc,
    Cld,
    Cli,
    Clv,
    Cmp,
    Cpx,
    Cpy,
    Dec,
    Dex,
    Dey,
    Eor,
    Inc,
    Inx,
    Iny,
    Jmp,
    Jsr,
    Lda,
    Ldx,
    Ldy,
    Lsr,
    Nop,
    Ora,
    Pha,
    Php,
    Pla,
    Plp,
    Rol,
    Ror,
    Rti,
    Rts,
    Sbc,
    Sec,
    Sed,
    Sei,
    Sta,
    Stx,
    Sty,
    Tax,
    Tay,
    Tsx,
    Txa,
    Txs,
    Tya,
    /// Undocumented: skip one operand byte.
    Skb,
    /// Undocumented: skip two operand bytes.
    Skw,
}

impl Instruction {
    /// Instructions that read their effective address and therefore pay the
    /// +1 page-crossing cycle on indexed modes.
    pub const fn reads_memory(self) -> bool {
        matches!(
            self,
            Instruction::Adc
                | Instruction::And
                | Instruction::Cmp
                | Instruction::Eor
                | Instruction::Lda
                | Instruction::Ldx
                | Instruction::Ldy
                | Instruction::Ora
                | Instruction::Sbc
                | Instruction::Skw
        )
    }

    /// Shift/rotate/increment/decrement family.
    pub const fn is_rmw(self) -> bool {
        matches!(
            self,
            Instruction::Asl
                | Instruction::Lsr
                | Instruction::Rol
                | Instruction::Ror
                | Instruction::Inc
                | Instruction::Dec
        )
    }

    pub const fn is_branch(self) -> bool {
        matches!(
            self,
            Instruction::Bcc
                | Instruction::Bcs
                | Instruction::Beq
                | Instruction::Bmi
                | Instruction::Bne
                | Instruction::Bpl
                | Instruction::Bvc
                | Instruction::Bvs
        )
    }
}

pub type Decoded = (Instruction, AddressingMode);

static DECODE_TABLE: [Option<Decoded>; 256] = build_table();

/// Look up an opcode byte.
#[inline]
pub fn decode(opcode: u8) -> Option<Decoded> {
    DECODE_TABLE[opcode as usize]
}

const fn build_table() -> [Option<Decoded>; 256] {
    let mut table = [None; 256];
    let mut op = 0;
    while op < 256 {
        table[op] = decode_entry(op as u8);
        op += 1;
    }
    table
}

const fn decode_entry(opcode: u8) -> Option<Decoded> {
    use AddressingMode::*;
    use Instruction::*;

    let entry = match opcode {
        // ADC
        0x69 => (Adc, Immediate),
        0x65 => (Adc, ZeroPage),
        0x75 => (Adc, ZeroPageX),
        0x6D => (Adc, Absolute),
        0x7D => (Adc, AbsoluteX),
        0x79 => (Adc, AbsoluteY),
        0x61 => (Adc, IndexedIndirect),
        0x71 => (Adc, IndirectIndexed),
        // AND
        0x29 => (And, Immediate),
        0x25 => (And, ZeroPage),
        0x35 => (And, ZeroPageX),
        0x2D => (And, Absolute),
        0x3D => (And, AbsoluteX),
        0x39 => (And, AbsoluteY),
        0x21 => (And, IndexedIndirect),
        0x31 => (And, IndirectIndexed),
        // ASL
        0x0A => (Asl, Accumulator),
        0x06 => (Asl, ZeroPage),
        0x16 => (Asl, ZeroPageX),
        0x0E => (Asl, Absolute),
        0x1E => (Asl, AbsoluteX),
        // Branches
        0x90 => (Bcc, Relative),
        0xB0 => (Bcs, Relative),
        0xF0 => (Beq, Relative),
        0x30 => (Bmi, Relative),
        0xD0 => (Bne, Relative),
        0x10 => (Bpl, Relative),
        0x50 => (Bvc, Relative),
        0x70 => (Bvs, Relative),
        // BIT
        0x24 => (Bit, ZeroPage),
        0x2C => (Bit, Absolute),
        // BRK
        0x00 => (Brk, Implied),
        // Flag clears / sets
        0x18 => (Clc, Implied),
        0xD8 => (Cld, Implied),
        0x58 => (Cli, Implied),
        0xB8 => (Clv, Implied),
        0x38 => (Sec, Implied),
        0xF8 => (Sed, Implied),
        0x78 => (Sei, Implied),
        // CMP
        0xC9 => (Cmp, Immediate),
        0xC5 => (Cmp, ZeroPage),
        0xD5 => (Cmp, ZeroPageX),
        0xCD => (Cmp, Absolute),
        0xDD => (Cmp, AbsoluteX),
        0xD9 => (Cmp, AbsoluteY),
        0xC1 => (Cmp, IndexedIndirect),
        0xD1 => (Cmp, IndirectIndexed),
        // CPX / CPY
        0xE0 => (Cpx, Immediate),
        0xE4 => (Cpx, ZeroPage),
        0xEC => (Cpx, Absolute),
        0xC0 => (Cpy, Immediate),
        0xC4 => (Cpy, ZeroPage),
        0xCC => (Cpy, Absolute),
        // DEC / INC memory
        0xC6 => (Dec, ZeroPage),
        0xD6 => (Dec, ZeroPageX),
        0xCE => (Dec, Absolute),
        0xDE => (Dec, AbsoluteX),
        0xE6 => (Inc, ZeroPage),
        0xF6 => (Inc, ZeroPageX),
        0xEE => (Inc, Absolute),
        0xFE => (Inc, AbsoluteX),
        // Register increment / decrement
        0xCA => (Dex, Implied),
        0x88 => (Dey, Implied),
        0xE8 => (Inx, Implied),
        0xC8 => (Iny, Implied),
        // EOR
        0x49 => (Eor, Immediate),
        0x45 => (Eor, ZeroPage),
        0x55 => (Eor, ZeroPageX),
        0x4D => (Eor, Absolute),
        0x5D => (Eor, AbsoluteX),
        0x59 => (Eor, AbsoluteY),
        0x41 => (Eor, IndexedIndirect),
        0x51 => (Eor, IndirectIndexed),
        // Jumps
        0x4C => (Jmp, Absolute),
        0x6C => (Jmp, Indirect),
        0x20 => (Jsr, Absolute),
        0x60 => (Rts, Implied),
        0x40 => (Rti, Implied),
        // LDA
        0xA9 => (Lda, Immediate),
        0xA5 => (Lda, ZeroPage),
        0xB5 => (Lda, ZeroPageX),
        0xAD => (Lda, Absolute),
        0xBD => (Lda, AbsoluteX),
        0xB9 => (Lda, AbsoluteY),
        0xA1 => (Lda, IndexedIndirect),
        0xB1 => (Lda, IndirectIndexed),
        // LDX
        0xA2 => (Ldx, Immediate),
        0xA6 => (Ldx, ZeroPage),
        0xB6 => (Ldx, ZeroPageY),
        0xAE => (Ldx, Absolute),
        0xBE => (Ldx, AbsoluteY),
        // LDY
        0xA0 => (Ldy, Immediate),
        0xA4 => (Ldy, ZeroPage),
        0xB4 => (Ldy, ZeroPageX),
        0xAC => (Ldy, Absolute),
        0xBC => (Ldy, AbsoluteX),
        // LSR
        0x4A => (Lsr, Accumulator),
        0x46 => (Lsr, ZeroPage),
        0x56 => (Lsr, ZeroPageX),
        0x4E => (Lsr, Absolute),
        0x5E => (Lsr, AbsoluteX),
        // NOP (documented + undocumented single-byte)
        0xEA | 0x1A | 0x3A | 0x5A | 0x7A | 0xDA | 0xFA => (Nop, Implied),
        // ORA
        0x09 => (Ora, Immediate),
        0x05 => (Ora, ZeroPage),
        0x15 => (Ora, ZeroPageX),
        0x0D => (Ora, Absolute),
        0x1D => (Ora, AbsoluteX),
        0x19 => (Ora, AbsoluteY),
        0x01 => (Ora, IndexedIndirect),
        0x11 => (Ora, IndirectIndexed),
        // Stack
        0x48 => (Pha, Implied),
        0x08 => (Php, Implied),
        0x68 => (Pla, Implied),
        0x28 => (Plp, Implied),
        // ROL / ROR
        0x2A => (Rol, Accumulator),
        0x26 => (Rol, ZeroPage),
        0x36 => (Rol, ZeroPageX),
        0x2E => (Rol, Absolute),
        0x3E => (Rol, AbsoluteX),
        0x6A => (Ror, Accumulator),
        0x66 => (Ror, ZeroPage),
        0x76 => (Ror, ZeroPageX),
        0x6E => (Ror, Absolute),
        0x7E => (Ror, AbsoluteX),
        // SBC
        0xE9 => (Sbc, Immediate),
        0xE5 => (Sbc, ZeroPage),
        0xF5 => (Sbc, ZeroPageX),
        0xED => (Sbc, Absolute),
        0xFD => (Sbc, AbsoluteX),
        0xF9 => (Sbc, AbsoluteY),
        0xE1 => (Sbc, IndexedIndirect),
        0xF1 => (Sbc, IndirectIndexed),
        // STA / STX / STY
        0x85 => (Sta, ZeroPage),
        0x95 => (Sta, ZeroPageX),
        0x8D => (Sta, Absolute),
        0x9D => (Sta, AbsoluteX),
        0x99 => (Sta, AbsoluteY),
        0x81 => (Sta, IndexedIndirect),
        0x91 => (Sta, IndirectIndexed),
        0x86 => (Stx, ZeroPage),
        0x96 => (Stx, ZeroPageY),
        0x8E => (Stx, Absolute),
        0x84 => (Sty, ZeroPage),
        0x94 => (Sty, ZeroPageX),
        0x8C => (Sty, Absolute),
        // Transfers
        0xAA => (Tax, Implied),
        0xA8 => (Tay, Implied),
        0xBA => (Tsx, Implied),
        0x8A => (Txa, Implied),
        0x9A => (Txs, Implied),
        0x98 => (Tya, Implied),
        // Undocumented skip-byte
        0x80 | 0x82 | 0x89 | 0xC2 | 0xE2 => (Skb, Immediate),
        0x04 | 0x44 | 0x64 => (Skb, ZeroPage),
        0x14 | 0x34 | 0x54 | 0x74 | 0xD4 | 0xF4 => (Skb, ZeroPageX),
        // Undocumented skip-word
        0x0C => (Skw, Absolute),
        0x1C | 0x3C | 0x5C | 0x7C | 0xDC | 0xFC => (Skw, AbsoluteX),

        _ => return None,
    };
    Some(entry)
}
