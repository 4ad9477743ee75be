//! Instruction trace lines.
//!
//! One record per instruction, captured before it executes:
//!
//! ```text
//! C000  4C A:00 X:00 Y:00 P:24 SP:FD
//! ```
//!
//! The layout matches the register columns of the common conformance-ROM
//! logs, so `parse` also accepts full log lines (disassembly and cycle
//! columns are skipped).

use std::fmt;

use crate::bus::Bus;
use crate::cpu::state::CpuState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceRecord {
    pub pc: u16,
    pub opcode: u8,
    pub a: u8,
    pub x: u8,
    pub y: u8,
    pub p: u8,
    pub sp: u8,
}

impl TraceRecord {
    /// Snapshot registers and the opcode byte at PC (hook-free read).
    pub fn capture(state: &CpuState, bus: &Bus) -> Self {
        Self {
            pc: state.pc,
            opcode: bus.peek(state.pc),
            a: state.a,
            x: state.x,
            y: state.y,
            p: state.status,
            sp: state.sp,
        }
    }

    /// Parse a trace line: leading `PPPP  OO`, then `A:` `X:` `Y:` `P:` `SP:`
    /// fields anywhere after it.
    pub fn parse(line: &str) -> Option<Self> {
        let mut words = line.split_whitespace();
        let pc = u16::from_str_radix(words.next()?, 16).ok()?;
        let opcode = u8::from_str_radix(words.next()?, 16).ok()?;
        let field = |tag: &str| -> Option<u8> {
            let start = line.find(tag)? + tag.len();
            line.get(start..start + 2)
                .and_then(|h| u8::from_str_radix(h, 16).ok())
        };
        Some(Self {
            pc,
            opcode,
            a: field(" A:")?,
            x: field(" X:")?,
            y: field(" Y:")?,
            p: field(" P:")?,
            sp: field(" SP:")?,
        })
    }
}

impl fmt::Display for TraceRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04X}  {:02X} A:{:02X} X:{:02X} Y:{:02X} P:{:02X} SP:{:02X}",
            self.pc, self.opcode, self.a, self.x, self.y, self.p, self.sp
        )
    }
}
