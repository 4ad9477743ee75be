/*!
cpu - 6502 instruction execution engine.

```text
    state.rs        - Register file, flag masks, vectors, stack helpers.
    regs.rs         - `CpuRegs` trait the instruction semantics are generic over.
    addressing.rs   - The thirteen addressing modes and operand resolution.
    table.rs        - Opcode byte -> (instruction, addressing mode).
    cycles.rs       - Base cycle counts and dynamic penalties.
    execute.rs      - Instruction semantic helpers (ALU, stack, RMW, branch).
    dispatch/       - Single-step orchestration and per-family handlers.
    trace.rs        - One-line register traces.
    core/           - `Cpu` facade: interrupt inputs, `step`, `run`.
```

The CPU touches memory only through `Bus::read` / `Bus::write`, so mirrored
and hooked addresses behave the same for every instruction.
*/

pub mod addressing;
pub mod core;
pub mod cycles;
pub mod dispatch;
pub mod execute;
pub mod regs;
pub mod state;
pub mod table;
pub mod trace;

pub use crate::cpu::addressing::{AddressingMode, Operand};
pub use crate::cpu::core::Cpu;
pub use crate::cpu::dispatch::Interrupt;
pub use crate::cpu::regs::CpuRegs;
pub use crate::cpu::state::{
    BREAK, CARRY, CpuState, DECIMAL, IRQ_DISABLE, NEGATIVE, OVERFLOW, UNUSED, ZERO,
};
pub use crate::cpu::table::{Instruction, decode};
pub use crate::cpu::trace::TraceRecord;
