/*!
core::Cpu - 6502 CPU facade wrapping `CpuState`.

Design
======
- `Cpu` owns the register file plus the two interrupt inputs: an edge latch
  for NMI and a level line for IRQ.
- `step` services a pending interrupt first (NMI wins over IRQ; IRQ only when
  I is clear), otherwise executes exactly one instruction through the
  dispatcher. Either way the cycles consumed are returned.
- One trace line per executed instruction is emitted at `trace` level.

Usage:
```ignore
let mut cpu = Cpu::new();
cpu.reset(&mut bus);
let cycles = cpu.step(&mut bus)?;
```
*/

use crate::bus::Bus;
use crate::cpu::dispatch::{self, Interrupt};
use crate::cpu::state::{CpuState, IRQ_DISABLE, NEGATIVE, ZERO};
use crate::cpu::trace::TraceRecord;
use crate::error::StepError;

#[derive(Debug, Clone, Default)]
pub struct Cpu {
    state: CpuState,
    nmi_pending: bool,
    irq_line: bool,
}

impl Cpu {
    /// Construct a new CPU with power-up defaults.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &CpuState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut CpuState {
        &mut self.state
    }

    /// Power-on registers, PC from the reset vector, interrupt inputs idle.
    pub fn reset(&mut self, bus: &mut Bus) {
        self.state.reset(bus);
        self.nmi_pending = false;
        self.irq_line = false;
    }

    // ---------------------------------------------------------------------
    // Register accessors (read)
    // ---------------------------------------------------------------------
    pub fn a(&self) -> u8 {
        self.state.a
    }
    pub fn x(&self) -> u8 {
        self.state.x
    }
    pub fn y(&self) -> u8 {
        self.state.y
    }
    pub fn sp(&self) -> u8 {
        self.state.sp
    }
    pub fn pc(&self) -> u16 {
        self.state.pc
    }
    pub fn status(&self) -> u8 {
        self.state.status
    }

    // ---------------------------------------------------------------------
    // Register mutators (write)
    // ---------------------------------------------------------------------
    pub fn set_a(&mut self, v: u8) {
        self.state.a = v;
    }
    pub fn set_x(&mut self, v: u8) {
        self.state.x = v;
    }
    pub fn set_y(&mut self, v: u8) {
        self.state.y = v;
    }
    pub fn set_sp(&mut self, v: u8) {
        self.state.sp = v;
    }
    pub fn set_pc(&mut self, v: u16) {
        self.state.pc = v;
    }
    pub fn set_status(&mut self, v: u8) {
        self.state.status = v;
    }

    // ---------------------------------------------------------------------
    // Flag helpers
    // ---------------------------------------------------------------------
    pub fn set_flag(&mut self, mask: u8, on: bool) {
        self.state.assign_flag(mask, on);
    }

    pub fn get_flag(&self, mask: u8) -> bool {
        self.state.is_flag_set(mask)
    }

    pub fn update_zn(&mut self, v: u8) {
        self.set_flag(ZERO, v == 0);
        self.set_flag(NEGATIVE, (v & 0x80) != 0);
    }

    // ---------------------------------------------------------------------
    // Interrupt inputs
    // ---------------------------------------------------------------------

    /// Latch an NMI; it is taken before the next opcode fetch.
    pub fn request_nmi(&mut self) {
        self.nmi_pending = true;
    }

    pub fn nmi_pending(&self) -> bool {
        self.nmi_pending
    }

    /// Drive the IRQ line. While asserted and I is clear, every step enters
    /// the IRQ handler.
    pub fn set_irq_line(&mut self, asserted: bool) {
        self.irq_line = asserted;
    }

    // ---------------------------------------------------------------------
    // Execution
    // ---------------------------------------------------------------------

    /// Execute one instruction (or one interrupt entry). Returns CPU cycles.
    pub fn step(&mut self, bus: &mut Bus) -> Result<u32, StepError> {
        if self.nmi_pending {
            self.nmi_pending = false;
            return Ok(dispatch::service_interrupt(&mut self.state, bus, Interrupt::Nmi));
        }
        if self.irq_line && !self.state.is_flag_set(IRQ_DISABLE) {
            return Ok(dispatch::service_interrupt(&mut self.state, bus, Interrupt::Irq));
        }

        if log::log_enabled!(log::Level::Trace) {
            log::trace!("{}", TraceRecord::capture(&self.state, bus));
        }
        dispatch::step(&mut self.state, bus)
    }

    /// Run up to `max_instructions` steps, stopping at the first decode
    /// failure. Returns the total cycles consumed.
    pub fn run(&mut self, bus: &mut Bus, max_instructions: usize) -> Result<u64, StepError> {
        let mut total = 0u64;
        for _ in 0..max_instructions {
            total += u64::from(self.step(bus)?);
        }
        Ok(total)
    }
}
