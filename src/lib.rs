#![doc = r#"
famicore: the execution core of an 8-bit console.

A 6502 CPU, a cycle-stepped video unit and the mirrored, hook-dispatching bus
that ties them together. Cartridge parsing, windowing and audio live outside
the crate; they talk to the core through the loaders, the frame buffer and
the step driver on `Console`.

Modules:
- bus: flat memory with mirror map and read/write hooks (CPU and video buses)
- cpu: register file, addressing modes, decode/cycle tables, instruction dispatch
- ppu: video registers, video memory map, background pipeline, timing state machine
- console: power-on wiring and the CPU/video step cadence
- loader: raw program and pattern image loaders
- config: power-on configuration
- error: step, load and aggregate error types

In tests, shared program/console builders are available under `crate::test_utils`.
"#]

pub mod bus;
pub mod config;
pub mod console;
pub mod cpu;
pub mod error;
pub mod loader;
pub mod ppu;

// Re-export commonly used types at the crate root for convenience.
pub use bus::Bus;
pub use config::{ConsoleConfig, Mirroring};
pub use console::Console;
pub use cpu::Cpu;
pub use error::{CoreError, LoadError, StepError};
pub use ppu::{Frame, Ppu};

// Shared test utilities (only compiled for tests)
#[cfg(test)]
pub mod test_utils;
