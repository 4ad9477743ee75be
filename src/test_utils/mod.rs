//! Shared test utilities: program images, CPU/bus setup and pattern builders.
//!
//! Programs are always placed at $8000 with the reset vector pointing there,
//! which is what the CPU dispatch tests assume when they check PC values.

#![allow(dead_code)]

use crate::bus::Bus;
use crate::config::ConsoleConfig;
use crate::console::Console;
use crate::cpu::Cpu;
use crate::cpu::state::RESET_VECTOR;
use crate::loader;

/// Default program origin used by the helpers.
pub const PROGRAM_ORIGIN: u16 = 0x8000;

/// Fresh CPU bus holding `program` at $8000 and a reset vector pointing at it.
pub fn program_bus(program: &[u8]) -> Bus {
    let mut bus = Bus::cpu();
    if !program.is_empty() {
        bus.load(PROGRAM_ORIGIN, program)
            .expect("test program fits in the bus");
    }
    loader::set_vector(&mut bus, RESET_VECTOR, PROGRAM_ORIGIN);
    bus
}

/// CPU after reset on a bare bus (no mirrors, no hooks) running `program`.
pub fn setup_cpu(program: &[u8]) -> (Cpu, Bus) {
    let mut bus = program_bus(program);
    let mut cpu = Cpu::new();
    cpu.reset(&mut bus);
    (cpu, bus)
}

/// Execute `n` instructions, panicking on a decode failure. Returns the
/// cycles consumed.
pub fn run_steps(cpu: &mut Cpu, bus: &mut Bus, n: usize) -> u32 {
    let mut total = 0;
    for i in 0..n {
        total += cpu
            .step(bus)
            .unwrap_or_else(|e| panic!("step {} failed: {}", i + 1, e));
    }
    total
}

/// Fully wired console (RAM mirrors, video registers) running `program`.
pub fn console_with_program(program: &[u8]) -> Console {
    console_with_config(program, ConsoleConfig::default())
}

/// Like `console_with_program`, with the reset vector pointing at the
/// configured origin.
pub fn console_with_config(program: &[u8], config: ConsoleConfig) -> Console {
    let mut console = Console::new(config);
    console
        .load_program(program)
        .expect("test program fits in the bus");
    loader::set_vector(console.bus_mut(), RESET_VECTOR, config.program_origin);
    console.reset();
    console
}

/// 16-byte pattern-table tile whose every pixel has colour index `index`
/// (0..=3).
pub fn solid_tile(index: u8) -> [u8; 16] {
    let lo = if index & 1 != 0 { 0xFF } else { 0x00 };
    let hi = if index & 2 != 0 { 0xFF } else { 0x00 };
    let mut tile = [0u8; 16];
    tile[..8].fill(lo);
    tile[8..].fill(hi);
    tile
}

/// Tile with vertical stripes: columns cycle through indices 0,1,2,3.
pub fn striped_tile() -> [u8; 16] {
    // Column bit pairs (hi,lo) per pixel x: 00 01 10 11 00 01 10 11
    let lo = 0b0101_0101;
    let hi = 0b0011_0011;
    let mut tile = [0u8; 16];
    tile[..8].fill(lo);
    tile[8..].fill(hi);
    tile
}

/// Clock the video unit of `console` until it reaches `(scanline, cycle)`
/// (the position about to be processed).
pub fn run_video_to(console: &mut Console, scanline: u16, cycle: u16) {
    for _ in 0..(341 * 262 * 2) {
        {
            let ppu = console.ppu();
            if ppu.scanline() == scanline && ppu.cycle() == cycle {
                return;
            }
        }
        console.step_video();
    }
    panic!("video unit never reached ({scanline}, {cycle})");
}
