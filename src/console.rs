/*!
Console: power-on wiring of CPU, bus and video unit, plus the step driver.

Wiring (CPU bus)
- $0000-$1FFF: 2 KiB internal RAM mirrored every $800
- $2000-$3FFF: video registers mirrored every 8 bytes, hooked to the `Ppu`
- $4014:       OAM DMA page register (write hook)
- everything else is plain backing memory (program image, vectors)

Driver contract
- `step_cpu`   : one CPU instruction (or interrupt entry), no video time
- `step_video` : one video tick; a latched NMI request is forwarded to the CPU
- `step`       : one CPU instruction followed by 3 video ticks per CPU cycle it
                 consumed. Register writes made by the instruction are visible
                 to the first of those ticks.

A decode failure is returned as-is: PC has moved past the opcode byte,
nothing else changed, and no video time elapsed. The caller may keep
stepping.
*/

use std::cell::{Cell, Ref, RefMut};
use std::rc::Rc;

use crate::bus::Bus;
use crate::config::ConsoleConfig;
use crate::cpu::Cpu;
use crate::error::{LoadError, StepError};
use crate::loader;
use crate::ppu::{self, Frame, Ppu, SharedPpu};

/// Video ticks per CPU cycle.
pub const VIDEO_TICKS_PER_CPU_CYCLE: u32 = 3;
/// CPU address of the OAM DMA page register.
pub const OAM_DMA: u16 = 0x4014;
/// CPU cycles an OAM DMA transfer stalls for (plus one on an odd cycle).
pub const OAM_DMA_CYCLES: u32 = 513;

pub struct Console {
    cpu: Cpu,
    bus: Bus,
    ppu: SharedPpu,
    config: ConsoleConfig,
    dma_page: Rc<Cell<Option<u8>>>,
    cycles: u64,
}

impl std::fmt::Debug for Console {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Console")
            .field("cpu", &self.cpu)
            .field("config", &self.config)
            .field("cycles", &self.cycles)
            .finish_non_exhaustive()
    }
}

impl Default for Console {
    fn default() -> Self {
        Self::new(ConsoleConfig::default())
    }
}

impl Console {
    /// Build and wire a powered-off machine. Load images, then call `reset`.
    pub fn new(config: ConsoleConfig) -> Self {
        let mut bus = Bus::cpu();
        bus.bind_mirror(0x0000, 0x1FFF, 0x0800);
        bus.bind_mirror(0x2000, 0x3FFF, 0x0008);

        let ppu = Ppu::new(config.mirroring).shared();
        ppu::attach(&ppu, &mut bus);

        let dma_page = Rc::new(Cell::new(None));
        let pending = Rc::clone(&dma_page);
        bus.bind_write_hook(OAM_DMA, move |page| pending.set(Some(page)));

        Self {
            cpu: Cpu::new(),
            bus,
            ppu,
            config,
            dma_page,
            cycles: 0,
        }
    }

    pub fn config(&self) -> &ConsoleConfig {
        &self.config
    }

    pub fn cpu(&self) -> &Cpu {
        &self.cpu
    }

    pub fn cpu_mut(&mut self) -> &mut Cpu {
        &mut self.cpu
    }

    pub fn bus(&self) -> &Bus {
        &self.bus
    }

    pub fn bus_mut(&mut self) -> &mut Bus {
        &mut self.bus
    }

    /// Borrow the video unit. Do not hold the guard across a CPU step: the
    /// register hooks borrow it mutably.
    pub fn ppu(&self) -> Ref<'_, Ppu> {
        self.ppu.borrow()
    }

    pub fn ppu_mut(&self) -> RefMut<'_, Ppu> {
        self.ppu.borrow_mut()
    }

    /// The picture most recently produced.
    pub fn frame(&self) -> Ref<'_, Frame> {
        Ref::map(self.ppu.borrow(), Ppu::frame)
    }

    /// CPU cycles elapsed since reset (including DMA stalls).
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Deposit a program image at the configured origin.
    pub fn load_program(&mut self, image: &[u8]) -> Result<(), LoadError> {
        loader::load_program(&mut self.bus, self.config.program_origin, image)
    }

    /// Deposit a pattern-table image at video address $0000.
    pub fn load_patterns(&mut self, image: &[u8]) -> Result<(), LoadError> {
        loader::load_patterns(&mut self.ppu.borrow_mut(), image)
    }

    /// Power-on/reset: video registers cleared, CPU through the reset vector
    /// (or the configured entry point).
    pub fn reset(&mut self) {
        self.ppu.borrow_mut().reset();
        self.cpu.reset(&mut self.bus);
        if let Some(pc) = self.config.entry_point {
            self.cpu.set_pc(pc);
        }
        self.dma_page.set(None);
        self.cycles = 0;
        log::debug!("reset: pc=${:04X}", self.cpu.pc());
    }

    /// Execute one CPU instruction without advancing video time. A DMA
    /// started by the instruction is performed and its stall included.
    pub fn step_cpu(&mut self) -> Result<u32, StepError> {
        let mut cycles = self.cpu.step(&mut self.bus)?;
        if let Some(page) = self.dma_page.take() {
            cycles += self.oam_dma(page, cycles);
        }
        self.cycles += u64::from(cycles);
        Ok(cycles)
    }

    /// Advance the video unit one tick, forwarding a fresh NMI request.
    pub fn step_video(&mut self) {
        let nmi = {
            let mut ppu = self.ppu.borrow_mut();
            ppu.tick();
            ppu.take_nmi_request()
        };
        if nmi {
            self.cpu.request_nmi();
        }
    }

    /// One CPU instruction, then three video ticks per cycle it took.
    pub fn step(&mut self) -> Result<u32, StepError> {
        let cycles = self.step_cpu()?;
        for _ in 0..cycles * VIDEO_TICKS_PER_CPU_CYCLE {
            self.step_video();
        }
        Ok(cycles)
    }

    /// Step until the video unit finishes a frame. Returns CPU cycles run.
    pub fn run_frame(&mut self) -> Result<u64, StepError> {
        let mut total = 0u64;
        loop {
            total += u64::from(self.step()?);
            if self.ppu.borrow_mut().take_frame_complete() {
                return Ok(total);
            }
        }
    }

    /// The copy starts once the triggering instruction has finished; an odd
    /// start cycle costs one extra alignment cycle.
    fn oam_dma(&mut self, page: u8, instruction_cycles: u32) -> u32 {
        let base = (page as u16) << 8;
        let mut data = [0u8; 256];
        for (i, byte) in data.iter_mut().enumerate() {
            *byte = self.bus.read(base | i as u16);
        }
        self.ppu.borrow_mut().oam_dma(&data);
        log::debug!("oam dma from ${:04X}", base);
        let start = self.cycles + u64::from(instruction_cycles);
        OAM_DMA_CYCLES + (start & 1) as u32
    }
}
