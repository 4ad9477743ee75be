/*!
Video unit: per-cycle timing state machine, background pipeline and the
CPU-visible register window.

Timing
- One `tick` = one video clock. 341 cycles per scanline, 262 scanlines per
  frame. Position wraps (340 -> 0 bumps the scanline, 261 -> 0 toggles the
  odd-frame flag).
- Scanlines 0-239 are visible: cycles 1-256 each emit one pixel and step the
  background fetch pipeline; 257-320 run the sprite evaluation stub; 321-336
  prefetch the first two tiles of the next line.
- Scanline 240 is idle. Vertical blank begins at (241, 0): the status flag is
  set and, when control bit 7 is on, an NMI request is latched.
- Scanline 261 (pre-render) clears the status flags at cycle 0 and prefetches
  for line 0.

Structure
- `registers.rs` : $2000-$2007 semantics and hook wiring onto the CPU bus
- `memory.rs`    : the private 16 KiB video bus (nametable/palette mirrors), OAM
- `fetch.rs`     : background latches, shift registers, pixel resolution
- `renderer.rs`  : `Ppu::tick`
- `sprite.rs`    : sprite evaluation stub (secondary OAM + overflow flag)
- `frame.rs`     : `Frame`, the 240x256 palette-index grid
- `palette.rs`   : master palette for RGB conversion

Not modelled
- Sprite compositing and sprite-zero hit. Evaluation fills secondary OAM and
  sets the overflow flag; pixels come from the background only.
- Scroll values are latched but the background origin is always the top-left
  of the nametable selected by control bits 0-1.
- The mask register is stored but does not gate pixel production.
*/

use std::cell::RefCell;
use std::rc::Rc;

use crate::bus::Bus;
use crate::config::Mirroring;

pub mod frame;
pub mod palette;
pub mod registers;

pub(crate) mod fetch;
pub(crate) mod memory;
pub(crate) mod renderer;
pub(crate) mod sprite;

pub use frame::Frame;
pub use palette::NES_PALETTE;
pub use registers::attach;

/// Screen width in pixels.
pub const SCREEN_WIDTH: usize = 256;
/// Screen height in pixels.
pub const SCREEN_HEIGHT: usize = 240;
/// Cycles per scanline (0..=340).
pub const CYCLES_PER_SCANLINE: u16 = 341;
/// Scanlines per frame (0..=261).
pub const SCANLINES_PER_FRAME: u16 = 262;
/// First vertical-blank scanline.
pub const VBLANK_SCANLINE: u16 = 241;
/// Pre-render scanline.
pub const PRERENDER_SCANLINE: u16 = 261;

// Status register bits.
pub const STATUS_VBLANK: u8 = 0x80;
pub const STATUS_SPRITE_ZERO_HIT: u8 = 0x40;
pub const STATUS_SPRITE_OVERFLOW: u8 = 0x20;

// Control register bits.
pub const CTRL_NAMETABLE: u8 = 0x03;
pub const CTRL_INCREMENT_32: u8 = 0x04;
pub const CTRL_SPRITE_TABLE: u8 = 0x08;
pub const CTRL_BACKGROUND_TABLE: u8 = 0x10;
pub const CTRL_SPRITE_16: u8 = 0x20;
pub const CTRL_NMI_ENABLE: u8 = 0x80;

/// Shared handle: the console and the CPU-bus hooks both hold one.
pub type SharedPpu = Rc<RefCell<Ppu>>;

#[derive(Debug)]
pub struct Ppu {
    // CPU-visible registers
    ctrl: u8,
    mask: u8,
    status: u8,
    oam_addr: u8,

    // Shared two-write latch state
    write_toggle: bool,
    scroll_x: u8,
    scroll_y: u8,
    vram_addr: u16,

    // Memory
    vram: Bus,
    oam: [u8; 256],

    // Rendering state
    bg: fetch::BackgroundPipeline,
    sprites: sprite::SpriteEvaluation,

    // Timing
    scanline: u16,
    cycle: u16,
    odd_frame: bool,

    // Output
    frame: Frame,
    frame_count: u64,
    frame_complete: bool,
    nmi_latch: bool,
}

impl Default for Ppu {
    fn default() -> Self {
        Self::new(Mirroring::default())
    }
}

impl Ppu {
    /// Power-on state with the given nametable arrangement. The first tick
    /// processes the pre-render line so frame 0 starts primed.
    pub fn new(mirroring: Mirroring) -> Self {
        Self {
            ctrl: 0,
            mask: 0,
            status: 0,
            oam_addr: 0,
            write_toggle: false,
            scroll_x: 0,
            scroll_y: 0,
            vram_addr: 0,
            vram: memory::video_memory(mirroring),
            oam: [0; 256],
            bg: fetch::BackgroundPipeline::default(),
            sprites: sprite::SpriteEvaluation::default(),
            scanline: PRERENDER_SCANLINE,
            cycle: 0,
            odd_frame: false,
            frame: Frame::new(),
            frame_count: 0,
            frame_complete: false,
            nmi_latch: false,
        }
    }

    /// Wrap into the shared handle used by the console and bus hooks.
    pub fn shared(self) -> SharedPpu {
        Rc::new(RefCell::new(self))
    }

    /// Return registers and timing to power-on values. Video memory and OAM
    /// contents survive, as on hardware.
    pub fn reset(&mut self) {
        self.ctrl = 0;
        self.mask = 0;
        self.status = 0;
        self.oam_addr = 0;
        self.write_toggle = false;
        self.scroll_x = 0;
        self.scroll_y = 0;
        self.vram_addr = 0;
        self.bg = fetch::BackgroundPipeline::default();
        self.sprites = sprite::SpriteEvaluation::default();
        self.scanline = PRERENDER_SCANLINE;
        self.cycle = 0;
        self.odd_frame = false;
        self.frame_complete = false;
        self.nmi_latch = false;
    }

    // ---------------------------------------------------------------------
    // Status flags
    // ---------------------------------------------------------------------
    fn assign_status(&mut self, mask: u8, on: bool) {
        if on {
            self.status |= mask;
        } else {
            self.status &= !mask;
        }
    }

    pub fn set_vblank(&mut self, on: bool) {
        self.assign_status(STATUS_VBLANK, on);
    }
    pub fn set_sprite_zero_hit(&mut self, on: bool) {
        self.assign_status(STATUS_SPRITE_ZERO_HIT, on);
    }
    pub fn set_sprite_overflow(&mut self, on: bool) {
        self.assign_status(STATUS_SPRITE_OVERFLOW, on);
    }

    pub fn vblank(&self) -> bool {
        self.status & STATUS_VBLANK != 0
    }
    pub fn sprite_zero_hit(&self) -> bool {
        self.status & STATUS_SPRITE_ZERO_HIT != 0
    }
    pub fn sprite_overflow(&self) -> bool {
        self.status & STATUS_SPRITE_OVERFLOW != 0
    }
    pub fn nmi_enabled(&self) -> bool {
        self.ctrl & CTRL_NMI_ENABLE != 0
    }

    // ---------------------------------------------------------------------
    // Register views (no side effects)
    // ---------------------------------------------------------------------
    pub fn ctrl(&self) -> u8 {
        self.ctrl
    }
    pub fn mask(&self) -> u8 {
        self.mask
    }
    pub fn status(&self) -> u8 {
        self.status
    }
    pub fn oam_addr(&self) -> u8 {
        self.oam_addr
    }
    pub fn scroll(&self) -> (u8, u8) {
        (self.scroll_x, self.scroll_y)
    }
    pub fn vram_addr(&self) -> u16 {
        self.vram_addr
    }
    pub fn write_toggle(&self) -> bool {
        self.write_toggle
    }
    pub fn vram_increment(&self) -> u16 {
        if self.ctrl & CTRL_INCREMENT_32 != 0 { 32 } else { 1 }
    }

    // ---------------------------------------------------------------------
    // Timing and output
    // ---------------------------------------------------------------------

    /// Scanline of the next tick (0..=261).
    pub fn scanline(&self) -> u16 {
        self.scanline
    }
    /// Cycle of the next tick (0..=340).
    pub fn cycle(&self) -> u16 {
        self.cycle
    }
    pub fn odd_frame(&self) -> bool {
        self.odd_frame
    }
    /// Frames completed (vertical-blank entries) since power-on.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Most recent picture. Rows above the current scanline belong to the
    /// frame in progress while rendering.
    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    pub fn frame_complete(&self) -> bool {
        self.frame_complete
    }

    /// Consume the frame-complete latch (set on vblank entry).
    pub fn take_frame_complete(&mut self) -> bool {
        std::mem::take(&mut self.frame_complete)
    }

    /// Consume a pending NMI request.
    pub fn take_nmi_request(&mut self) -> bool {
        std::mem::take(&mut self.nmi_latch)
    }
}
