#![doc = r#"
Video memory: the unit's private 16 KiB bus and its object attribute memory.

Address map ($0000-$3FFF)
- $0000-$1FFF pattern tables (two 4 KiB halves)
- $2000-$2FFF four nametable slots folded according to `Mirroring`
- $3000-$3EFF mirror of $2000-$2EFF
- $3F00-$3F1F palette RAM, mirrored every 32 bytes up to $3FFF; the sprite
  backdrop entries $3F10/$3F14/$3F18/$3F1C alias $3F00/$3F04/$3F08/$3F0C

Bindings are applied nametables first, then the $3000 window, then palette
aliases, then the palette range mirror, so every later mirror inherits the
earlier folds.
"#]

use super::Ppu;
use crate::bus::Bus;
use crate::config::Mirroring;
use crate::error::LoadError;

pub const PATTERN_TABLE_SIZE: usize = 0x2000;
pub const PALETTE_BASE: u16 = 0x3F00;

/// Build the video bus for the given nametable arrangement.
pub(crate) fn video_memory(mirroring: Mirroring) -> Bus {
    let mut vram = Bus::video();
    match mirroring {
        Mirroring::Horizontal => {
            vram.bind_mirror(0x2000, 0x27FF, 0x400);
            vram.bind_mirror(0x2800, 0x2FFF, 0x400);
        }
        Mirroring::Vertical => vram.bind_mirror(0x2000, 0x2FFF, 0x800),
        Mirroring::FourScreen => {}
    }
    vram.bind_mirror(0x2000, 0x3EFF, 0x1000);
    for entry in [0x00u16, 0x04, 0x08, 0x0C] {
        vram.bind_alias(PALETTE_BASE + 0x10 + entry, PALETTE_BASE + entry);
    }
    vram.bind_mirror(PALETTE_BASE, 0x3FFF, 0x20);
    vram
}

impl Ppu {
    /// Hook-free read of video memory (mirrors applied).
    pub fn peek_vram(&self, addr: u16) -> u8 {
        self.vram.peek(addr)
    }

    /// Hook-free write of video memory (mirrors applied).
    pub fn poke_vram(&mut self, addr: u16, value: u8) {
        self.vram.poke(addr, value);
    }

    /// Canonical video address behind `addr`.
    pub fn vram_canonical(&self, addr: u16) -> u16 {
        self.vram.canonical(addr)
    }

    /// Deposit a pattern image at `origin` in video memory.
    pub fn load_vram(&mut self, origin: u16, bytes: &[u8]) -> Result<(), LoadError> {
        self.vram.load(origin, bytes)
    }

    pub fn peek_oam(&self, index: u8) -> u8 {
        self.oam[index as usize]
    }

    pub fn poke_oam(&mut self, index: u8, value: u8) {
        self.oam[index as usize] = value;
    }

    /// Copy a 256-byte page into OAM starting at the current OAM address,
    /// wrapping inside OAM. The OAM address ends where it started.
    pub fn oam_dma(&mut self, page: &[u8; 256]) {
        let mut ptr = self.oam_addr;
        for &byte in page {
            self.oam[ptr as usize] = byte;
            ptr = ptr.wrapping_add(1);
        }
    }
}
