#![doc = r#"
CPU-visible register window ($2000-$2007, mirrored every 8 bytes up to $3FFF).

| Offset | Name    | Access | Behavior                                                    |
|--------|---------|--------|-------------------------------------------------------------|
| 0      | CTRL    | W      | nametable select, +1/+32 increment, pattern selects, NMI on |
| 1      | MASK    | W      | stored only                                                 |
| 2      | STATUS  | R      | returns flags; clears vblank and the write toggle           |
| 3      | OAMADDR | W      | OAM pointer                                                 |
| 4      | OAMDATA | R/W    | read/store at OAMADDR; writes post-increment                |
| 5      | SCROLL  | W x2   | X then Y, shared toggle                                     |
| 6      | ADDR    | W x2   | high then low byte of the VRAM address, shared toggle       |
| 7      | DATA    | R/W    | video memory at ADDR; ADDR += 1 or 32 after each access     |

Reads of DATA return the addressed byte directly (no read buffer).

`attach` wires these onto a CPU bus whose $2000-$3FFF window is already
mirrored: write hooks on every writable offset, read hooks on STATUS, OAMDATA
and DATA. Write-only registers read back the last byte stored in their bus
cell.
"#]

use std::rc::Rc;

use super::{CTRL_NMI_ENABLE, PRERENDER_SCANLINE, Ppu, SCREEN_HEIGHT, SharedPpu};
use crate::bus::Bus;

pub const PPUCTRL: u16 = 0x2000;
pub const PPUMASK: u16 = 0x2001;
pub const PPUSTATUS: u16 = 0x2002;
pub const OAMADDR: u16 = 0x2003;
pub const OAMDATA: u16 = 0x2004;
pub const PPUSCROLL: u16 = 0x2005;
pub const PPUADDR: u16 = 0x2006;
pub const PPUDATA: u16 = 0x2007;

/// Bind the register hooks for `ppu` onto `bus`.
pub fn attach(ppu: &SharedPpu, bus: &mut Bus) {
    for reg in [PPUCTRL, PPUMASK, OAMADDR, OAMDATA, PPUSCROLL, PPUADDR, PPUDATA] {
        let handle = Rc::clone(ppu);
        bus.bind_write_hook(reg, move |value| handle.borrow_mut().write_reg(reg, value));
    }
    for reg in [PPUSTATUS, OAMDATA, PPUDATA] {
        let handle = Rc::clone(ppu);
        bus.bind_read_hook(reg, move || handle.borrow_mut().read_reg(reg));
    }
}

impl Ppu {
    /// Register read with side effects. `addr` is folded onto the 8-byte
    /// window.
    pub fn read_reg(&mut self, addr: u16) -> u8 {
        match 0x2000 | (addr & 0x7) {
            PPUCTRL => self.ctrl,
            PPUMASK => self.mask,
            PPUSTATUS => {
                let v = self.status;
                self.set_vblank(false);
                self.write_toggle = false;
                v
            }
            OAMADDR => self.oam_addr,
            OAMDATA => self.oam[self.oam_addr as usize],
            PPUSCROLL => 0,
            PPUADDR => (self.vram_addr >> 8) as u8,
            _ => {
                let v = self.vram.read(self.vram_addr);
                self.advance_vram_addr();
                v
            }
        }
    }

    /// Register write with side effects. `addr` is folded onto the 8-byte
    /// window.
    pub fn write_reg(&mut self, addr: u16, value: u8) {
        match 0x2000 | (addr & 0x7) {
            PPUCTRL => {
                let enabling = self.ctrl & CTRL_NMI_ENABLE == 0 && value & CTRL_NMI_ENABLE != 0;
                self.ctrl = value;
                // Turning NMI on mid-vblank raises it immediately.
                if enabling && self.vblank() {
                    self.nmi_latch = true;
                }
            }
            PPUMASK => self.mask = value,
            PPUSTATUS => {}
            OAMADDR => self.oam_addr = value,
            OAMDATA => {
                if self.rendering_line() {
                    log::warn!(
                        "OAMDATA write during rendering (scanline {}, oam addr ${:02X})",
                        self.scanline,
                        self.oam_addr
                    );
                }
                self.oam[self.oam_addr as usize] = value;
                self.oam_addr = self.oam_addr.wrapping_add(1);
            }
            PPUSCROLL => {
                if self.write_toggle {
                    self.scroll_y = value;
                } else {
                    self.scroll_x = value;
                }
                self.write_toggle = !self.write_toggle;
            }
            PPUADDR => {
                if self.write_toggle {
                    self.vram_addr = (self.vram_addr & 0x3F00) | value as u16;
                } else {
                    self.vram_addr = (self.vram_addr & 0x00FF) | (((value & 0x3F) as u16) << 8);
                }
                self.write_toggle = !self.write_toggle;
            }
            _ => {
                log::debug!("vram ${:04X} <- ${:02X}", self.vram_addr, value);
                self.vram.write(self.vram_addr, value);
                self.advance_vram_addr();
            }
        }
    }

    fn advance_vram_addr(&mut self) {
        self.vram_addr = self.vram_addr.wrapping_add(self.vram_increment()) & 0x3FFF;
    }

    fn rendering_line(&self) -> bool {
        (self.scanline as usize) < SCREEN_HEIGHT || self.scanline == PRERENDER_SCANLINE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ppu::STATUS_VBLANK;

    #[test]
    fn status_read_clears_vblank_and_write_toggle() {
        let mut p = Ppu::default();
        p.set_vblank(true);
        p.write_reg(PPUADDR, 0x21);
        assert!(p.write_toggle());
        let s = p.read_reg(PPUSTATUS);
        assert_ne!(s & STATUS_VBLANK, 0);
        assert!(!p.vblank());
        assert!(!p.write_toggle());
        assert_eq!(p.read_reg(PPUSTATUS) & STATUS_VBLANK, 0);
    }

    #[test]
    fn data_port_reads_are_direct_and_increment() {
        let mut p = Ppu::default();
        p.poke_vram(0x2100, 0x11);
        p.poke_vram(0x2101, 0x22);
        p.write_reg(PPUADDR, 0x21);
        p.write_reg(PPUADDR, 0x00);
        assert_eq!(p.read_reg(PPUDATA), 0x11);
        assert_eq!(p.read_reg(PPUDATA), 0x22);
        assert_eq!(p.vram_addr(), 0x2102);
    }

    #[test]
    fn increment_32_on_data_write() {
        let mut p = Ppu::default();
        p.write_reg(PPUCTRL, 0x04);
        p.write_reg(PPUADDR, 0x20);
        p.write_reg(PPUADDR, 0x00);
        assert_eq!(p.vram_addr(), 0x2000);
        p.write_reg(PPUDATA, 0xAA);
        assert_eq!(p.vram_addr(), 0x2020);
        p.write_reg(PPUDATA, 0xBB);
        assert_eq!(p.vram_addr(), 0x2040);
        assert_eq!(p.peek_vram(0x2000), 0xAA);
        assert_eq!(p.peek_vram(0x2020), 0xBB);
    }

    #[test]
    fn address_latch_masks_to_fourteen_bits() {
        let mut p = Ppu::default();
        p.write_reg(PPUADDR, 0xFF);
        p.write_reg(PPUADDR, 0xFF);
        assert_eq!(p.vram_addr(), 0x3FFF);
        p.write_reg(PPUDATA, 0x01);
        assert_eq!(p.vram_addr(), 0x0000);
    }

    #[test]
    fn scroll_writes_share_the_toggle() {
        let mut p = Ppu::default();
        p.write_reg(PPUSCROLL, 0x12);
        p.write_reg(PPUSCROLL, 0x34);
        assert_eq!(p.scroll(), (0x12, 0x34));
        // Half-finished scroll write followed by ADDR lands on the low byte
        p.write_reg(PPUSCROLL, 0x56);
        p.write_reg(PPUADDR, 0x78);
        assert_eq!(p.vram_addr() & 0x00FF, 0x78);
        assert!(!p.write_toggle());
    }

    #[test]
    fn oam_data_writes_post_increment() {
        let mut p = Ppu::default();
        p.write_reg(OAMADDR, 0x10);
        p.write_reg(OAMDATA, 0xAA);
        p.write_reg(OAMDATA, 0xBB);
        assert_eq!(p.oam_addr(), 0x12);
        p.write_reg(OAMADDR, 0x10);
        assert_eq!(p.read_reg(OAMDATA), 0xAA);
        assert_eq!(p.oam_addr(), 0x10);
    }

    #[test]
    fn enabling_nmi_during_vblank_raises_request() {
        let mut p = Ppu::default();
        p.set_vblank(true);
        p.write_reg(PPUCTRL, 0x80);
        assert!(p.take_nmi_request());
        // Rewriting with the bit already set does not re-trigger
        p.write_reg(PPUCTRL, 0x80);
        assert!(!p.take_nmi_request());
    }

    #[test]
    fn attached_hooks_route_through_register_mirrors() {
        let ppu = Ppu::default().shared();
        let mut bus = Bus::cpu();
        bus.bind_mirror(0x2000, 0x3FFF, 8);
        attach(&ppu, &mut bus);

        // $3456 folds onto ADDR, $200F onto DATA
        bus.write(0x3456, 0x23);
        bus.write(0x2006, 0x05);
        bus.write(0x200F, 0x7E);
        assert_eq!(ppu.borrow().peek_vram(0x2305), 0x7E);

        ppu.borrow_mut().set_vblank(true);
        assert_ne!(bus.read(0x3FFA) & STATUS_VBLANK, 0);
        assert_eq!(bus.read(0x2002) & STATUS_VBLANK, 0);
    }
}
