#![doc = r#"
Background fetch pipeline.

Every 8 cycles the pipeline reads one tile: nametable byte (cycle % 8 == 1),
attribute byte (3), low pattern plane (5), high pattern plane (7), then steps
to the next tile column (0). The latched tile enters the low byte of the
16-bit shift registers on the next pipeline cycle with cycle % 8 == 1; the
registers shift left once per cycle, so bit 15 always holds the pixel about
to be drawn.

Timeline for one line (visible line L fetches row L during 1-256, the
prefetch window fetches row L+1):
- 321-336: tiles 0 and 1 of the next row; tile 0 reloads at 329, tile 1 at 337
- 1-256:   pixel x = cycle - 1, fetching tiles 2..33 as it goes
- cycle 1 draws without shifting; every other pipeline cycle shifts first

Columns 32 and 33 come from the horizontally adjacent nametable.
"#]

use super::{CTRL_BACKGROUND_TABLE, CTRL_NAMETABLE, Ppu};
use crate::ppu::memory::PALETTE_BASE;

/// Latches and shift registers of the background pipeline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BackgroundPipeline {
    // Tile column (0..=33) the next fetch targets.
    column: u8,

    tile: u8,
    attribute: u8,
    pattern_lo: u8,
    pattern_hi: u8,

    shift_pattern_lo: u16,
    shift_pattern_hi: u16,
    shift_attr_lo: u16,
    shift_attr_hi: u16,
}

impl BackgroundPipeline {
    fn shift(&mut self) {
        self.shift_pattern_lo <<= 1;
        self.shift_pattern_hi <<= 1;
        self.shift_attr_lo <<= 1;
        self.shift_attr_hi <<= 1;
    }

    /// Move the latched tile into the low byte of the shift registers.
    fn reload(&mut self) {
        let fill = |bit: bool| if bit { 0x00FF } else { 0x0000 };
        self.shift_pattern_lo = (self.shift_pattern_lo & 0xFF00) | self.pattern_lo as u16;
        self.shift_pattern_hi = (self.shift_pattern_hi & 0xFF00) | self.pattern_hi as u16;
        self.shift_attr_lo = (self.shift_attr_lo & 0xFF00) | fill(self.attribute & 1 != 0);
        self.shift_attr_hi = (self.shift_attr_hi & 0xFF00) | fill(self.attribute & 2 != 0);
    }

    /// (pattern index 0..=3, palette group 0..=3) at bit 15.
    fn output(&self) -> (u8, u8) {
        let bit = |reg: u16| ((reg >> 15) & 1) as u8;
        let pattern = (bit(self.shift_pattern_hi) << 1) | bit(self.shift_pattern_lo);
        let palette = (bit(self.shift_attr_hi) << 1) | bit(self.shift_attr_lo);
        (pattern, palette)
    }
}

impl Ppu {
    /// One pipeline cycle (visible 1..=256 or prefetch 321..=337) fetching
    /// for pixel row `row`.
    pub(in crate::ppu) fn background_cycle(&mut self, cycle: u16, row: u16) {
        if cycle == 321 {
            self.bg.column = 0;
        }
        if cycle != 1 {
            self.bg.shift();
        }
        match cycle % 8 {
            1 => {
                if cycle != 1 && cycle != 321 {
                    self.bg.reload();
                }
                if cycle != 337 {
                    self.bg.tile = self.vram.read(self.nametable_addr(row));
                }
            }
            3 => {
                let attr = self.vram.read(self.attribute_addr(row));
                let (coarse_x, coarse_y) = (self.bg.column as u16 & 31, row / 8);
                let shift = ((coarse_y & 2) << 1) | (coarse_x & 2);
                self.bg.attribute = (attr >> shift) & 0x03;
            }
            5 => self.bg.pattern_lo = self.vram.read(self.pattern_addr(row)),
            7 => self.bg.pattern_hi = self.vram.read(self.pattern_addr(row) + 8),
            0 => self.bg.column = self.bg.column.wrapping_add(1),
            _ => {}
        }
    }

    /// Resolve the pixel at bit 15 and store its palette index at (x, y).
    pub(in crate::ppu) fn render_pixel(&mut self, x: usize, y: usize) {
        let (pattern, palette) = self.bg.output();
        let entry = if pattern == 0 {
            PALETTE_BASE
        } else {
            PALETTE_BASE + (palette as u16) * 4 + pattern as u16
        };
        let index = self.vram.read(entry) & 0x3F;
        self.frame.set(x, y, index);
    }

    /// Base of the nametable the current column lives in.
    fn column_nametable(&self) -> u16 {
        let mut table = (self.ctrl & CTRL_NAMETABLE) as u16;
        if self.bg.column >= 32 {
            table ^= 1;
        }
        0x2000 + table * 0x400
    }

    fn nametable_addr(&self, row: u16) -> u16 {
        let coarse_x = self.bg.column as u16 & 31;
        self.column_nametable() + (row / 8) * 32 + coarse_x
    }

    fn attribute_addr(&self, row: u16) -> u16 {
        let coarse_x = self.bg.column as u16 & 31;
        self.column_nametable() + 0x3C0 + (row / 32) * 8 + coarse_x / 4
    }

    fn pattern_addr(&self, row: u16) -> u16 {
        let base = if self.ctrl & CTRL_BACKGROUND_TABLE != 0 {
            0x1000
        } else {
            0x0000
        };
        base + (self.bg.tile as u16) * 16 + (row & 7)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{solid_tile, striped_tile};

    /// Run one full line's worth of pipeline cycles the way the timing loop
    /// does: prefetch for `row`, then the visible window for `row`.
    fn draw_row(p: &mut Ppu, row: u16) {
        for cycle in 321..=337 {
            p.background_cycle(cycle, row);
        }
        for cycle in 1..=256 {
            p.background_cycle(cycle, row);
            p.render_pixel((cycle - 1) as usize, row as usize);
        }
    }

    #[test]
    fn tiles_land_on_their_columns() {
        let mut p = Ppu::default();
        p.load_vram(0x0010, &solid_tile(1)).expect("fits");
        p.load_vram(0x0020, &striped_tile()).expect("fits");
        p.poke_vram(0x3F00, 0x0F);
        p.poke_vram(0x3F01, 0x16);
        p.poke_vram(0x3F02, 0x27);
        p.poke_vram(0x3F03, 0x30);
        // Columns 0, 2 and 31 of row 0
        p.poke_vram(0x2000, 0x01);
        p.poke_vram(0x2002, 0x02);
        p.poke_vram(0x201F, 0x01);

        draw_row(&mut p, 0);
        let row = p.frame().row(0).expect("row").to_vec();
        assert!(row[0..8].iter().all(|&c| c == 0x16));
        assert!(row[8..16].iter().all(|&c| c == 0x0F));
        assert_eq!(&row[16..20], &[0x0F, 0x16, 0x27, 0x30]);
        assert_eq!(&row[20..24], &[0x0F, 0x16, 0x27, 0x30]);
        assert!(row[248..256].iter().all(|&c| c == 0x16));
    }

    #[test]
    fn attribute_quadrants_select_palette_group() {
        let mut p = Ppu::default();
        p.load_vram(0x0010, &solid_tile(1)).expect("fits");
        // Whole nametable row 0 uses tile 1
        for col in 0..32 {
            p.poke_vram(0x2000 + col, 0x01);
        }
        // Attribute byte 0: top-left group 1, top-right group 2
        p.poke_vram(0x23C0, 0b0000_1001);
        p.poke_vram(0x3F05, 0x21);
        p.poke_vram(0x3F09, 0x2A);

        draw_row(&mut p, 0);
        let row = p.frame().row(0).expect("row");
        assert_eq!(row[0], 0x21);
        assert_eq!(row[15], 0x21);
        assert_eq!(row[16], 0x2A);
        assert_eq!(row[31], 0x2A);
        // Attribute byte 1 is zero: group 0
        assert_eq!(row[32], p.peek_vram(0x3F01));
    }

    #[test]
    fn control_selects_nametable_and_pattern_half() {
        let mut p = Ppu::default();
        p.write_reg(0x2000, CTRL_BACKGROUND_TABLE | 0x02);
        p.load_vram(0x1030, &solid_tile(3)).expect("fits");
        p.poke_vram(0x2800 + 32 * 2 + 4, 0x03);
        p.poke_vram(0x3F03, 0x2C);

        draw_row(&mut p, 17);
        let row = p.frame().row(17).expect("row");
        assert!(row[32..40].iter().all(|&c| c == 0x2C));
        assert_eq!(row[40], p.peek_vram(0x3F00));
    }
}
