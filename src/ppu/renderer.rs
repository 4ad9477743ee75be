#![doc = r#"
Per-cycle timing state machine (`Ppu::tick`).

Each tick handles the current (scanline, cycle) and then advances the
position. Region dispatch:

| Scanline | Cycle     | Work                                             |
|----------|-----------|--------------------------------------------------|
| 0-239    | 1-256     | pipeline cycle for this row, then pixel x=cycle-1 |
| 0-239    | 257       | sprite evaluation for this line                  |
| 0-239    | 321-337   | prefetch tiles 0-1 of the next row               |
| 240      | -         | idle                                             |
| 241      | 0         | vblank flag, frame complete, NMI latch if enabled |
| 261      | 0         | clear vblank, sprite-zero and overflow flags     |
| 261      | 321-337   | prefetch tiles 0-1 of row 0                      |
"#]

use super::{
    CYCLES_PER_SCANLINE, PRERENDER_SCANLINE, Ppu, SCANLINES_PER_FRAME, SCREEN_HEIGHT,
    STATUS_SPRITE_OVERFLOW, STATUS_SPRITE_ZERO_HIT, STATUS_VBLANK, VBLANK_SCANLINE,
};

const PREFETCH: std::ops::RangeInclusive<u16> = 321..=337;
const SPRITE_EVALUATION_CYCLE: u16 = 257;

impl Ppu {
    /// Advance exactly one video clock.
    pub fn tick(&mut self) {
        let (line, cycle) = (self.scanline, self.cycle);
        if (line as usize) < SCREEN_HEIGHT {
            self.visible_cycle(line, cycle);
        } else if line == VBLANK_SCANLINE && cycle == 0 {
            self.enter_vblank();
        } else if line == PRERENDER_SCANLINE {
            self.prerender_cycle(cycle);
        }
        self.advance_position();
    }

    /// Tick `n` times.
    pub fn run_ticks(&mut self, n: u32) {
        for _ in 0..n {
            self.tick();
        }
    }

    fn visible_cycle(&mut self, line: u16, cycle: u16) {
        match cycle {
            1..=256 => {
                self.background_cycle(cycle, line);
                self.render_pixel((cycle - 1) as usize, line as usize);
            }
            SPRITE_EVALUATION_CYCLE => self.evaluate_sprites(line),
            c if PREFETCH.contains(&c) => self.background_cycle(c, line + 1),
            _ => {}
        }
    }

    fn prerender_cycle(&mut self, cycle: u16) {
        if cycle == 0 {
            self.status &= !(STATUS_VBLANK | STATUS_SPRITE_ZERO_HIT | STATUS_SPRITE_OVERFLOW);
        } else if PREFETCH.contains(&cycle) {
            self.background_cycle(cycle, 0);
        }
    }

    fn enter_vblank(&mut self) {
        self.set_vblank(true);
        self.frame_complete = true;
        self.frame_count += 1;
        log::debug!("frame {} complete, vblank entered", self.frame_count);
        if self.nmi_enabled() {
            self.nmi_latch = true;
        }
    }

    fn advance_position(&mut self) {
        self.cycle += 1;
        if self.cycle == CYCLES_PER_SCANLINE {
            self.cycle = 0;
            self.scanline += 1;
            if self.scanline == SCANLINES_PER_FRAME {
                self.scanline = 0;
                self.odd_frame = !self.odd_frame;
            }
        }
    }
}
