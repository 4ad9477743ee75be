#![doc = r#"
Sprite evaluation stub.

At cycle 257 of each visible line, primary OAM is scanned in index order for
sprites whose Y range covers that line. The first eight are copied into
secondary OAM (unused slots stay $FF); finding a ninth sets the sprite
overflow flag. Nothing here touches the background pipeline.

Compositing sprites into pixels, sprite-zero hit and the hardware's buggy
overflow scan are not performed; `secondary_oam` / `sprite_count` are the
extension point a sprite pixel stage would consume.
"#]

use super::{CTRL_SPRITE_16, Ppu};

/// Sprites per line the hardware can display.
pub const MAX_SPRITES_PER_LINE: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpriteEvaluation {
    secondary: [u8; MAX_SPRITES_PER_LINE * 4],
    count: u8,
}

impl Default for SpriteEvaluation {
    fn default() -> Self {
        Self {
            secondary: [0xFF; MAX_SPRITES_PER_LINE * 4],
            count: 0,
        }
    }
}

impl Ppu {
    pub(in crate::ppu) fn evaluate_sprites(&mut self, line: u16) {
        let height: u16 = if self.ctrl & CTRL_SPRITE_16 != 0 { 16 } else { 8 };
        let mut found = SpriteEvaluation::default();

        for sprite in self.oam.chunks_exact(4) {
            let top = sprite[0] as u16;
            if line < top || line - top >= height {
                continue;
            }
            let slot = found.count as usize;
            if slot == MAX_SPRITES_PER_LINE {
                self.status |= super::STATUS_SPRITE_OVERFLOW;
                break;
            }
            found.secondary[slot * 4..slot * 4 + 4].copy_from_slice(sprite);
            found.count += 1;
        }
        self.sprites = found;
    }

    /// Secondary OAM as filled by the last evaluation.
    pub fn secondary_oam(&self) -> &[u8] {
        &self.sprites.secondary
    }

    /// Sprites selected by the last evaluation (0..=8).
    pub fn sprite_count(&self) -> usize {
        self.sprites.count as usize
    }
}
