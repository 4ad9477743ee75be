//! Raw image loaders.
//!
//! Cartridge formats are not parsed here: callers hand over the bytes that
//! belong at a fixed origin. Every loader validates the whole image first and
//! writes nothing on failure.

use crate::bus::Bus;
use crate::error::LoadError;
use crate::ppu::Ppu;
use crate::ppu::memory::PATTERN_TABLE_SIZE;

/// Copy a program image into CPU memory at `origin` (hook-free).
pub fn load_program(bus: &mut Bus, origin: u16, image: &[u8]) -> Result<(), LoadError> {
    bus.load(origin, image)?;
    log::debug!(
        "program image: {} bytes at ${:04X}-${:04X}",
        image.len(),
        origin,
        origin as usize + image.len() - 1
    );
    Ok(())
}

/// Copy a pattern-table image into video memory starting at $0000. The
/// image must fit inside the 8 KiB pattern region.
pub fn load_patterns(ppu: &mut Ppu, image: &[u8]) -> Result<(), LoadError> {
    if image.len() > PATTERN_TABLE_SIZE {
        return Err(LoadError::Overflow {
            origin: 0,
            len: image.len(),
            capacity: PATTERN_TABLE_SIZE,
        });
    }
    ppu.load_vram(0x0000, image)?;
    log::debug!("pattern image: {} bytes", image.len());
    Ok(())
}

/// Store `target` little-endian at `vector` (e.g. $FFFC for reset).
pub fn set_vector(bus: &mut Bus, vector: u16, target: u16) {
    bus.poke(vector, target as u8);
    bus.poke(vector.wrapping_add(1), (target >> 8) as u8);
}
