/*!
Power-on configuration for a `Console`.

Defaults describe the classic layout: program image at $8000, horizontally
arranged nametables, and the CPU entering through the reset vector.

```ignore
let cfg = ConsoleConfig::default()
    .with_mirroring(Mirroring::Vertical)
    .with_entry_point(0xC000);
```
*/

/// Nametable arrangement inside the video unit's $2000-$2FFF window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mirroring {
    /// $2000 = $2400, $2800 = $2C00.
    #[default]
    Horizontal,
    /// $2000 = $2800, $2400 = $2C00.
    Vertical,
    /// Four distinct nametables (no folding inside $2000-$2FFF).
    FourScreen,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConsoleConfig {
    /// CPU address the program image is loaded at.
    pub program_origin: u16,
    pub mirroring: Mirroring,
    /// When set, overrides the reset vector at power-on.
    pub entry_point: Option<u16>,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            program_origin: 0x8000,
            mirroring: Mirroring::Horizontal,
            entry_point: None,
        }
    }
}

impl ConsoleConfig {
    pub fn with_program_origin(mut self, origin: u16) -> Self {
        self.program_origin = origin;
        self
    }

    pub fn with_mirroring(mut self, mirroring: Mirroring) -> Self {
        self.mirroring = mirroring;
        self
    }

    pub fn with_entry_point(mut self, pc: u16) -> Self {
        self.entry_point = Some(pc);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_overrides_defaults() {
        let cfg = ConsoleConfig::default();
        assert_eq!(cfg.program_origin, 0x8000);
        assert_eq!(cfg.mirroring, Mirroring::Horizontal);
        assert_eq!(cfg.entry_point, None);

        let cfg = cfg
            .with_program_origin(0xC000)
            .with_mirroring(Mirroring::Vertical)
            .with_entry_point(0xC000);
        assert_eq!(cfg.program_origin, 0xC000);
        assert_eq!(cfg.mirroring, Mirroring::Vertical);
        assert_eq!(cfg.entry_point, Some(0xC000));
    }
}
