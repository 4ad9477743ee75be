#![doc = r#"
Bus module: flat byte-addressable memory with mirroring and device hooks.

Overview
- `Bus` owns a backing array spanning the whole address space, a mirror map
  (`canonical_address: Address -> Address`, identity by default) and two sparse
  hook tables (on-read, on-write) keyed by canonical address.
- The same type serves both address spaces: the CPU bus (64 KiB) and the video
  unit's own memory (16 KiB).

Access semantics
- `read(addr)`: resolve through the mirror map; a bound read hook supplies the
  value (and may have side effects), otherwise the backing cell is returned.
- `write(addr, v)`: resolve; the backing cell is ALWAYS stored first, then the
  write hook (if any) is invoked with `v`. Hooks that read the bus therefore
  observe the byte just written.
- `peek`/`poke`/`load` bypass hooks (tracing, loaders, tests).

Reads and writes never fail: the backing array covers the full bus width and
addresses are masked to it.

Modules and responsibilities
- mirror: `MirrorMap` canonical-address table with range and alias binding.
- hooks: `HookTable` read/write callback tables.
"#]

pub mod hooks;
pub mod mirror;


use crate::error::LoadError;
use hooks::HookTable;
use mirror::MirrorMap;

/// Size of the CPU-visible address space.
pub const CPU_BUS_SIZE: usize = 0x1_0000;
/// Size of the video unit's private address space.
pub const VIDEO_BUS_SIZE: usize = 0x4000;

/// Byte-addressable memory with mirroring and memory-mapped I/O hooks.
pub struct Bus {
    mem: Vec<u8>,
    mirrors: MirrorMap,
    hooks: HookTable,
    mask: usize,
}

impl std::fmt::Debug for Bus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bus")
            .field("size", &self.mem.len())
            .field("hooks", &self.hooks)
            .finish()
    }
}

impl Default for Bus {
    fn default() -> Self {
        Self::cpu()
    }
}

impl Bus {
    /// Create a zeroed bus of `size` bytes. Sizes are rounded up to a power
    /// of two so every 16-bit address masks to a valid cell.
    pub fn new(size: usize) -> Self {
        let size = size.clamp(1, CPU_BUS_SIZE).next_power_of_two();
        Self {
            mem: vec![0; size],
            mirrors: MirrorMap::new(size),
            hooks: HookTable::new(),
            mask: size - 1,
        }
    }

    /// 64 KiB CPU bus.
    pub fn cpu() -> Self {
        Self::new(CPU_BUS_SIZE)
    }

    /// 16 KiB video memory bus.
    pub fn video() -> Self {
        Self::new(VIDEO_BUS_SIZE)
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.mem.len()
    }

    /// Canonical address backing `addr`.
    #[inline]
    pub fn canonical(&self, addr: u16) -> u16 {
        self.mirrors.resolve(addr as usize & self.mask)
    }

    // ---------------------------------------------------------------------
    // Access
    // ---------------------------------------------------------------------

    /// Read a byte, dispatching to a read hook when one is bound.
    #[inline]
    pub fn read(&mut self, addr: u16) -> u8 {
        let c = self.canonical(addr);
        match self.hooks.call_read(c) {
            Some(v) => v,
            None => self.mem[c as usize],
        }
    }

    /// Store a byte into the backing cell, then notify the write hook.
    #[inline]
    pub fn write(&mut self, addr: u16, value: u8) {
        let c = self.canonical(addr);
        self.mem[c as usize] = value;
        self.hooks.call_write(c, value);
    }

    /// Little-endian word read (vectors). The high byte comes from `addr + 1`
    /// with normal 16-bit carry.
    pub fn read_word(&mut self, addr: u16) -> u16 {
        let lo = self.read(addr) as u16;
        let hi = self.read(addr.wrapping_add(1)) as u16;
        (hi << 8) | lo
    }

    /// Backing-cell read with no hook dispatch.
    #[inline]
    pub fn peek(&self, addr: u16) -> u8 {
        self.mem[self.canonical(addr) as usize]
    }

    /// Backing-cell write with no hook dispatch.
    #[inline]
    pub fn poke(&mut self, addr: u16, value: u8) {
        let c = self.canonical(addr) as usize;
        self.mem[c] = value;
    }

    /// Copy `bytes` into memory starting at `origin`, hook-free. Each byte
    /// lands in the canonical cell behind its address, so an image placed
    /// in a mirrored window is visible through every mirror.
    ///
    /// The whole block must fit below the end of the bus; nothing is written
    /// otherwise.
    pub fn load(&mut self, origin: u16, bytes: &[u8]) -> Result<(), LoadError> {
        if bytes.is_empty() {
            return Err(LoadError::Empty { origin });
        }
        let start = origin as usize & self.mask;
        let capacity = self.mem.len() - start;
        if bytes.len() > capacity {
            return Err(LoadError::Overflow {
                origin,
                len: bytes.len(),
                capacity,
            });
        }
        for (offset, &byte) in bytes.iter().enumerate() {
            let c = self.mirrors.resolve(start + offset) as usize;
            self.mem[c] = byte;
        }
        Ok(())
    }

    /// Read-only view of the backing array (diagnostics, hashing).
    pub fn as_slice(&self) -> &[u8] {
        &self.mem
    }

    // ---------------------------------------------------------------------
    // Setup-time bindings
    // ---------------------------------------------------------------------

    /// Mirror `[start, end]` with the given period: every address lands on
    /// `start + ((address - start) mod period)`.
    pub fn bind_mirror(&mut self, start: u16, end: u16, period: u16) {
        let start = start as usize & self.mask;
        let end = end as usize & self.mask;
        self.mirrors.bind_range(start, end, period as usize);
    }

    /// Make a single address share `target`'s backing cell.
    pub fn bind_alias(&mut self, addr: u16, target: u16) {
        self.mirrors
            .bind_alias(addr as usize & self.mask, target as usize & self.mask);
    }

    /// Bind a read hook at the canonical cell behind `addr`. Rebinding replaces.
    pub fn bind_read_hook<F>(&mut self, addr: u16, hook: F)
    where
        F: FnMut() -> u8 + 'static,
    {
        let c = self.canonical(addr);
        if self.hooks.bind_read(c, Box::new(hook)) {
            log::debug!("read hook at ${:04X} replaced", c);
        }
    }

    /// Bind a write hook at the canonical cell behind `addr`. Rebinding replaces.
    pub fn bind_write_hook<F>(&mut self, addr: u16, hook: F)
    where
        F: FnMut(u8) + 'static,
    {
        let c = self.canonical(addr);
        if self.hooks.bind_write(c, Box::new(hook)) {
            log::debug!("write hook at ${:04X} replaced", c);
        }
    }

    pub fn has_read_hook(&self, addr: u16) -> bool {
        self.hooks.has_read(self.canonical(addr))
    }

    pub fn has_write_hook(&self, addr: u16) -> bool {
        self.hooks.has_write(self.canonical(addr))
    }
}
