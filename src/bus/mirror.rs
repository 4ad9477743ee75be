/*!
Mirror map: resolves every bus address to its canonical backing cell.

Address lines that a device does not decode make the same cell visible at
several addresses. The map stores, for each address in the bus, the index of
the cell that actually holds the byte. It starts out as the identity.

Binding order matters only in one direction: bindings resolve through the
current table, so an alias bound first is inherited by every range mirror
bound afterwards (e.g. palette $3F10 -> $3F00, then $3F20-$3FFF mirrored
every 32 bytes makes $3F30 land on $3F00 as well).
*/

/// Per-address canonical index table.
#[derive(Debug, Clone)]
pub struct MirrorMap {
    canonical: Vec<u16>,
}

impl MirrorMap {
    /// Identity map over `size` addresses.
    pub fn new(size: usize) -> Self {
        Self {
            canonical: (0..size).map(|a| a as u16).collect(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.canonical.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.canonical.is_empty()
    }

    /// Canonical address for an (already width-masked) index.
    #[inline]
    pub fn resolve(&self, index: usize) -> u16 {
        self.canonical[index]
    }

    /// For every address in `[start, end]`, map it to
    /// `start + ((address - start) mod period)`, resolved through the table.
    ///
    /// Addresses are walked in ascending order; the source of each entry is
    /// never above the entry itself, so one pass suffices.
    pub fn bind_range(&mut self, start: usize, end: usize, period: usize) {
        if period == 0 || start > end {
            return;
        }
        let end = end.min(self.canonical.len().saturating_sub(1));
        for a in start..=end {
            let source = start + (a - start) % period;
            self.canonical[a] = self.canonical[source];
        }
    }

    /// Make `address` share the canonical cell of `target`.
    pub fn bind_alias(&mut self, address: usize, target: usize) {
        let resolved = self.canonical[target];
        self.canonical[address] = resolved;
    }
}
