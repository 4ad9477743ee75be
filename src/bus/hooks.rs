/*!
Hook tables: sparse per-address device callbacks.

A read hook replaces the backing cell's value on read; a write hook observes
the byte after it has been stored. Hooks are keyed by canonical address and
own whatever device handle they need (typically an `Rc<RefCell<..>>` clone).
*/

use std::collections::HashMap;
use std::fmt;

/// Side-effecting read handler (e.g. a status register that clears on read).
pub type ReadHook = Box<dyn FnMut() -> u8>;
/// Side-effecting write handler.
pub type WriteHook = Box<dyn FnMut(u8)>;

/// At most one read hook and one write hook per canonical address.
#[derive(Default)]
pub struct HookTable {
    reads: HashMap<u16, ReadHook>,
    writes: HashMap<u16, WriteHook>,
}

impl fmt::Debug for HookTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut reads: Vec<_> = self.reads.keys().copied().collect();
        let mut writes: Vec<_> = self.writes.keys().copied().collect();
        reads.sort_unstable();
        writes.sort_unstable();
        f.debug_struct("HookTable")
            .field("reads", &reads)
            .field("writes", &writes)
            .finish()
    }
}

impl HookTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a read hook, returning true if one was replaced.
    pub fn bind_read(&mut self, canonical: u16, hook: ReadHook) -> bool {
        self.reads.insert(canonical, hook).is_some()
    }

    /// Install a write hook, returning true if one was replaced.
    pub fn bind_write(&mut self, canonical: u16, hook: WriteHook) -> bool {
        self.writes.insert(canonical, hook).is_some()
    }

    #[inline]
    pub fn call_read(&mut self, canonical: u16) -> Option<u8> {
        self.reads.get_mut(&canonical).map(|hook| hook())
    }

    /// Invoke the write hook if bound; returns whether one ran.
    #[inline]
    pub fn call_write(&mut self, canonical: u16, value: u8) -> bool {
        match self.writes.get_mut(&canonical) {
            Some(hook) => {
                hook(value);
                true
            }
            None => false,
        }
    }

    pub fn has_read(&self, canonical: u16) -> bool {
        self.reads.contains_key(&canonical)
    }

    pub fn has_write(&self, canonical: u16) -> bool {
        self.writes.contains_key(&canonical)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn rebinding_replaces_previous_hook() {
        let mut t = HookTable::new();
        assert!(!t.bind_read(0x10, Box::new(|| 1)));
        assert!(t.bind_read(0x10, Box::new(|| 2)));
        assert_eq!(t.call_read(0x10), Some(2));
        assert_eq!(t.call_read(0x11), None);
    }

    #[test]
    fn write_hook_receives_value() {
        let seen = Rc::new(Cell::new(0u8));
        let sink = Rc::clone(&seen);
        let mut t = HookTable::new();
        t.bind_write(0x20, Box::new(move |v| sink.set(v)));
        assert!(t.call_write(0x20, 0x5A));
        assert!(!t.call_write(0x21, 0x00));
        assert_eq!(seen.get(), 0x5A);
    }
}
