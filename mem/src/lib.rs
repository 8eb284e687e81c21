//! Bounds-checked flat guest RAM with little-endian 16-bit access.
//!
//! Every read/write to guest memory in this emulator passes through here;
//! nothing outside this crate is permitted to index the backing buffer
//! directly, so an out-of-range access can never corrupt host memory — it
//! can only return `Fault`.

use thiserror::Error;

/// A memory access (or a bulk load) that fell outside `[0, mem_size)`.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("memory access out of range: addr={addr:#x} len={len} mem_size={mem_size:#x}")]
pub struct Fault {
    pub addr: u32,
    pub len: u32,
    pub mem_size: u32,
}

pub type Result<T> = std::result::Result<T, Fault>;

/// Minimum RAM size the registry will accept when creating a VM (§3).
pub const MIN_RAM_BYTES: usize = 64 * 1024;

/// Flat, linearly addressed guest RAM.
///
/// The address space is 20 bits wide (real-mode segment:offset resolves into
/// it), but the backing buffer itself can be any size the host requests —
/// accesses beyond `mem_size` fault rather than wrapping or panicking.
pub struct Memory {
    bytes: Vec<u8>,
}

impl Memory {
    /// Allocates `size` bytes of zeroed RAM.
    pub fn new(size: usize) -> Self {
        Memory {
            bytes: vec![0u8; size],
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    fn fault(&self, addr: u32, len: u32) -> Fault {
        Fault {
            addr,
            len,
            mem_size: self.bytes.len() as u32,
        }
    }

    pub fn read8(&self, addr: u32) -> Result<u8> {
        self.bytes
            .get(addr as usize)
            .copied()
            .ok_or_else(|| self.fault(addr, 1))
    }

    pub fn read16(&self, addr: u32) -> Result<u16> {
        let hi_addr = addr.checked_add(1).ok_or_else(|| self.fault(addr, 2))?;
        let lo = self.read8(addr)?;
        let hi = self.read8(hi_addr)?;
        Ok(u16::from_le_bytes([lo, hi]))
    }

    pub fn write8(&mut self, addr: u32, value: u8) -> Result<()> {
        match self.bytes.get_mut(addr as usize) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(self.fault(addr, 1)),
        }
    }

    pub fn write16(&mut self, addr: u32, value: u16) -> Result<()> {
        let hi_addr = addr.checked_add(1).ok_or_else(|| self.fault(addr, 2))?;
        let [lo, hi] = value.to_le_bytes();
        // Bounds-check both bytes before mutating either, so a fault never
        // leaves a partial write behind.
        if hi_addr as usize >= self.bytes.len() {
            return Err(self.fault(addr, 2));
        }
        self.write8(addr, lo)?;
        self.write8(hi_addr, hi)?;
        Ok(())
    }

    /// Bounded bulk copy, used by the host's boot-image loader (§6). Fails
    /// the whole operation — and writes nothing — if it would run past the
    /// end of RAM.
    pub fn load_bytes(&mut self, addr: u32, data: &[u8]) -> Result<()> {
        let start = addr as usize;
        let end = start
            .checked_add(data.len())
            .filter(|&end| end <= self.bytes.len())
            .ok_or_else(|| self.fault(addr, data.len() as u32))?;
        self.bytes[start..end].copy_from_slice(data);
        Ok(())
    }

    /// Read-only byte window for trace hooks (§4.11), clamped to the memory
    /// bound. Never faults: a window that runs off the end of RAM is simply
    /// truncated.
    pub fn window(&self, addr: u32, max_len: usize) -> &[u8] {
        let start = (addr as usize).min(self.bytes.len());
        let end = start.saturating_add(max_len).min(self.bytes.len());
        &self.bytes[start..end]
    }
}
