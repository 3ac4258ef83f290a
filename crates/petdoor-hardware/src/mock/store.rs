//! In-memory byte store.

use crate::{HardwareError, Result, traits::ByteStore};

/// Volatile [`ByteStore`] backed by a `Vec<u8>`.
///
/// Fresh stores are filled with `0xFF`, the erased state of flash.
///
/// # Examples
///
/// ```
/// use petdoor_hardware::mock::MemoryStore;
/// use petdoor_hardware::traits::ByteStore;
///
/// let mut store = MemoryStore::new(512);
/// store.write_byte(10, 0x42).unwrap();
/// store.commit().unwrap();
///
/// assert_eq!(store.read_byte(10).unwrap(), 0x42);
/// assert!(store.read_byte(512).is_err());
/// ```
#[derive(Debug, Clone)]
pub struct MemoryStore {
    bytes: Vec<u8>,
    commits: u64,
}

impl MemoryStore {
    /// Erased byte value.
    pub const ERASED: u8 = 0xFF;

    /// Create an erased store of `size` bytes.
    pub fn new(size: usize) -> Self {
        Self::filled(size, Self::ERASED)
    }

    /// Create a store of `size` bytes all set to `fill`.
    pub fn filled(size: usize, fill: u8) -> Self {
        Self {
            bytes: vec![fill; size],
            commits: 0,
        }
    }

    /// Wrap existing contents.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self { bytes, commits: 0 }
    }

    /// Raw contents.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Number of successful commits.
    pub fn commit_count(&self) -> u64 {
        self.commits
    }
}

impl ByteStore for MemoryStore {
    fn size(&self) -> usize {
        self.bytes.len()
    }

    fn read_byte(&self, address: usize) -> Result<u8> {
        self.bytes
            .get(address)
            .copied()
            .ok_or_else(|| HardwareError::out_of_range(address, 1, self.bytes.len()))
    }

    fn write_byte(&mut self, address: usize, value: u8) -> Result<()> {
        let size = self.bytes.len();
        let byte = self
            .bytes
            .get_mut(address)
            .ok_or_else(|| HardwareError::out_of_range(address, 1, size))?;
        *byte = value;
        Ok(())
    }

    fn commit(&mut self) -> Result<()> {
        self.commits += 1;
        Ok(())
    }
}
