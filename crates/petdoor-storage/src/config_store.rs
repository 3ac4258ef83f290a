//! Length-prefixed string entries over a byte store.
//!
//! An entry is one length byte followed by that many raw bytes. A zero
//! length byte marks the entry as absent. Reads are capped to the entry's
//! reserved region: a length byte that claims more than the region holds is
//! reported as [`StorageError::ExceedsRegion`] instead of being trusted.

use petdoor_core::constants::MAX_ENTRY_LENGTH;
use petdoor_hardware::ByteStore;
use tracing::{debug, trace};

use crate::error::{StorageError, StorageResult};
use crate::layout::{ConfigField, region_containing};

/// Typed access to length-prefixed entries.
///
/// # Examples
///
/// ```
/// use petdoor_hardware::mock::MemoryStore;
/// use petdoor_storage::{ConfigField, ConfigStore};
///
/// let mut store = ConfigStore::new(MemoryStore::filled(512, 0));
///
/// assert!(!store.has_data(ConfigField::BeaconName).unwrap());
/// store.write(ConfigField::BeaconName, "Ellie").unwrap();
/// assert_eq!(store.read(ConfigField::BeaconName).unwrap(), "Ellie");
/// ```
#[derive(Debug)]
pub struct ConfigStore<S> {
    bytes: S,
}

/// Where an entry lives and how much room it has.
struct Slot {
    label: String,
    address: usize,
    capacity: usize,
}

impl<S: ByteStore> ConfigStore<S> {
    /// Wrap a byte store.
    pub fn new(bytes: S) -> Self {
        Self { bytes }
    }

    /// Borrow the underlying byte store.
    pub fn inner(&self) -> &S {
        &self.bytes
    }

    /// Unwrap the underlying byte store.
    pub fn into_inner(self) -> S {
        self.bytes
    }

    /// Write `text` into `field`'s region and commit.
    ///
    /// # Errors
    ///
    /// - [`StorageError::StringTooLong`] if `text` exceeds 255 bytes
    /// - [`StorageError::ExceedsRegion`] if it does not fit the region
    pub fn write(&mut self, field: ConfigField, text: &str) -> StorageResult<()> {
        let slot = Self::field_slot(field);
        self.write_slot(&slot, text)
    }

    /// Read the entry stored in `field`'s region.
    ///
    /// An absent entry reads as the empty string.
    pub fn read(&self, field: ConfigField) -> StorageResult<String> {
        self.read_slot(&Self::field_slot(field))
    }

    /// Returns `true` if `field`'s length byte is non-zero.
    pub fn has_data(&self, field: ConfigField) -> StorageResult<bool> {
        self.has_data_at(field.address())
    }

    /// Write an entry at a raw address.
    ///
    /// An entry inside a reserved region is bounded by the end of that
    /// region, an entry past the region table by the end of the store.
    pub fn write_at(&mut self, address: usize, text: &str) -> StorageResult<()> {
        let slot = self.address_slot(address)?;
        self.write_slot(&slot, text)
    }

    /// Read an entry at a raw address.
    pub fn read_at(&self, address: usize) -> StorageResult<String> {
        let slot = self.address_slot(address)?;
        self.read_slot(&slot)
    }

    /// Returns `true` if the length byte at `address` is non-zero.
    pub fn has_data_at(&self, address: usize) -> StorageResult<bool> {
        Ok(self.bytes.read_byte(address)? != 0)
    }

    /// Zero-fill `low..=high` and commit.
    ///
    /// An empty range (`low > high`) is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::OutOfBounds`] if `high` is past the end of the
    /// store. Nothing is written in that case.
    pub fn clear(&mut self, low: usize, high: usize) -> StorageResult<()> {
        if low > high {
            return Ok(());
        }

        let size = self.bytes.size();
        if high >= size {
            return Err(StorageError::OutOfBounds {
                address: low,
                len: high - low + 1,
                size,
            });
        }

        for address in low..=high {
            self.bytes.write_byte(address, 0)?;
        }
        self.bytes.commit()?;

        debug!(low, high, "store range cleared");
        Ok(())
    }

    /// Zero-fill `field`'s whole region and commit.
    pub fn clear_field(&mut self, field: ConfigField) -> StorageResult<()> {
        let region = field.region();
        self.clear(region.address, region.end() - 1)
    }

    fn field_slot(field: ConfigField) -> Slot {
        let region = field.region();
        Slot {
            label: field.label().to_string(),
            address: region.address,
            capacity: region.capacity,
        }
    }

    fn address_slot(&self, address: usize) -> StorageResult<Slot> {
        let size = self.bytes.size();
        if address >= size {
            return Err(StorageError::OutOfBounds {
                address,
                len: 1,
                size,
            });
        }

        let Some(region) = region_containing(address) else {
            return Ok(Slot {
                label: format!("entry at {address:#06x}"),
                address,
                capacity: size - address,
            });
        };

        let label = if region.address == address {
            region.field.label().to_string()
        } else {
            format!("{} at {address:#06x}", region.field.label())
        };
        Ok(Slot {
            label,
            address,
            capacity: region.end().min(size) - address,
        })
    }

    fn write_slot(&mut self, slot: &Slot, text: &str) -> StorageResult<()> {
        let payload = text.as_bytes();

        if payload.len() > MAX_ENTRY_LENGTH {
            return Err(StorageError::StringTooLong {
                len: payload.len(),
                max: MAX_ENTRY_LENGTH,
            });
        }

        let needed = payload.len() + 1;
        if needed > slot.capacity {
            return Err(StorageError::ExceedsRegion {
                field: slot.label.clone(),
                len: needed,
                capacity: slot.capacity,
            });
        }

        let size = self.bytes.size();
        if slot.address + needed > size {
            return Err(StorageError::OutOfBounds {
                address: slot.address,
                len: needed,
                size,
            });
        }

        // Checked above: fits in one byte
        self.bytes.write_byte(slot.address, payload.len() as u8)?;
        for (offset, &byte) in payload.iter().enumerate() {
            self.bytes.write_byte(slot.address + 1 + offset, byte)?;
        }
        self.bytes.commit()?;

        trace!(field = %slot.label, len = payload.len(), "entry written");
        Ok(())
    }

    fn read_slot(&self, slot: &Slot) -> StorageResult<String> {
        let len = usize::from(self.bytes.read_byte(slot.address)?);
        if len == 0 {
            return Ok(String::new());
        }

        if len + 1 > slot.capacity {
            return Err(StorageError::ExceedsRegion {
                field: slot.label.clone(),
                len: len + 1,
                capacity: slot.capacity,
            });
        }

        let payload = (1..=len)
            .map(|offset| self.bytes.read_byte(slot.address + offset))
            .collect::<Result<Vec<u8>, _>>()?;

        String::from_utf8(payload).map_err(|_| StorageError::InvalidUtf8 {
            field: slot.label.clone(),
        })
    }
}
