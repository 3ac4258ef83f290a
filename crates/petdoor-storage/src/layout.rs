//! Fixed region table of the persistent store.
//!
//! Each logical field owns a non-overlapping region. The first byte of a
//! region is the length prefix, so a region of `N` bytes holds at most
//! `N - 1` bytes of text.
//!
//! ```text
//! 0x0000 ┌──────────────────────┐
//!        │ network name   (100) │
//! 0x0064 ├──────────────────────┤
//!        │ network secret (100) │
//! 0x00C8 ├──────────────────────┤
//!        │ beacon name    (100) │
//! 0x012C └──────────────────────┘
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// Bytes reserved for each credential field, including the length byte.
pub const FIELD_REGION_SIZE: usize = 100;

/// A named configuration field with a reserved store region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfigField {
    /// Wireless network name.
    NetworkName,
    /// Wireless network passphrase.
    NetworkSecret,
    /// Advertised name of the beacon that opens the door.
    BeaconName,
}

/// A reserved address range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub field: ConfigField,
    pub address: usize,
    pub capacity: usize,
}

impl Region {
    /// One past the last byte of the region.
    pub const fn end(&self) -> usize {
        self.address + self.capacity
    }

    /// Largest payload the region can hold after the length byte.
    pub const fn max_text_len(&self) -> usize {
        self.capacity - 1
    }
}

/// Every reserved region, in address order.
pub const REGION_TABLE: [Region; 3] = [
    Region {
        field: ConfigField::NetworkName,
        address: 0x0000,
        capacity: FIELD_REGION_SIZE,
    },
    Region {
        field: ConfigField::NetworkSecret,
        address: 0x0064,
        capacity: FIELD_REGION_SIZE,
    },
    Region {
        field: ConfigField::BeaconName,
        address: 0x00C8,
        capacity: FIELD_REGION_SIZE,
    },
];

impl ConfigField {
    /// All fields, in address order.
    pub const ALL: [ConfigField; 3] = [
        ConfigField::NetworkName,
        ConfigField::NetworkSecret,
        ConfigField::BeaconName,
    ];

    /// The region reserved for this field.
    pub const fn region(self) -> Region {
        match self {
            ConfigField::NetworkName => REGION_TABLE[0],
            ConfigField::NetworkSecret => REGION_TABLE[1],
            ConfigField::BeaconName => REGION_TABLE[2],
        }
    }

    /// Start address of the field's region.
    pub const fn address(self) -> usize {
        self.region().address
    }

    /// Human-readable field name used in errors and logs.
    pub const fn label(self) -> &'static str {
        match self {
            ConfigField::NetworkName => "network name",
            ConfigField::NetworkSecret => "network secret",
            ConfigField::BeaconName => "beacon name",
        }
    }
}

impl fmt::Display for ConfigField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The region whose address range includes `address`, if any.
pub fn region_containing(address: usize) -> Option<Region> {
    REGION_TABLE
        .iter()
        .copied()
        .find(|r| (r.address..r.end()).contains(&address))
}

/// First address past every reserved region.
///
/// A byte store must be at least this large.
pub fn layout_end() -> usize {
    REGION_TABLE.iter().map(Region::end).max().unwrap_or(0)
}
