//! Persistent configuration store for the petdoor controller.
//!
//! The controller keeps three short strings in a small non-volatile byte
//! region: the wireless network name, its passphrase, and the name of the
//! beacon that opens the door. This crate provides:
//!
//! - [`layout`] - the fixed region table, one region per [`ConfigField`]
//! - [`ConfigStore`] - length-prefixed entries over any
//!   [`ByteStore`](petdoor_hardware::ByteStore)
//! - [`FileStore`] - a byte store persisted to a file
//! - [`DeviceCredentials`] - load/save/erase of the provisioned strings
//!
//! # Entry Format
//!
//! ```text
//! address     address+1 ... address+len
//! ┌────────┐  ┌──────────────────────────┐
//! │  len   │  │  len raw bytes (UTF-8)   │
//! └────────┘  └──────────────────────────┘
//! ```
//!
//! A zero length byte means "never written". Strings longer than 255 bytes,
//! or longer than their region, are rejected.
//!
//! # Examples
//!
//! ```no_run
//! use petdoor_storage::{ConfigStore, DeviceCredentials, FileStore};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut store = ConfigStore::new(FileStore::open("petdoor.eeprom", 4096)?);
//!
//! DeviceCredentials::new("home", "hunter22", "Ellie").save(&mut store)?;
//!
//! let creds = DeviceCredentials::load(&store)?;
//! println!("watching for {}", creds.beacon_name);
//! # Ok(())
//! # }
//! ```

pub mod config_store;
pub mod credentials;
pub mod error;
pub mod file_store;
pub mod layout;

pub use config_store::ConfigStore;
pub use credentials::{DeviceCredentials, mask_secret};
pub use error::{StorageError, StorageResult};
pub use file_store::FileStore;
pub use layout::{ConfigField, REGION_TABLE, Region, layout_end};
